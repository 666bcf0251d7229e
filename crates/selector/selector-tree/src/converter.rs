//! Converter contract shared with the document engine.

use selector_model::{LabelMapper, Transform};

use crate::{ConvertError, Node, NodeMap};

/// A stateless two-way conversion between one tagged node family and a
/// model type. The engine picks a converter by tag on decode and by
/// capability on encode.
pub trait Converter {
    type Model;

    /// Tag patterns; a trailing `*` matches any version suffix.
    fn tags(&self) -> &'static [&'static str];

    /// Model type names this converter can emit.
    fn type_names(&self) -> &'static [&'static str];

    fn handles_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|pattern| tag_matches(pattern, tag))
    }

    fn decode(&self, node: &NodeMap, tag: &str) -> Result<Self::Model, ConvertError>;

    fn encode(&self, model: &dyn Transform) -> Result<NodeMap, ConvertError>;
}

pub fn tag_matches(pattern: &str, tag: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => tag.starts_with(prefix),
        None => pattern == tag,
    }
}

/// Supplies nested label mappers to converters that embed one.
pub trait NestedResolver {
    fn resolve_label_mapper(&self, node: &Node) -> Result<LabelMapper, ConvertError>;
}

/// Accepts only label mappers the engine has already decoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Resolved;

impl NestedResolver for Resolved {
    fn resolve_label_mapper(&self, node: &Node) -> Result<LabelMapper, ConvertError> {
        node.as_transform()
            .and_then(|t| t.as_label_mapper())
            .cloned()
            .ok_or(ConvertError::invalid(
                "label_mapper",
                "a resolved label mapper",
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selector_model::{OpaqueTransform, TransformRef};

    #[test]
    fn wildcard_matches_versions() {
        let pattern = "tag:stsci.edu:gwcs/label_mapper-*";
        assert!(tag_matches(pattern, "tag:stsci.edu:gwcs/label_mapper-1.2.0"));
        assert!(!tag_matches(pattern, "tag:stsci.edu:gwcs/regions_selector-1.2.0"));
        assert!(tag_matches("exact", "exact"));
        assert!(!tag_matches("exact", "exact-1.0"));
    }

    #[test]
    fn resolved_rejects_other_transforms() {
        let node = Node::Transform(TransformRef::new(OpaqueTransform::new("poly", ["x"], ["y"])));
        assert!(matches!(
            Resolved.resolve_label_mapper(&node),
            Err(ConvertError::InvalidField {
                field: "label_mapper",
                ..
            })
        ));
    }
}
