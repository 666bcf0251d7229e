//! Regions selector node <-> [`RegionsSelector`].

use indexmap::IndexMap;
use log::{debug, trace, warn};

use selector_model::{Fallback, RegionsSelector, Transform, TransformRef};

use crate::{ConvertError, Converter, NestedResolver, Node, NodeMap, NodeMapExt, Resolved};

pub const REGIONS_SELECTOR_TAGS: &[&str] = &["tag:stsci.edu:gwcs/regions_selector-*"];

const REGIONS_SELECTOR_TYPES: &[&str] = &["RegionsSelector"];

#[derive(Clone, Copy, Debug, Default)]
pub struct RegionsSelectorConverter;

impl RegionsSelectorConverter {
    pub fn new() -> Self {
        RegionsSelectorConverter
    }

    /// Decode with a caller-supplied resolver for the nested `label_mapper`.
    pub fn decode_with(
        &self,
        node: &NodeMap,
        resolver: &dyn NestedResolver,
    ) -> Result<RegionsSelector, ConvertError> {
        let inputs = node.required_names("inputs")?;
        let outputs = node.required_names("outputs")?;
        let label_mapper = resolver.resolve_label_mapper(node.required("label_mapper")?)?;
        let undefined_transform_value = match node.required("undefined_transform_value")? {
            Node::Transform(t) => Fallback::Transform(t.clone()),
            other => Fallback::Value(other.as_scalar().ok_or(ConvertError::invalid(
                "undefined_transform_value",
                "a scalar or a transform",
            ))?),
        };

        let table = node
            .required("selector")?
            .as_map()
            .ok_or(ConvertError::invalid("selector", "a labels/transforms mapping"))?;
        let labels = table
            .required("labels")?
            .as_seq()
            .ok_or(ConvertError::invalid("labels", "a sequence"))?;
        let transforms = table
            .required("transforms")?
            .as_seq()
            .ok_or(ConvertError::invalid("transforms", "a sequence"))?;
        if labels.len() != transforms.len() {
            warn!(
                "selector has {} labels but {} transforms; extra entries are ignored",
                labels.len(),
                transforms.len()
            );
        }

        let mut selector = IndexMap::with_capacity(labels.len());
        for (label, transform) in labels.iter().zip(transforms) {
            let label = label
                .as_scalar()
                .ok_or(ConvertError::invalid("labels", "scalar labels"))?;
            let transform = transform
                .as_transform()
                .cloned()
                .ok_or(ConvertError::invalid("transforms", "a sequence of transforms"))?;
            selector.insert(label, transform);
        }
        debug!(
            "decoded regions selector with {} regions over {}",
            selector.len(),
            label_mapper.kind().as_str()
        );

        Ok(RegionsSelector::new(
            inputs,
            outputs,
            selector,
            label_mapper,
            undefined_transform_value,
        ))
    }

    pub fn encode_selector(&self, model: &RegionsSelector) -> NodeMap {
        let mut selector = NodeMap::new();
        selector.insert(
            "labels".into(),
            Node::Seq(model.selector.keys().cloned().map(Node::from).collect()),
        );
        selector.insert(
            "transforms".into(),
            Node::Seq(model.selector.values().cloned().map(Node::Transform).collect()),
        );

        let mut node = NodeMap::new();
        node.insert("inputs".into(), Node::names(model.inputs.iter().cloned()));
        node.insert("outputs".into(), Node::names(model.outputs.iter().cloned()));
        node.insert("selector".into(), Node::Map(selector));
        node.insert(
            "label_mapper".into(),
            Node::Transform(TransformRef::new(model.label_mapper.clone())),
        );
        node.insert(
            "undefined_transform_value".into(),
            match &model.undefined_transform_value {
                Fallback::Value(v) => Node::from(v.clone()),
                Fallback::Transform(t) => Node::Transform(t.clone()),
            },
        );
        trace!("encoded regions selector with {} regions", model.selector.len());
        node
    }
}

impl Converter for RegionsSelectorConverter {
    type Model = RegionsSelector;

    fn tags(&self) -> &'static [&'static str] {
        REGIONS_SELECTOR_TAGS
    }

    fn type_names(&self) -> &'static [&'static str] {
        REGIONS_SELECTOR_TYPES
    }

    fn decode(&self, node: &NodeMap, tag: &str) -> Result<RegionsSelector, ConvertError> {
        trace!("decoding {tag}");
        self.decode_with(node, &Resolved)
    }

    fn encode(&self, model: &dyn Transform) -> Result<NodeMap, ConvertError> {
        let selector = model
            .as_regions_selector()
            .ok_or_else(|| ConvertError::UnrecognizedType {
                expected: "RegionsSelector",
                repr: format!("{model:?}"),
            })?;
        Ok(self.encode_selector(selector))
    }
}
