//! Regions selector: a label mapper plus a label -> transform table.

use indexmap::IndexMap;

use crate::{LabelMapper, Scalar, Transform, TransformRef};

/// Value used when a label has no entry in the selector.
#[derive(Clone, Debug, PartialEq)]
pub enum Fallback {
    Value(Scalar),
    Transform(TransformRef),
}

impl From<Scalar> for Fallback {
    fn from(v: Scalar) -> Self {
        Fallback::Value(v)
    }
}

/// Outcome of a selector lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection<'a> {
    Transform(&'a TransformRef),
    Undefined(&'a Fallback),
}

/// Routes inputs to one of several transforms by the label the
/// `label_mapper` assigns them.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionsSelector {
    /// Ordered input names.
    pub inputs: Vec<String>,
    /// Ordered output names; may differ in count from `inputs`.
    pub outputs: Vec<String>,
    /// Label -> transform, in document order.
    pub selector: IndexMap<Scalar, TransformRef>,
    pub label_mapper: LabelMapper,
    /// Used for labels missing from `selector` and for the no-label sentinel.
    pub undefined_transform_value: Fallback,
}

impl RegionsSelector {
    pub fn new(
        inputs: Vec<String>,
        outputs: Vec<String>,
        selector: IndexMap<Scalar, TransformRef>,
        label_mapper: LabelMapper,
        undefined_transform_value: Fallback,
    ) -> Self {
        Self {
            inputs,
            outputs,
            selector,
            label_mapper,
            undefined_transform_value,
        }
    }

    /// Resolve a label produced by the label mapper. The mapper's
    /// `no_label` sentinel (compared numerically, so `0.0` matches `0`) and
    /// NaN always select the fallback.
    pub fn select(&self, label: &Scalar) -> Selection<'_> {
        if label.is_nan() || label.approx_eq(&self.label_mapper.no_label(), 0.0) {
            return Selection::Undefined(&self.undefined_transform_value);
        }
        match self.selector.get(label) {
            Some(transform) => Selection::Transform(transform),
            None => Selection::Undefined(&self.undefined_transform_value),
        }
    }

    /// Selector labels in document order.
    pub fn labels(&self) -> impl Iterator<Item = &Scalar> {
        self.selector.keys()
    }
}

impl Transform for RegionsSelector {
    fn name(&self) -> &str {
        "regions_selector"
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn outputs(&self) -> Vec<String> {
        self.outputs.clone()
    }

    fn as_regions_selector(&self) -> Option<&RegionsSelector> {
        Some(self)
    }
}
