//! Label mappers: route an input coordinate to a discrete label.
//!
//! Four shapes of the same concept live behind one sum type:
//! - [`ArrayMapper`]: a 2D array of labels indexed by pixel position.
//! - [`ScalarModelMapper`]: a transform that computes the label.
//! - [`DiscreteDictMapper`]: scalar label -> transform.
//! - [`RangeDictMapper`]: interval label -> transform.

use indexmap::IndexMap;
use ndarray::ArrayD;

use crate::{Interval, Mapping, ModelError, Scalar, Transform, TransformRef};

/// Tolerance used when matching numeric labels in a [`DiscreteDictMapper`].
pub const DEFAULT_ATOL: f64 = 1e-8;

/// Discriminant of [`LabelMapper`], handy for logging and dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LabelMapperKind {
    Array,
    Model,
    Dict,
    Range,
}

impl LabelMapperKind {
    /// Stable name used in logs and as the transform name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelMapperKind::Array => "label_mapper_array",
            LabelMapperKind::Model => "label_mapper",
            LabelMapperKind::Dict => "label_mapper_dict",
            LabelMapperKind::Range => "label_mapper_range",
        }
    }
}

/// A label mapper of any shape. Exactly one variant describes a given
/// document; converters dispatch on it instead of on runtime types.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelMapper {
    /// Labels read from a 2D mask.
    Array(ArrayMapper),
    /// Labels computed by a transform.
    Model(ScalarModelMapper),
    /// Scalar label -> transform table.
    Dict(DiscreteDictMapper),
    /// Interval label -> transform table.
    Range(RangeDictMapper),
}

/// Label mapper backed by an array of labels.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayMapper {
    /// Labels laid out on the detector grid.
    pub mapper: ArrayD<f64>,
    /// Optional reorder of the inputs before indexing the mask.
    pub inputs_mapping: Option<Mapping>,
}

impl ArrayMapper {
    /// Wrap a label array. Dimensionality is checked by the decoder, not here.
    pub fn new(mapper: ArrayD<f64>, inputs_mapping: Option<Mapping>) -> Self {
        Self {
            mapper,
            inputs_mapping,
        }
    }

    /// Label stored at `index`.
    pub fn label_at(&self, index: &[usize]) -> Result<f64, ModelError> {
        self.mapper
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::IndexOutOfBounds(index.to_vec()))
    }
}

/// Label mapper whose label is the output of a transform.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarModelMapper {
    /// Ordered input names.
    pub inputs: Vec<String>,
    /// Transform whose output is the label.
    pub mapper: TransformRef,
    pub inputs_mapping: Option<Mapping>,
    /// Value the transform produces when no label applies; NaN by default.
    pub no_label: Scalar,
}

impl ScalarModelMapper {
    pub fn new(
        inputs: Vec<String>,
        mapper: TransformRef,
        inputs_mapping: Option<Mapping>,
        no_label: Scalar,
    ) -> Self {
        Self {
            inputs,
            mapper,
            inputs_mapping,
            no_label,
        }
    }
}

/// Label mapper keyed by scalar labels.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteDictMapper {
    /// Explicit input names; `None` when the document omitted them.
    pub inputs: Option<Vec<String>>,
    /// Label -> transform, in document order.
    pub mapper: IndexMap<Scalar, TransformRef>,
    pub inputs_mapping: Option<Mapping>,
    /// Tolerance for numeric label matches, see [`DiscreteDictMapper::find`].
    pub atol: f64,
}

impl DiscreteDictMapper {
    pub fn new(
        inputs: Option<Vec<String>>,
        mapper: IndexMap<Scalar, TransformRef>,
        inputs_mapping: Option<Mapping>,
        atol: f64,
    ) -> Self {
        Self {
            inputs,
            mapper,
            inputs_mapping,
            atol,
        }
    }

    /// Exact key first, then the first numeric key within `atol`.
    pub fn find(&self, label: &Scalar) -> Option<&TransformRef> {
        self.mapper.get(label).or_else(|| {
            self.mapper
                .iter()
                .find(|(key, _)| key.approx_eq(label, self.atol))
                .map(|(_, transform)| transform)
        })
    }
}

/// Label mapper keyed by closed intervals.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeDictMapper {
    /// Explicit input names; `None` when the document omitted them.
    pub inputs: Option<Vec<String>>,
    /// Interval -> transform, in document order. Lookups scan in this order.
    pub mapper: IndexMap<Interval, TransformRef>,
    pub inputs_mapping: Option<Mapping>,
}

impl RangeDictMapper {
    pub fn new(
        inputs: Option<Vec<String>>,
        mapper: IndexMap<Interval, TransformRef>,
        inputs_mapping: Option<Mapping>,
    ) -> Self {
        Self {
            inputs,
            mapper,
            inputs_mapping,
        }
    }

    /// First interval, in insertion order, containing `x`.
    pub fn find(&self, x: f64) -> Option<(&Interval, &TransformRef)> {
        self.mapper.iter().find(|(interval, _)| interval.contains(x))
    }
}

impl LabelMapper {
    /// Which of the four shapes this mapper has.
    pub fn kind(&self) -> LabelMapperKind {
        match self {
            LabelMapper::Array(_) => LabelMapperKind::Array,
            LabelMapper::Model(_) => LabelMapperKind::Model,
            LabelMapper::Dict(_) => LabelMapperKind::Dict,
            LabelMapper::Range(_) => LabelMapperKind::Range,
        }
    }

    /// Input reorder applied before label lookup, if any.
    pub fn inputs_mapping(&self) -> Option<&Mapping> {
        match self {
            LabelMapper::Array(m) => m.inputs_mapping.as_ref(),
            LabelMapper::Model(m) => m.inputs_mapping.as_ref(),
            LabelMapper::Dict(m) => m.inputs_mapping.as_ref(),
            LabelMapper::Range(m) => m.inputs_mapping.as_ref(),
        }
    }

    /// Sentinel returned when no label matches. Only the model-backed
    /// variant is configurable; the others report `0`.
    pub fn no_label(&self) -> Scalar {
        match self {
            LabelMapper::Model(m) => m.no_label.clone(),
            _ => Scalar::Int(0),
        }
    }

    /// Tolerance carried by the discrete dictionary variant.
    pub fn atol(&self) -> Option<f64> {
        match self {
            LabelMapper::Dict(m) => Some(m.atol),
            _ => None,
        }
    }
}

fn implied_inputs<'a>(
    inputs_mapping: Option<&Mapping>,
    mut models: impl Iterator<Item = &'a TransformRef>,
) -> Vec<String> {
    if let Some(mapping) = inputs_mapping {
        return mapping.inputs();
    }
    models.next().map(|m| m.inputs()).unwrap_or_default()
}

impl Transform for LabelMapper {
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    fn inputs(&self) -> Vec<String> {
        match self {
            LabelMapper::Array(m) => match &m.inputs_mapping {
                Some(mapping) => mapping.inputs(),
                None => (0..m.mapper.ndim()).map(|i| format!("x{i}")).collect(),
            },
            LabelMapper::Model(m) => m.inputs.clone(),
            LabelMapper::Dict(m) => m
                .inputs
                .clone()
                .unwrap_or_else(|| implied_inputs(m.inputs_mapping.as_ref(), m.mapper.values())),
            LabelMapper::Range(m) => m
                .inputs
                .clone()
                .unwrap_or_else(|| implied_inputs(m.inputs_mapping.as_ref(), m.mapper.values())),
        }
    }

    fn outputs(&self) -> Vec<String> {
        vec!["label".to_string()]
    }

    fn as_label_mapper(&self) -> Option<&LabelMapper> {
        Some(self)
    }
}

impl From<ArrayMapper> for LabelMapper {
    fn from(m: ArrayMapper) -> Self {
        LabelMapper::Array(m)
    }
}

impl From<ScalarModelMapper> for LabelMapper {
    fn from(m: ScalarModelMapper) -> Self {
        LabelMapper::Model(m)
    }
}

impl From<DiscreteDictMapper> for LabelMapper {
    fn from(m: DiscreteDictMapper) -> Self {
        LabelMapper::Dict(m)
    }
}

impl From<RangeDictMapper> for LabelMapper {
    fn from(m: RangeDictMapper) -> Self {
        LabelMapper::Range(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpaqueTransform;
    use ndarray::{Array2, IxDyn};

    fn model(name: &str) -> TransformRef {
        TransformRef::new(OpaqueTransform::new(name, ["x", "y"], ["z"]))
    }

    #[test]
    fn array_label_lookup() {
        let arr = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .into_dyn();
        let mapper = ArrayMapper::new(arr, None);
        assert_eq!(mapper.label_at(&[1, 0]).unwrap(), 3.0);
        assert_eq!(
            mapper.label_at(&[2, 0]),
            Err(ModelError::IndexOutOfBounds(vec![2, 0]))
        );
        let lm = LabelMapper::from(mapper);
        assert_eq!(lm.inputs(), vec!["x0".to_string(), "x1".to_string()]);
        assert_eq!(lm.no_label(), Scalar::Int(0));
    }

    #[test]
    fn dict_find_uses_tolerance() {
        let a = model("a");
        let mut map = IndexMap::new();
        map.insert(Scalar::Float(1.0), a.clone());
        map.insert(Scalar::Float(2.0), model("b"));
        let dict = DiscreteDictMapper::new(None, map, None, 1e-3);
        assert_eq!(dict.find(&Scalar::Float(1.0005)), Some(&a));
        assert_eq!(dict.find(&Scalar::Int(1)), Some(&a));
        assert!(dict.find(&Scalar::Float(1.5)).is_none());
    }

    #[test]
    fn range_find_prefers_insertion_order() {
        let first = model("first");
        let mut map = IndexMap::new();
        map.insert(Interval::new(0.0, 5.0), first.clone());
        map.insert(Interval::new(4.0, 9.0), model("second"));
        let range = RangeDictMapper::new(None, map, None);
        let (interval, transform) = range.find(4.5).unwrap();
        assert_eq!(*interval, Interval::new(0.0, 5.0));
        assert_eq!(transform, &first);
        assert!(range.find(10.0).is_none());
    }

    #[test]
    fn implied_inputs_fall_back_to_mapping_then_models() {
        let mut map = IndexMap::new();
        map.insert(Scalar::Int(1), model("a"));
        let dict = LabelMapper::from(DiscreteDictMapper::new(
            None,
            map.clone(),
            None,
            DEFAULT_ATOL,
        ));
        assert_eq!(dict.inputs(), vec!["x".to_string(), "y".to_string()]);

        let mapped = LabelMapper::from(DiscreteDictMapper::new(
            None,
            map,
            Some(Mapping::new(vec![2])),
            DEFAULT_ATOL,
        ));
        assert_eq!(mapped.inputs().len(), 3);
        assert_eq!(mapped.atol(), Some(DEFAULT_ATOL));
    }

    #[test]
    fn model_mapper_carries_no_label() {
        let lm = LabelMapper::from(ScalarModelMapper::new(
            vec!["x".into()],
            model("m"),
            None,
            Scalar::nan(),
        ));
        assert!(lm.no_label().is_nan());
        assert_eq!(lm.kind(), LabelMapperKind::Model);
        assert_eq!(lm.outputs(), vec!["label".to_string()]);
        assert!(lm.atol().is_none());
        let arr = ArrayD::<f64>::zeros(IxDyn(&[1, 1]));
        assert!(LabelMapper::from(ArrayMapper::new(arr, None))
            .inputs_mapping()
            .is_none());
    }
}
