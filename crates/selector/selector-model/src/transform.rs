//! The opaque transform capability.
//!
//! Models are shared by handle: a [`TransformRef`] compares by identity, so a
//! model that goes through a decode/encode cycle is the same object on the
//! other side. The capability probes (`as_mapping`, `as_label_mapper`, ...)
//! replace runtime type tests.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::{LabelMapper, ModelError, RegionsSelector};

pub trait Transform: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Ordered input names.
    fn inputs(&self) -> Vec<String>;

    /// Ordered output names.
    fn outputs(&self) -> Vec<String>;

    fn n_inputs(&self) -> usize {
        self.inputs().len()
    }

    fn n_outputs(&self) -> usize {
        self.outputs().len()
    }

    fn as_mapping(&self) -> Option<&Mapping> {
        None
    }

    fn as_label_mapper(&self) -> Option<&LabelMapper> {
        None
    }

    fn as_regions_selector(&self) -> Option<&RegionsSelector> {
        None
    }
}

/// Shared handle to a transform; equality is identity.
#[derive(Clone)]
pub struct TransformRef(Arc<dyn Transform>);

impl TransformRef {
    pub fn new<T: Transform + 'static>(transform: T) -> Self {
        TransformRef(Arc::new(transform))
    }

    pub fn from_arc(inner: Arc<dyn Transform>) -> Self {
        TransformRef(inner)
    }

    pub fn ptr_eq(&self, other: &TransformRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Deref for TransformRef {
    type Target = dyn Transform;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for TransformRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for TransformRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A transform known only by name and signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueTransform {
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl OpaqueTransform {
    pub fn new(
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = impl Into<String>>,
        outputs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }
}

impl Transform for OpaqueTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn outputs(&self) -> Vec<String> {
        self.outputs.clone()
    }
}

/// Reorders or selects coordinates ahead of label lookup.
///
/// Output `i` is input `indices[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapping {
    indices: Vec<usize>,
    n_inputs: usize,
}

impl Mapping {
    /// Mapping whose input count is implied by the largest index.
    pub fn new(indices: Vec<usize>) -> Self {
        let n_inputs = indices.iter().max().map_or(0, |m| m + 1);
        Self { indices, n_inputs }
    }

    pub fn with_n_inputs(indices: Vec<usize>, n_inputs: usize) -> Result<Self, ModelError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= n_inputs) {
            return Err(ModelError::MappingIndex { index, n_inputs });
        }
        Ok(Self { indices, n_inputs })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_identity(&self) -> bool {
        self.indices.len() == self.n_inputs
            && self.indices.iter().enumerate().all(|(i, &j)| i == j)
    }

    /// Select coordinates in mapping order.
    pub fn apply(&self, coords: &[f64]) -> Result<Vec<f64>, ModelError> {
        if coords.len() != self.n_inputs {
            return Err(ModelError::Arity {
                expected: self.n_inputs,
                got: coords.len(),
            });
        }
        Ok(self.indices.iter().map(|&i| coords[i]).collect())
    }
}

impl Transform for Mapping {
    fn name(&self) -> &str {
        "mapping"
    }

    fn inputs(&self) -> Vec<String> {
        (0..self.n_inputs).map(|i| format!("x{i}")).collect()
    }

    fn outputs(&self) -> Vec<String> {
        self.indices.iter().map(|i| format!("x{i}")).collect()
    }

    fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    fn as_mapping(&self) -> Option<&Mapping> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_ref_equality_is_identity() {
        let a = TransformRef::new(OpaqueTransform::new("shift", ["x"], ["x"]));
        let b = TransformRef::new(OpaqueTransform::new("shift", ["x"], ["x"]));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn mapping_selects_coordinates() {
        let m = Mapping::new(vec![1, 0]);
        assert_eq!(m.n_inputs(), 2);
        assert_eq!(m.apply(&[3.0, 4.0]).unwrap(), vec![4.0, 3.0]);
        assert!(!m.is_identity());
        assert!(Mapping::new(vec![0, 1]).is_identity());
    }

    #[test]
    fn mapping_rejects_bad_index_and_arity() {
        assert_eq!(
            Mapping::with_n_inputs(vec![0, 3], 2),
            Err(ModelError::MappingIndex {
                index: 3,
                n_inputs: 2
            })
        );
        let m = Mapping::with_n_inputs(vec![0], 3).unwrap();
        assert_eq!(m.outputs(), vec!["x0".to_string()]);
        assert!(matches!(
            m.apply(&[1.0]),
            Err(ModelError::Arity { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn only_mapping_exposes_mapping_capability() {
        let opaque = TransformRef::new(OpaqueTransform::new("poly", ["x"], ["y"]));
        assert!(opaque.as_mapping().is_none());
        let mapping = TransformRef::new(Mapping::new(vec![0]));
        assert!(mapping.as_mapping().is_some());
    }
}
