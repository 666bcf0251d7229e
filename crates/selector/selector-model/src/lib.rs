//! selector-model: label mappers and regions selectors as plain value objects.

pub mod error;
pub mod label_mapper;
pub mod regions;
pub mod scalar;
pub mod transform;

pub use error::ModelError;
pub use label_mapper::{
    ArrayMapper, DiscreteDictMapper, LabelMapper, LabelMapperKind, RangeDictMapper,
    ScalarModelMapper, DEFAULT_ATOL,
};
pub use regions::{Fallback, RegionsSelector, Selection};
pub use scalar::{Interval, Scalar};
pub use transform::{Mapping, OpaqueTransform, Transform, TransformRef};
