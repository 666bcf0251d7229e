//! selector-tree: converters between tagged document nodes and the
//! label mapper / regions selector model.
//!
//! The document engine hands over nodes whose nested tagged objects are
//! already resolved (arrays, transforms); converters only reshape.

pub mod config;
pub mod converter;
pub mod error;
pub mod label_mapper;
pub mod node;
pub mod regions;

pub use config::{DecodeDefaults, MapperOptions};
pub use converter::{Converter, NestedResolver, Resolved};
pub use error::ConvertError;
pub use label_mapper::LabelMapperConverter;
pub use node::{Node, NodeMap, NodeMapExt};
pub use regions::RegionsSelectorConverter;
