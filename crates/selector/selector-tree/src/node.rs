//! The node tree exchanged with the document engine.
//!
//! Plain data (`Null` .. `Map`) mirrors a YAML/JSON document. `Array` and
//! `Transform` carry objects the engine has already resolved from nested
//! tagged nodes; converters pass them through untouched.

use indexmap::IndexMap;
use ndarray::ArrayD;
use serde_json::{Map, Number, Value as JsonValue};

use selector_model::{Mapping, Scalar, TransformRef};

use crate::ConvertError;

/// Insertion-ordered mapping node; emitted keys keep the order they were set.
pub type NodeMap = IndexMap<String, Node>;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Node>),
    Map(NodeMap),
    /// Resolved n-dimensional numeric array.
    Array(ArrayD<f64>),
    /// Resolved transform model.
    Transform(TransformRef),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::Str(_) => "string",
            Node::Seq(_) => "sequence",
            Node::Map(_) => "mapping",
            Node::Array(_) => "ndarray",
            Node::Transform(_) => "transform",
        }
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Node::Int(i) => Some(Scalar::Int(*i)),
            Node::Float(f) => Some(Scalar::Float(*f)),
            Node::Str(s) => Some(Scalar::Text(s.clone())),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Int(i) => Some(*i as f64),
            Node::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<&TransformRef> {
        match self {
            Node::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// Only sequences count as iterable; strings are scalar labels.
    pub fn is_iterable(&self) -> bool {
        matches!(self, Node::Seq(_))
    }

    /// Sequence of strings.
    pub fn names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Node {
        Node::Seq(names.into_iter().map(|n| Node::Str(n.into())).collect())
    }

    /// Wrap an input mapping as a resolved transform node.
    pub fn from_mapping(mapping: &Mapping) -> Node {
        Node::Transform(TransformRef::new(mapping.clone()))
    }

    /// Build a plain-data node from JSON. Object key order follows the
    /// iteration order of the JSON map.
    pub fn from_json(value: JsonValue) -> Node {
        match value {
            JsonValue::Null => Node::Null,
            JsonValue::Bool(b) => Node::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Node::Str(s),
            JsonValue::Array(items) => Node::Seq(items.into_iter().map(Node::from_json).collect()),
            JsonValue::Object(obj) => Node::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, Node::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Plain-data view of the node. `None` when the tree holds resolved
    /// objects or non-finite floats, which JSON cannot carry.
    pub fn to_json(&self) -> Option<JsonValue> {
        Some(match self {
            Node::Null => JsonValue::Null,
            Node::Bool(b) => JsonValue::Bool(*b),
            Node::Int(i) => JsonValue::from(*i),
            Node::Float(f) => JsonValue::Number(Number::from_f64(*f)?),
            Node::Str(s) => JsonValue::String(s.clone()),
            Node::Seq(items) => JsonValue::Array(
                items
                    .iter()
                    .map(Node::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Node::Map(map) => {
                let mut obj = Map::new();
                for (key, val) in map {
                    obj.insert(key.clone(), val.to_json()?);
                }
                JsonValue::Object(obj)
            }
            Node::Array(_) | Node::Transform(_) => return None,
        })
    }
}

impl From<Scalar> for Node {
    fn from(v: Scalar) -> Self {
        match v {
            Scalar::Int(i) => Node::Int(i),
            Scalar::Float(f) => Node::Float(f),
            Scalar::Text(s) => Node::Str(s),
        }
    }
}

impl From<TransformRef> for Node {
    fn from(t: TransformRef) -> Self {
        Node::Transform(t)
    }
}

impl From<ArrayD<f64>> for Node {
    fn from(a: ArrayD<f64>) -> Self {
        Node::Array(a)
    }
}

impl From<NodeMap> for Node {
    fn from(m: NodeMap) -> Self {
        Node::Map(m)
    }
}

/// Field access on mapping nodes. `Null` values read as absent.
pub trait NodeMapExt {
    fn optional(&self, key: &str) -> Option<&Node>;

    fn required(&self, key: &'static str) -> Result<&Node, ConvertError>;

    /// Required sequence of names.
    fn required_names(&self, key: &'static str) -> Result<Vec<String>, ConvertError> {
        names(key, self.required(key)?)
    }

    fn optional_names(&self, key: &'static str) -> Result<Option<Vec<String>>, ConvertError> {
        self.optional(key).map(|node| names(key, node)).transpose()
    }
}

impl NodeMapExt for NodeMap {
    fn optional(&self, key: &str) -> Option<&Node> {
        match self.get(key) {
            None | Some(Node::Null) => None,
            Some(node) => Some(node),
        }
    }

    fn required(&self, key: &'static str) -> Result<&Node, ConvertError> {
        self.optional(key).ok_or(ConvertError::MissingField(key))
    }
}

fn names(field: &'static str, node: &Node) -> Result<Vec<String>, ConvertError> {
    let items = node
        .as_seq()
        .ok_or_else(|| ConvertError::invalid(field, "a sequence of names"))?;
    items
        .iter()
        .map(|item| match item {
            Node::Str(s) => Ok(s.clone()),
            _ => Err(ConvertError::invalid(field, "a sequence of names")),
        })
        .collect()
}
