//! Label mapper node <-> [`LabelMapper`].
//!
//! Decode picks the variant from the shape of `mapper`, in this order:
//! resolved ndarray, resolved transform, `{labels, models}` table. A table
//! whose first label is a sequence is a range mapper, otherwise a discrete
//! one. Encode always writes `no_label` but writes `inputs_mapping` only
//! when set; table mappers likewise write `inputs` only when set.

use indexmap::IndexMap;
use log::{debug, trace, warn};

use selector_model::{
    ArrayMapper, DiscreteDictMapper, Interval, LabelMapper, RangeDictMapper, Scalar,
    ScalarModelMapper, Transform, TransformRef,
};

use crate::{
    ConvertError, Converter, DecodeDefaults, MapperOptions, NestedResolver, Node, NodeMap,
    NodeMapExt, Resolved,
};

pub const LABEL_MAPPER_TAGS: &[&str] = &["tag:stsci.edu:gwcs/label_mapper-*"];

const LABEL_MAPPER_TYPES: &[&str] = &[
    "ArrayMapper",
    "ScalarModelMapper",
    "DiscreteDictMapper",
    "RangeDictMapper",
];

#[derive(Clone, Debug, Default)]
pub struct LabelMapperConverter {
    defaults: DecodeDefaults,
}

impl LabelMapperConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: DecodeDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &DecodeDefaults {
        &self.defaults
    }

    pub fn decode_label_mapper(&self, node: &NodeMap) -> Result<LabelMapper, ConvertError> {
        let options = MapperOptions::from_node(node, &self.defaults)?;
        let decoded = match node.required("mapper")? {
            Node::Array(array) => {
                if array.ndim() != 2 {
                    return Err(ConvertError::UnsupportedShape { ndim: array.ndim() });
                }
                LabelMapper::Array(ArrayMapper::new(array.clone(), options.inputs_mapping))
            }
            Node::Transform(model) => {
                let inputs = node.required_names("inputs")?;
                LabelMapper::Model(ScalarModelMapper::new(
                    inputs,
                    model.clone(),
                    options.inputs_mapping,
                    options.no_label,
                ))
            }
            Node::Map(table) => decode_table(node, table, options)?,
            other => {
                debug!("unusable mapper node: {}", other.kind_name());
                return Err(ConvertError::invalid(
                    "mapper",
                    "an ndarray, a transform or a labels/models table",
                ));
            }
        };
        debug!("decoded {}", decoded.kind().as_str());
        Ok(decoded)
    }

    /// Encode a label mapper into a node. Table mappers write `inputs` only
    /// when the model carries explicit names, so an omitted field stays
    /// omitted. Empty tables are rejected, as decode would reject them.
    pub fn encode_label_mapper(&self, model: &LabelMapper) -> Result<NodeMap, ConvertError> {
        let mut node = NodeMap::new();
        node.insert("no_label".into(), Node::from(model.no_label()));
        if let Some(mapping) = model.inputs_mapping() {
            node.insert("inputs_mapping".into(), Node::from_mapping(mapping));
        }

        match model {
            LabelMapper::Array(m) => {
                node.insert("mapper".into(), Node::Array(m.mapper.clone()));
            }
            LabelMapper::Model(m) => {
                node.insert("mapper".into(), Node::Transform(m.mapper.clone()));
                node.insert("inputs".into(), Node::names(m.inputs.iter().cloned()));
            }
            LabelMapper::Dict(m) => {
                if m.mapper.is_empty() {
                    return Err(ConvertError::EmptyLabels("labels"));
                }
                node.insert("atol".into(), Node::Float(m.atol));
                let labels = m.mapper.keys().cloned().map(Node::from).collect();
                node.insert("mapper".into(), table(labels, m.mapper.values()));
                if let Some(inputs) = &m.inputs {
                    node.insert("inputs".into(), Node::names(inputs.iter().cloned()));
                }
            }
            LabelMapper::Range(m) => {
                if m.mapper.is_empty() {
                    return Err(ConvertError::EmptyLabels("labels"));
                }
                let labels = m
                    .mapper
                    .keys()
                    .map(|iv| Node::Seq(iv.bounds().into_iter().map(Node::Float).collect()))
                    .collect();
                node.insert("mapper".into(), table(labels, m.mapper.values()));
                if let Some(inputs) = &m.inputs {
                    node.insert("inputs".into(), Node::names(inputs.iter().cloned()));
                }
            }
        }
        trace!("encoded {} with {} fields", model.kind().as_str(), node.len());
        Ok(node)
    }
}

fn table<'a>(labels: Vec<Node>, models: impl Iterator<Item = &'a TransformRef>) -> Node {
    let mut table = NodeMap::new();
    table.insert("labels".into(), Node::Seq(labels));
    table.insert(
        "models".into(),
        Node::Seq(models.cloned().map(Node::Transform).collect()),
    );
    Node::Map(table)
}

fn decode_table(
    node: &NodeMap,
    table: &NodeMap,
    options: MapperOptions,
) -> Result<LabelMapper, ConvertError> {
    let inputs = node.optional_names("inputs")?;
    let labels = table
        .required("labels")?
        .as_seq()
        .ok_or(ConvertError::invalid("labels", "a sequence"))?;
    let models = table
        .required("models")?
        .as_seq()
        .ok_or(ConvertError::invalid("models", "a sequence"))?;
    let first = labels.first().ok_or(ConvertError::EmptyLabels("labels"))?;

    if labels.len() != models.len() {
        warn!(
            "label mapper has {} labels but {} models; extra entries are ignored",
            labels.len(),
            models.len()
        );
    }
    let models = models
        .iter()
        .map(|m| {
            m.as_transform()
                .cloned()
                .ok_or(ConvertError::invalid("models", "a sequence of transforms"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if first.is_iterable() {
        let mut mapper = IndexMap::with_capacity(labels.len());
        for (label, model) in labels.iter().zip(models) {
            mapper.insert(interval(label)?, model);
        }
        return Ok(LabelMapper::Range(RangeDictMapper::new(
            inputs,
            mapper,
            options.inputs_mapping,
        )));
    }

    let mut mapper = IndexMap::with_capacity(labels.len());
    for (label, model) in labels.iter().zip(models) {
        mapper.insert(scalar_label(label)?, model);
    }
    Ok(LabelMapper::Dict(DiscreteDictMapper::new(
        inputs,
        mapper,
        options.inputs_mapping,
        options.atol,
    )))
}

fn interval(label: &Node) -> Result<Interval, ConvertError> {
    match label.as_seq() {
        Some([lower, upper]) => match (lower.as_f64(), upper.as_f64()) {
            (Some(lower), Some(upper)) => Ok(Interval::new(lower, upper)),
            _ => Err(ConvertError::invalid("labels", "numeric [lower, upper] pairs")),
        },
        _ => Err(ConvertError::invalid("labels", "numeric [lower, upper] pairs")),
    }
}

fn scalar_label(label: &Node) -> Result<Scalar, ConvertError> {
    label
        .as_scalar()
        .ok_or(ConvertError::invalid("labels", "scalar labels"))
}

impl Converter for LabelMapperConverter {
    type Model = LabelMapper;

    fn tags(&self) -> &'static [&'static str] {
        LABEL_MAPPER_TAGS
    }

    fn type_names(&self) -> &'static [&'static str] {
        LABEL_MAPPER_TYPES
    }

    fn decode(&self, node: &NodeMap, tag: &str) -> Result<LabelMapper, ConvertError> {
        trace!("decoding {tag}");
        self.decode_label_mapper(node)
    }

    fn encode(&self, model: &dyn Transform) -> Result<NodeMap, ConvertError> {
        let mapper = model
            .as_label_mapper()
            .ok_or_else(|| ConvertError::UnrecognizedType {
                expected: "LabelMapper",
                repr: format!("{model:?}"),
            })?;
        self.encode_label_mapper(mapper)
    }
}

/// Decodes inline label mapper tables as well as resolved ones.
impl NestedResolver for LabelMapperConverter {
    fn resolve_label_mapper(&self, node: &Node) -> Result<LabelMapper, ConvertError> {
        match node {
            Node::Map(map) => self.decode_label_mapper(map),
            other => Resolved.resolve_label_mapper(other),
        }
    }
}
