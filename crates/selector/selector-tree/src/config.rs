//! Decode defaults and the per-node options derived from them.

use serde::{Deserialize, Deserializer, Serialize};

use selector_model::{Mapping, Scalar, DEFAULT_ATOL};

use crate::{ConvertError, NodeMap, NodeMapExt};

/// Values assumed for optional label mapper fields a document leaves out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeDefaults {
    /// Tolerance for discrete dictionary mappers.
    pub atol: f64,
    /// Sentinel for model-backed mappers. JSON has no NaN, so a NaN
    /// sentinel is written as `null` and `null` reads back as NaN.
    #[serde(deserialize_with = "nan_from_null")]
    pub no_label: Scalar,
}

fn nan_from_null<'de, D>(deserializer: D) -> Result<Scalar, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.unwrap_or_else(Scalar::nan))
}

impl Default for DecodeDefaults {
    fn default() -> Self {
        Self {
            atol: DEFAULT_ATOL,
            no_label: Scalar::nan(),
        }
    }
}

impl DecodeDefaults {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Optional label mapper fields, validated once at decode entry.
#[derive(Clone, Debug, PartialEq)]
pub struct MapperOptions {
    pub atol: f64,
    pub no_label: Scalar,
    pub inputs_mapping: Option<Mapping>,
}

impl MapperOptions {
    pub fn from_node(node: &NodeMap, defaults: &DecodeDefaults) -> Result<Self, ConvertError> {
        let inputs_mapping = match node.optional("inputs_mapping") {
            None => None,
            Some(field) => Some(
                field
                    .as_transform()
                    .and_then(|t| t.as_mapping())
                    .cloned()
                    .ok_or_else(|| {
                        ConvertError::TypeConstraint(
                            "inputs_mapping must be a Mapping transform".to_string(),
                        )
                    })?,
            ),
        };

        let atol = node
            .optional("atol")
            .map(|n| n.as_f64().ok_or(ConvertError::invalid("atol", "a number")))
            .transpose()?
            .unwrap_or(defaults.atol);

        let no_label = node
            .optional("no_label")
            .map(|n| n.as_scalar().ok_or(ConvertError::invalid("no_label", "a scalar")))
            .transpose()?
            .unwrap_or_else(|| defaults.no_label.clone());

        Ok(Self {
            atol,
            no_label,
            inputs_mapping,
        })
    }
}
