use thiserror::Error;

/// Errors produced while converting between nodes and models.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    TypeConstraint(String),
    #[error("GWCS currently only supports 2D masks (got ndim={ndim})")]
    UnsupportedShape { ndim: usize },
    #[error("Unrecognized type of {expected} - {repr}")]
    UnrecognizedType { expected: &'static str, repr: String },
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("'{0}' must contain at least one label")]
    EmptyLabels(&'static str),
}

impl ConvertError {
    pub(crate) fn invalid(field: &'static str, expected: &'static str) -> Self {
        ConvertError::InvalidField { field, expected }
    }
}
