use thiserror::Error;

/// Errors raised by model constructors and label lookups.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("mapping index {index} out of range for {n_inputs} inputs")]
    MappingIndex { index: usize, n_inputs: usize },
    #[error("expected {expected} coordinates, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("label array index {0:?} out of bounds")]
    IndexOutOfBounds(Vec<usize>),
}
