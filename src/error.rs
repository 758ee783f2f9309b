use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("not enough observations: model needs at least {required}, got {actual}")]
    InsufficientObservations { required: usize, actual: usize },

    #[error("wrong number of model parameters: expected {expected}, got {actual}")]
    ParameterCount { expected: usize, actual: usize },

    #[error("assignment matrix is too big: {size} > {max}")]
    AssignmentTooLarge { size: usize, max: usize },

    #[error("assignment could not be solved: {0}")]
    Assignment(String),
}
