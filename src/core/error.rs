use thiserror::Error;

/// Errors that can occur during tensor operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Index configuration has the wrong number of indices
    #[error("config should be of length {expected}, got {got}")]
    ConfigLength { expected: usize, got: usize },

    /// Index configuration is not a valid combination of 'u' and 'l'
    #[error("invalid configuration '{0}' for tensor")]
    InvalidConfig(String),

    /// Dimension mismatch
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Matrix has no inverse
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// Numeric evaluation hit a symbol with no value
    #[error("no value supplied for symbol '{0}'")]
    UnboundSymbol(String),

    /// Numeric evaluation produced NaN or infinity
    #[error("evaluation of '{0}' is not finite")]
    NonFinite(String),
}

/// Result type for tensor operations
pub type Result<T> = std::result::Result<T, Error>;
