pub mod core;
pub mod symbolic;
pub mod tensor;

// Flat re-exports for convenience
pub use crate::core::{Error, IndexConfig, Result, Scalar, Variance};

// Re-export symbolic types
pub use symbolic::{symbols, Expr, Func, Symbol};

// Re-export tensor types
pub use tensor::{predefined, MetricTensor, RelativityTensor, DEFAULT_METRIC_NAME};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::core::{Error, Result, Scalar};
    pub use crate::symbolic::{symbols, Expr, Symbol};
    pub use crate::tensor::{predefined, MetricTensor, RelativityTensor};
}
