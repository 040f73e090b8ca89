pub mod config;
pub mod error;
pub mod traits;

pub use config::{IndexConfig, Variance};
pub use error::{Error, Result};
pub use traits::Scalar;
