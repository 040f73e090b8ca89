//! Minimal symbolic expression layer backing tensor components.

pub mod display;
pub mod eval;
pub mod expr;
pub mod simplify;

pub use expr::{symbols, Expr, Func, Symbol};
