use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::{One, Zero};

use crate::symbolic::expr::rational_to_f64;
use crate::symbolic::Expr;

/// Field of tensor components
///
/// Every tensor operation in this crate is generic over `Scalar`, so the same
/// code path serves exact symbolic components ([`Expr`]) and plain numeric
/// components (`f64`).
pub trait Scalar:
    Clone
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Canonical, simplified form of the value
    fn simplify(&self) -> Self;

    /// Preference for using this value as an elimination pivot.
    ///
    /// Zero means the value cannot be a pivot; larger is better.
    fn pivot_weight(&self) -> f64;
}

impl Scalar for f64 {
    fn simplify(&self) -> Self {
        *self
    }

    fn pivot_weight(&self) -> f64 {
        self.abs()
    }
}

impl Scalar for Expr {
    fn simplify(&self) -> Self {
        Expr::simplify(self)
    }

    /// Numbers are weighted by magnitude, symbolic values prefer small trees
    fn pivot_weight(&self) -> f64 {
        match self {
            Expr::Num(n) => rational_to_f64(n).abs(),
            other => 1.0 / other.node_count() as f64,
        }
    }
}
