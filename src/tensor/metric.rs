use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use ndarray::{Array2, Ix2};
use tracing::{debug, trace};

use crate::core::{Error, Result, Scalar};
use crate::symbolic::{Expr, Symbol};
use crate::tensor::base::RelativityTensor;
use crate::tensor::linalg;
use crate::tensor::naming::change_name;

/// Name given to metrics constructed without an explicit one
pub const DEFAULT_METRIC_NAME: &str = "GenericMetricTensor";

/// Link from a metric to its inverse.
///
/// A metric that computed its inverse through [`MetricTensor::inv`] owns it;
/// the inverse only points back weakly, so the pair never forms an `Rc` cycle.
#[derive(Debug)]
enum InverseLink<T: Scalar> {
    Owned(Rc<MetricTensor<T>>),
    Back(Weak<MetricTensor<T>>),
}

/// Metric tensor of a spacetime: a symmetric rank-2 tensor with a cached
/// inverse.
///
/// Metrics are handed out as `Rc<MetricTensor>` because several operations
/// return the receiver itself (see [`MetricTensor::change_config`]) and the
/// inverse cache hands out the same instance on every call. Instances are
/// never mutated apart from that cache.
///
/// # Example
///
/// ```
/// use ndarray::arr2;
/// use relativity::prelude::*;
///
/// let g = MetricTensor::new(
///     arr2(&[[Expr::int(-1), Expr::int(0)], [Expr::int(0), Expr::int(1)]]),
///     symbols(&["t", "x"]),
///     "ll",
/// )
/// .unwrap();
/// let g_inv = g.inv().unwrap();
/// assert_eq!(g_inv.config(), "uu");
/// assert_eq!(g_inv.arr(), g.arr());
/// ```
#[derive(Debug)]
pub struct MetricTensor<T: Scalar = Expr> {
    base: RelativityTensor<T, Ix2>,
    inverse: RefCell<Option<InverseLink<T>>>,
}

impl<T: Scalar> MetricTensor<T> {
    /// Metric named [`DEFAULT_METRIC_NAME`]
    pub fn new(arr: Array2<T>, syms: Vec<Symbol>, config: &str) -> Result<Rc<Self>> {
        Self::named(arr, syms, config, Some(DEFAULT_METRIC_NAME))
    }

    /// Only the length of `config` is validated here; unknown characters are
    /// reported by the operations that need to interpret them.
    pub fn named(
        arr: Array2<T>,
        syms: Vec<Symbol>,
        config: &str,
        name: Option<&str>,
    ) -> Result<Rc<Self>> {
        let got = config.chars().count();
        if got != 2 {
            return Err(Error::ConfigLength { expected: 2, got });
        }
        let base = RelativityTensor::new(arr, syms, config, name.map(str::to_owned))?;
        trace!(name = ?base.name(), config, dims = base.dims(), "metric constructed");
        Ok(Rc::new(MetricTensor {
            base,
            inverse: RefCell::new(None),
        }))
    }

    /// Build from row vectors
    pub fn from_rows(rows: Vec<Vec<T>>, syms: Vec<Symbol>, config: &str) -> Result<Rc<Self>> {
        let n = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                got: row.len(),
            });
        }
        let flat: Vec<T> = rows.into_iter().flatten().collect();
        let arr = Array2::from_shape_vec((n, n), flat).map_err(|_| Error::DimensionMismatch {
            expected: n * n,
            got: n * n,
        })?;
        Self::new(arr, syms, config)
    }

    pub fn arr(&self) -> &Array2<T> {
        self.base.tensor()
    }

    /// Same as [`MetricTensor::arr`]
    pub fn tensor(&self) -> &Array2<T> {
        self.base.tensor()
    }

    pub fn symbols(&self) -> &[Symbol] {
        self.base.symbols()
    }

    pub fn config(&self) -> &str {
        self.base.config()
    }

    pub fn name(&self) -> Option<&str> {
        self.base.name()
    }

    pub fn dims(&self) -> usize {
        self.base.dims()
    }

    pub fn order(&self) -> usize {
        2
    }

    pub fn to_nested_vec(&self) -> Vec<Vec<T>> {
        self.base.to_nested_vec()
    }

    /// Underlying generic tensor
    pub fn as_tensor(&self) -> &RelativityTensor<T, Ix2> {
        &self.base
    }

    /// Metric with a different index configuration.
    ///
    /// - the current configuration returns `self`;
    /// - `"uu"` <-> `"ll"` inverts the components, and the result remembers
    ///   `self` as its inverse;
    /// - `"ul"` and `"lu"` give the Kronecker delta whatever the components;
    /// - anything else is rejected.
    pub fn change_config(self: &Rc<Self>, newconfig: &str) -> Result<Rc<Self>> {
        if newconfig == self.config() {
            return Ok(Rc::clone(self));
        }
        let got = newconfig.chars().count();
        if got != 2 {
            return Err(Error::ConfigLength { expected: 2, got });
        }
        let name = change_name(self.name(), &format!("__{newconfig}"));

        match (self.config(), newconfig) {
            ("ll", "uu") | ("uu", "ll") => {
                debug!(from = self.config(), to = newconfig, "inverting metric");
                let components = linalg::invert(self.arr())?;
                let inverse =
                    Self::named(components, self.symbols().to_vec(), newconfig, name.as_deref())?;
                *inverse.inverse.borrow_mut() = Some(InverseLink::Back(Rc::downgrade(self)));
                Ok(inverse)
            }
            (_, "ul") | (_, "lu") => {
                debug!(from = self.config(), to = newconfig, "mixed metric is the identity");
                Self::named(
                    linalg::identity(self.dims()),
                    self.symbols().to_vec(),
                    newconfig,
                    name.as_deref(),
                )
            }
            _ => Err(Error::InvalidConfig(newconfig.to_owned())),
        }
    }

    /// Inverse metric: contravariant for a covariant metric and vice versa.
    ///
    /// The result is cached, so repeated calls return the same `Rc`.
    /// Any configuration other than `"ll"` is inverted towards `"ll"`, which
    /// fails with [`Error::InvalidConfig`] for the mixed configurations.
    pub fn inv(self: &Rc<Self>) -> Result<Rc<Self>> {
        if let Some(cached) = self.cached_inverse() {
            trace!(name = ?self.name(), "inverse cache hit");
            return Ok(cached);
        }
        let target = if self.config() == "ll" { "uu" } else { "ll" };
        let inverse = self.change_config(target)?;
        *self.inverse.borrow_mut() = Some(InverseLink::Owned(Rc::clone(&inverse)));
        Ok(inverse)
    }

    /// Covariant form: `self` when already `"ll"`, otherwise [`MetricTensor::inv`]
    pub fn lower_config(self: &Rc<Self>) -> Result<Rc<Self>> {
        if self.config() == "ll" {
            return Ok(Rc::clone(self));
        }
        self.inv()
    }

    /// Metric in coordinates related to the current ones by `transformation`
    pub fn lorentz_transform(&self, transformation: &Array2<T>) -> Result<Rc<Self>> {
        let transformed = self.base.lorentz_transform(transformation)?;
        Self::named(
            transformed.into_tensor(),
            self.symbols().to_vec(),
            self.config(),
            change_name(self.name(), "__lt").as_deref(),
        )
    }

    /// Every component simplified
    pub fn simplify(&self) -> Result<Rc<Self>> {
        self.rewrap(self.base.simplify())
    }

    fn rewrap(&self, base: RelativityTensor<T, Ix2>) -> Result<Rc<Self>> {
        Self::named(base.into_tensor(), self.symbols().to_vec(), self.config(), self.name())
    }

    fn cached_inverse(&self) -> Option<Rc<Self>> {
        match &*self.inverse.borrow() {
            Some(InverseLink::Owned(inverse)) => Some(Rc::clone(inverse)),
            Some(InverseLink::Back(parent)) => parent.upgrade(),
            None => None,
        }
    }
}

impl MetricTensor<Expr> {
    /// Substitute `value` for `symbol` in every component
    pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Result<Rc<Self>> {
        self.rewrap(self.base.subs(symbol, value))
    }

    /// Numeric components with every symbol bound by `env`
    pub fn evaluate(&self, env: &HashMap<Symbol, f64>) -> Result<Array2<f64>> {
        self.base.evaluate(env)
    }
}
