use std::collections::HashMap;

use ndarray::{Array, Array2, Dimension};
use tracing::debug;

use crate::core::{Error, IndexConfig, Result, Scalar, Variance};
use crate::symbolic::{Expr, Symbol};
use crate::tensor::linalg;
use crate::tensor::naming::change_name;

/// Tensor over a coordinate chart: components, coordinate symbols, index
/// configuration and an optional name.
///
/// The configuration string is stored verbatim; only its length is checked
/// against the rank on construction. Operations that depend on the variance
/// of each index parse it and fail with [`Error::InvalidConfig`] if it holds
/// anything other than 'u' and 'l'.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativityTensor<T: Scalar = Expr, D: Dimension = ndarray::IxDyn> {
    arr: Array<T, D>,
    syms: Vec<Symbol>,
    config: String,
    name: Option<String>,
}

impl<T: Scalar, D: Dimension> RelativityTensor<T, D> {
    pub fn new(
        arr: Array<T, D>,
        syms: Vec<Symbol>,
        config: &str,
        name: Option<String>,
    ) -> Result<Self> {
        let got = config.chars().count();
        if got != arr.ndim() {
            return Err(Error::ConfigLength {
                expected: arr.ndim(),
                got,
            });
        }
        if let Some(&len) = arr.shape().iter().find(|&&len| len != syms.len()) {
            return Err(Error::DimensionMismatch {
                expected: syms.len(),
                got: len,
            });
        }
        Ok(RelativityTensor {
            arr,
            syms,
            config: config.to_owned(),
            name,
        })
    }

    /// Rank of the tensor
    pub fn order(&self) -> usize {
        self.arr.ndim()
    }

    /// Number of coordinates
    pub fn dims(&self) -> usize {
        self.syms.len()
    }

    pub fn tensor(&self) -> &Array<T, D> {
        &self.arr
    }

    pub fn into_tensor(self) -> Array<T, D> {
        self.arr
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.syms
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parsed variance of every index
    pub fn variances(&self) -> Result<IndexConfig> {
        IndexConfig::parse_with_order(&self.config, self.order())
    }

    /// Components as nested row vectors (rank 2 and up flatten the leading axes)
    pub fn to_nested_vec(&self) -> Vec<Vec<T>> {
        let inner = self.arr.shape().last().copied().unwrap_or(1).max(1);
        let flat: Vec<T> = self.arr.iter().cloned().collect();
        flat.chunks(inner).map(<[T]>::to_vec).collect()
    }

    /// Every component simplified
    pub fn simplify(&self) -> Self {
        RelativityTensor {
            arr: self.arr.map(|x| x.simplify()),
            ..self.clone()
        }
    }

    /// Change of coordinates by the linear map `transformation`
    ///
    /// Upper indices transform with the matrix itself, lower indices with
    /// the transpose of its inverse:
    /// `T'^a_b = L^a_c (L^-1)^d_b T^c_d`.
    pub fn lorentz_transform(&self, transformation: &Array2<T>) -> Result<Self> {
        let n = linalg::square_dim(transformation)?;
        if n != self.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                got: n,
            });
        }
        let config = self.variances()?;
        debug!(config = %config, dims = n, "lorentz transform");

        let lower = if config.variances().contains(&Variance::Lower) {
            Some(linalg::invert(transformation)?.t().to_owned())
        } else {
            None
        };

        let mut t = self.arr.clone().into_dyn();
        for (axis, variance) in config.variances().iter().enumerate() {
            let m = match (variance, &lower) {
                (Variance::Lower, Some(inv_t)) => inv_t,
                _ => transformation,
            };
            t = linalg::contract_axis(&t, m, axis);
        }

        let arr = t
            .into_dimensionality::<D>()
            .map_err(|_| Error::DimensionMismatch {
                expected: self.order(),
                got: self.arr.ndim(),
            })?;
        Ok(RelativityTensor {
            arr,
            syms: self.syms.clone(),
            config: self.config.clone(),
            name: change_name(self.name(), "__lt"),
        })
    }
}

impl<D: Dimension> RelativityTensor<Expr, D> {
    /// Substitute `value` for `symbol` in every component
    pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Self {
        RelativityTensor {
            arr: self.arr.map(|x| x.subs(symbol, value)),
            ..self.clone()
        }
    }

    /// Numeric components with every symbol bound by `env`
    pub fn evaluate(&self, env: &HashMap<Symbol, f64>) -> Result<Array<f64, D>> {
        let values = self
            .arr
            .iter()
            .map(|x| x.eval(env))
            .collect::<Result<Vec<f64>>>()?;
        Array::from_shape_vec(self.arr.raw_dim(), values).map_err(|_| Error::DimensionMismatch {
            expected: self.arr.len(),
            got: self.arr.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbols;
    use ndarray::{arr1, arr2, ArrayD, IxDyn};

    fn boost() -> Array2<Expr> {
        // beta = 3/5, gamma = 5/4
        arr2(&[
            [Expr::rational(5, 4), Expr::rational(-3, 4)],
            [Expr::rational(-3, 4), Expr::rational(5, 4)],
        ])
    }

    #[test]
    fn test_new_validates_config_length() {
        let arr = ArrayD::from_elem(IxDyn(&[2, 2, 2]), Expr::int(0));
        let err = RelativityTensor::new(arr, symbols(&["t", "x"]), "ll", None).unwrap_err();
        assert_eq!(err, Error::ConfigLength { expected: 3, got: 2 });
    }

    #[test]
    fn test_new_validates_dimensions() {
        let arr = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let err = RelativityTensor::new(arr, symbols(&["t", "x", "y"]), "ll", None).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 3, got: 2 });
    }

    #[test]
    fn test_accessors() {
        let arr = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let t = RelativityTensor::new(arr, symbols(&["t", "x"]), "ul", Some("T".into())).unwrap();
        assert_eq!(t.order(), 2);
        assert_eq!(t.dims(), 2);
        assert_eq!(t.config(), "ul");
        assert_eq!(t.name(), Some("T"));
        assert_eq!(t.to_nested_vec(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(t.variances().unwrap().to_string(), "ul");
    }

    #[test]
    fn test_lorentz_transform_vector() {
        // Boosting the rest-frame four-velocity (1, 0) gives (gamma, -gamma beta)
        let v = arr1(&[Expr::int(1), Expr::int(0)]);
        let t = RelativityTensor::new(v, symbols(&["t", "x"]), "u", Some("U".into())).unwrap();
        let boosted = t.lorentz_transform(&boost()).unwrap();
        assert_eq!(
            boosted.tensor(),
            &arr1(&[Expr::rational(5, 4), Expr::rational(-3, 4)])
        );
        assert_eq!(boosted.name(), Some("U__lt"));
    }

    #[test]
    fn test_lorentz_transform_covector_uses_inverse() {
        let v = arr1(&[Expr::int(1), Expr::int(0)]);
        let t = RelativityTensor::new(v, symbols(&["t", "x"]), "l", None).unwrap();
        let boosted = t.lorentz_transform(&boost()).unwrap();
        // inverse boost has beta = -3/5
        assert_eq!(
            boosted.tensor(),
            &arr1(&[Expr::rational(5, 4), Expr::rational(3, 4)])
        );
        assert_eq!(boosted.name(), None);
    }

    #[test]
    fn test_contraction_is_invariant() {
        let u = arr1(&[Expr::sym("a"), Expr::sym("b")]);
        let w = arr1(&[Expr::sym("c"), Expr::sym("d")]);
        let up = RelativityTensor::new(u, symbols(&["t", "x"]), "u", None).unwrap();
        let down = RelativityTensor::new(w, symbols(&["t", "x"]), "l", None).unwrap();

        let up_t = up.lorentz_transform(&boost()).unwrap();
        let down_t = down.lorentz_transform(&boost()).unwrap();

        let before = up.tensor()[0].clone() * down.tensor()[0].clone()
            + up.tensor()[1].clone() * down.tensor()[1].clone();
        let after = up_t.tensor()[0].clone() * down_t.tensor()[0].clone()
            + up_t.tensor()[1].clone() * down_t.tensor()[1].clone();
        assert_eq!(after.expand(), before.expand());
    }

    #[test]
    fn test_lorentz_transform_rejects_bad_input() {
        let arr = arr2(&[[Expr::int(1), Expr::int(0)], [Expr::int(0), Expr::int(1)]]);
        let t = RelativityTensor::new(arr.clone(), symbols(&["t", "x"]), "xy", None).unwrap();
        assert_eq!(
            t.lorentz_transform(&boost()),
            Err(Error::InvalidConfig("xy".to_string()))
        );

        let t = RelativityTensor::new(arr, symbols(&["t", "x"]), "ll", None).unwrap();
        let wrong = Array2::from_elem((3, 3), Expr::int(1));
        assert_eq!(
            t.lorentz_transform(&wrong),
            Err(Error::DimensionMismatch { expected: 2, got: 3 })
        );
    }

    #[test]
    fn test_subs_and_evaluate() {
        let arr = arr2(&[
            [Expr::sym("a"), Expr::int(0)],
            [Expr::int(0), Expr::pow(Expr::sym("r"), 2)],
        ]);
        let t = RelativityTensor::new(arr, symbols(&["t", "r"]), "ll", None).unwrap();
        let t = t.subs(&Symbol::new("a"), &Expr::int(-1));
        assert_eq!(t.tensor()[[0, 0]], Expr::int(-1));

        let env = HashMap::from([(Symbol::new("r"), 3.0)]);
        assert_eq!(t.evaluate(&env).unwrap(), arr2(&[[-1.0, 0.0], [0.0, 9.0]]));
    }
}
