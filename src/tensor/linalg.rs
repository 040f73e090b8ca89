use ndarray::{Array2, ArrayD, Axis, Dimension};
use tracing::trace;

use crate::core::{Error, Result, Scalar};

/// n x n identity
pub fn identity<T: Scalar>(n: usize) -> Array2<T> {
    Array2::from_shape_fn((n, n), |(i, j)| if i == j { T::one() } else { T::zero() })
}

/// Check that `m` is square and return its side length
pub fn square_dim<T>(m: &Array2<T>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::DimensionMismatch {
            expected: rows,
            got: cols,
        });
    }
    Ok(rows)
}

/// Inverse by Gauss-Jordan elimination, simplifying every entry as it goes
///
/// The pivot in each column is the candidate with the largest
/// [`Scalar::pivot_weight`]; a column without a non-zero candidate makes the
/// matrix singular. Symbolic entries that are zero but not recognised as zero
/// by the simplifier are treated as non-zero.
pub fn invert<T: Scalar>(m: &Array2<T>) -> Result<Array2<T>> {
    let n = square_dim(m)?;
    let mut a = m.map(|x| x.simplify());
    let mut inv = identity::<T>(n);

    for col in 0..n {
        let (pivot_row, weight) = (col..n)
            .map(|r| (r, a[[r, col]].pivot_weight()))
            .fold((col, 0.0), |best, cand| if cand.1 > best.1 { cand } else { best });
        if weight == 0.0 {
            return Err(Error::SingularMatrix);
        }
        if pivot_row != col {
            trace!(col, pivot_row, "swapping rows");
            for j in 0..n {
                a.swap([col, j], [pivot_row, j]);
                inv.swap([col, j], [pivot_row, j]);
            }
        }

        let scale = (T::one() / a[[col, col]].clone()).simplify();
        for j in 0..n {
            a[[col, j]] = (a[[col, j]].clone() * scale.clone()).simplify();
            inv[[col, j]] = (inv[[col, j]].clone() * scale.clone()).simplify();
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[[r, col]].clone();
            if factor.is_zero() {
                continue;
            }
            for j in 0..n {
                a[[r, j]] = (a[[r, j]].clone() - factor.clone() * a[[col, j]].clone()).simplify();
                inv[[r, j]] =
                    (inv[[r, j]].clone() - factor.clone() * inv[[col, j]].clone()).simplify();
            }
        }
    }

    Ok(inv)
}

/// Contract `m` into one axis of `t`: `out[.., a, ..] = sum_b m[a, b] * t[.., b, ..]`
pub fn contract_axis<T: Scalar>(t: &ArrayD<T>, m: &Array2<T>, axis: usize) -> ArrayD<T> {
    let n = t.len_of(Axis(axis));
    ArrayD::from_shape_fn(t.raw_dim(), |idx| {
        let mut src = idx.slice().to_vec();
        let a = idx[axis];
        (0..n)
            .fold(T::zero(), |acc, b| {
                src[axis] = b;
                acc + m[[a, b]].clone() * t[&src[..]].clone()
            })
            .simplify()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Expr;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn test_identity() {
        let id = identity::<f64>(3);
        assert_eq!(id, arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]));
    }

    #[test]
    fn test_invert_numeric() {
        let m = arr2(&[[4.0, 7.0], [2.0, 6.0]]);
        let inv = invert(&m).unwrap();
        let expected = arr2(&[[0.6, -0.7], [-0.2, 0.4]]);
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(inv[[i, j]], expected[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_invert_needs_row_swap() {
        let m = arr2(&[[0.0, 1.0], [1.0, 0.0]]);
        assert_eq!(invert(&m).unwrap(), m);
    }

    #[test]
    fn test_invert_exact_rational() {
        let m = arr2(&[[Expr::int(2), Expr::int(1)], [Expr::int(1), Expr::int(1)]]);
        let inv = invert(&m).unwrap();
        let expected = arr2(&[[Expr::int(1), Expr::int(-1)], [Expr::int(-1), Expr::int(2)]]);
        assert_eq!(inv, expected);
    }

    #[test]
    fn test_invert_symbolic_diagonal() {
        let a = Expr::sym("a");
        let b = Expr::sym("b");
        let m = arr2(&[[a.clone(), Expr::int(0)], [Expr::int(0), b.clone()]]);
        let inv = invert(&m).unwrap();
        assert_eq!(inv[[0, 0]], Expr::pow(a, -1));
        assert_eq!(inv[[1, 1]], Expr::pow(b, -1));
        assert_eq!(inv[[0, 1]], Expr::int(0));
    }

    #[test]
    fn test_invert_singular() {
        let m = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(invert(&m), Err(Error::SingularMatrix));
    }

    #[test]
    fn test_invert_non_square() {
        let m = Array2::<f64>::zeros((2, 3));
        assert!(matches!(invert(&m), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_contract_axis() {
        let t = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
        let swap = arr2(&[[0.0, 1.0], [1.0, 0.0]]);
        let rows_swapped = contract_axis(&t, &swap, 0);
        assert_eq!(rows_swapped, arr2(&[[3.0, 4.0], [1.0, 2.0]]).into_dyn());
        let cols_swapped = contract_axis(&t, &swap, 1);
        assert_eq!(cols_swapped, arr2(&[[2.0, 1.0], [4.0, 3.0]]).into_dyn());
    }
}
