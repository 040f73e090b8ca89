//! Ready-made metrics in geometrised units (c = G = 1), signature (-, +, +, +).

use std::rc::Rc;

use ndarray::Array2;
use num_traits::Zero;

use crate::core::Result;
use crate::symbolic::{symbols, Expr, Symbol};
use crate::tensor::metric::MetricTensor;

/// Minkowski metric of flat spacetime in `dim` dimensions,
/// coordinates `t, x1, x2, ...`
pub fn minkowski(dim: usize) -> Result<Rc<MetricTensor>> {
    let syms: Vec<Symbol> = (0..dim)
        .map(|i| {
            if i == 0 {
                Symbol::new("t")
            } else {
                Symbol::new(format!("x{i}"))
            }
        })
        .collect();
    let arr = diagonal(
        (0..dim)
            .map(|i| if i == 0 { Expr::int(-1) } else { Expr::int(1) })
            .collect(),
    );
    MetricTensor::named(arr, syms, "ll", Some("MinkowskiMetric"))
}

/// Flat spacetime in spherical coordinates `t, r, theta, phi`
pub fn flat_spherical() -> Result<Rc<MetricTensor>> {
    let r = Expr::sym("r");
    let theta = Expr::sym("theta");
    let arr = diagonal(vec![
        Expr::int(-1),
        Expr::int(1),
        Expr::pow(r.clone(), 2),
        Expr::pow(r, 2) * Expr::pow(Expr::sin(theta), 2),
    ]);
    MetricTensor::named(
        arr,
        symbols(&["t", "r", "theta", "phi"]),
        "ll",
        Some("FlatSphericalMetric"),
    )
}

/// Schwarzschild metric in coordinates `t, r, theta, phi`, with the
/// Schwarzschild radius as the free symbol `r_s`
pub fn schwarzschild() -> Result<Rc<MetricTensor>> {
    let r = Expr::sym("r");
    let theta = Expr::sym("theta");
    let f = Expr::int(1) - Expr::sym("r_s") / r.clone();
    let arr = diagonal(vec![
        -f.clone(),
        Expr::pow(f, -1),
        Expr::pow(r.clone(), 2),
        Expr::pow(r, 2) * Expr::pow(Expr::sin(theta), 2),
    ]);
    MetricTensor::named(
        arr,
        symbols(&["t", "r", "theta", "phi"]),
        "ll",
        Some("SchwarzschildMetric"),
    )
}

fn diagonal(entries: Vec<Expr>) -> Array2<Expr> {
    let n = entries.len();
    let mut arr = Array2::from_elem((n, n), Expr::zero());
    for (i, e) in entries.into_iter().enumerate() {
        arr[[i, i]] = e;
    }
    arr
}
