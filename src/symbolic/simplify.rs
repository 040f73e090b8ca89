//! Canonicalising simplifier for [`Expr`].
//!
//! Canonical form:
//! - sums are flat, hold at most one leading constant and no two terms that
//!   differ only by their rational coefficient;
//! - products are flat, hold at most one leading coefficient and each base at
//!   most once, raised to a non-zero integer power;
//! - powers never nest and never have a product, a number or an even power of
//!   a square root as their base;
//! - operands are ordered by the derived `Ord` on `Expr`.
//!
//! The builders below assume their operands are already canonical.

use std::collections::BTreeMap;

use num_rational::Rational64;
use num_traits::{One, Signed, Zero};

use super::expr::{Expr, Func};

impl Expr {
    /// Rewrite into canonical form
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Num(_) | Expr::Sym(_) => self.clone(),
            Expr::Add(terms) => sum(terms.iter().map(Expr::simplify).collect()),
            Expr::Mul(factors) => product(factors.iter().map(Expr::simplify).collect()),
            Expr::Pow(base, exp) => power(base.simplify(), *exp),
            Expr::Func(f, arg) => function(*f, arg.simplify()),
        }
    }

    /// Multiply out products of sums and positive integer powers of sums
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Num(_) | Expr::Sym(_) => self.clone(),
            Expr::Add(terms) => sum(terms.iter().map(Expr::expand).collect()),
            Expr::Mul(factors) => factors
                .iter()
                .map(Expr::expand)
                .fold(Expr::one(), |acc, f| distribute(&acc, &f)),
            Expr::Pow(base, exp) if *exp > 1 => {
                let base = base.expand();
                (0..*exp).fold(Expr::one(), |acc, _| distribute(&acc, &base))
            }
            Expr::Pow(base, exp) => power(base.expand(), *exp),
            Expr::Func(f, arg) => function(*f, arg.expand()),
        }
    }
}

/// Split a canonical term into its rational coefficient and the rest
pub(crate) fn split_coefficient(term: Expr) -> (Rational64, Expr) {
    match term {
        Expr::Num(n) => (n, Expr::one()),
        Expr::Mul(mut factors) => match factors.first() {
            Some(Expr::Num(c)) => {
                let c = *c;
                factors.remove(0);
                let rest = if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Expr::Mul(factors)
                };
                (c, rest)
            }
            _ => (Rational64::one(), Expr::Mul(factors)),
        },
        other => (Rational64::one(), other),
    }
}

pub(crate) fn with_coefficient(c: Rational64, rest: Expr) -> Expr {
    if c.is_one() {
        return rest;
    }
    match rest {
        Expr::Num(n) => Expr::Num(c * n),
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::Num(c));
            Expr::Mul(factors)
        }
        other => Expr::Mul(vec![Expr::Num(c), other]),
    }
}

fn sum(terms: Vec<Expr>) -> Expr {
    let mut constant = Rational64::zero();
    let mut collected: BTreeMap<Expr, Rational64> = BTreeMap::new();
    let mut pending = terms;

    while let Some(term) = pending.pop() {
        match term {
            Expr::Num(n) => constant += n,
            Expr::Add(inner) => pending.extend(inner),
            other => {
                let (c, rest) = split_coefficient(other);
                *collected.entry(rest).or_insert_with(Rational64::zero) += c;
            }
        }
    }

    let mut out = Vec::with_capacity(collected.len() + 1);
    if !constant.is_zero() {
        out.push(Expr::Num(constant));
    }
    out.extend(
        collected
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(rest, c)| with_coefficient(c, rest)),
    );

    match out.len() {
        0 => Expr::zero(),
        1 => out.remove(0),
        _ => Expr::Add(out),
    }
}

fn product(factors: Vec<Expr>) -> Expr {
    let mut coeff = Rational64::one();
    let mut powers: BTreeMap<Expr, i32> = BTreeMap::new();
    let mut pending = factors;

    loop {
        while let Some(factor) = pending.pop() {
            match factor {
                Expr::Num(n) => coeff *= n,
                Expr::Mul(inner) => pending.extend(inner),
                Expr::Pow(base, exp) => *powers.entry(*base).or_insert(0) += exp,
                other => *powers.entry(other).or_insert(0) += 1,
            }
        }

        // sqrt(x)^(2k) collapses to x^k, which may itself need collecting
        let roots: Vec<Expr> = powers
            .iter()
            .filter(|(base, exp)| {
                matches!(base, Expr::Func(Func::Sqrt, _)) && **exp != 0 && **exp % 2 == 0
            })
            .map(|(base, _)| base.clone())
            .collect();
        if roots.is_empty() {
            break;
        }
        for root in roots {
            if let (Some(exp), Expr::Func(_, arg)) = (powers.remove(&root), root) {
                pending.push(power(*arg, exp / 2));
            }
        }
    }

    if coeff.is_zero() {
        return Expr::zero();
    }

    let mut out = Vec::with_capacity(powers.len() + 1);
    for (base, exp) in powers {
        if exp == 0 {
            continue;
        }
        match power(base, exp) {
            Expr::Num(n) if n.is_zero() => return Expr::zero(),
            Expr::Num(n) => coeff *= n,
            other => out.push(other),
        }
    }

    if !coeff.is_one() || out.is_empty() {
        out.insert(0, Expr::Num(coeff));
    }
    match out.len() {
        1 => out.remove(0),
        _ => Expr::Mul(out),
    }
}

fn power(base: Expr, exp: i32) -> Expr {
    if exp == 0 {
        return Expr::one();
    }
    if exp == 1 {
        return base;
    }
    match base {
        Expr::Num(n) if n.is_zero() => {
            if exp > 0 {
                Expr::zero()
            } else {
                Expr::Pow(Box::new(Expr::Num(n)), exp)
            }
        }
        Expr::Num(n) => Expr::Num(n.pow(exp)),
        Expr::Pow(inner, k) => power(*inner, k * exp),
        Expr::Mul(factors) => product(factors.into_iter().map(|f| power(f, exp)).collect()),
        Expr::Func(Func::Sqrt, arg) if exp % 2 == 0 => power(*arg, exp / 2),
        other => Expr::Pow(Box::new(other), exp),
    }
}

fn function(f: Func, arg: Expr) -> Expr {
    match (f, arg) {
        (Func::Sin, arg) if arg.is_zero() => Expr::zero(),
        (Func::Cos, arg) | (Func::Exp, arg) if arg.is_zero() => Expr::one(),
        (Func::Ln, Expr::Num(n)) if n.is_one() => Expr::zero(),
        (Func::Exp, Expr::Func(Func::Ln, inner)) => *inner,
        (Func::Ln, Expr::Func(Func::Exp, inner)) => *inner,
        (Func::Sqrt, Expr::Num(n)) if !n.is_negative() => match exact_sqrt(n) {
            Some(root) => Expr::Num(root),
            None => Expr::Func(Func::Sqrt, Box::new(Expr::Num(n))),
        },
        (f, arg) => Expr::Func(f, Box::new(arg)),
    }
}

fn exact_sqrt(n: Rational64) -> Option<Rational64> {
    let numer = integer_sqrt(*n.numer())?;
    let denom = integer_sqrt(*n.denom())?;
    Some(Rational64::new(numer, denom))
}

fn integer_sqrt(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    let root = (n as f64).sqrt().round() as i64;
    (root.checked_mul(root) == Some(n)).then_some(root)
}

fn summands(e: &Expr) -> Vec<Expr> {
    match e {
        Expr::Add(terms) => terms.clone(),
        other => vec![other.clone()],
    }
}

fn distribute(a: &Expr, b: &Expr) -> Expr {
    let lhs = summands(a);
    let rhs = summands(b);
    sum(lhs
        .iter()
        .flat_map(|x| rhs.iter().map(move |y| product(vec![x.clone(), y.clone()])))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::sym("x")
    }

    fn y() -> Expr {
        Expr::sym("y")
    }

    #[test]
    fn test_collect_like_terms() {
        let e = Expr::int(2) * x() + Expr::int(3) * x();
        assert_eq!(e, Expr::int(5) * x());

        let cancelled = x() + y() - x();
        assert_eq!(cancelled, y());
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(Expr::int(2) + Expr::rational(1, 2), Expr::rational(5, 2));
        assert_eq!(Expr::int(6) / Expr::int(4), Expr::rational(3, 2));
        assert_eq!(Expr::int(0) * x(), Expr::zero());
    }

    #[test]
    fn test_collect_powers() {
        assert_eq!(x() * x(), Expr::pow(x(), 2));
        assert_eq!(x() / x(), Expr::one());
        assert_eq!(Expr::pow(x(), 3) / x(), Expr::pow(x(), 2));
    }

    #[test]
    fn test_nested_powers_fold() {
        let inv = Expr::pow(x() + Expr::int(1), -1);
        assert_eq!(Expr::pow(inv, -1), x() + Expr::int(1));
    }

    #[test]
    fn test_power_distributes_over_product() {
        let e = Expr::pow(Expr::int(2) * x() * y(), -1);
        let expected = Expr::rational(1, 2) * Expr::pow(x(), -1) * Expr::pow(y(), -1);
        assert_eq!(e, expected);
    }

    #[test]
    fn test_sqrt_rules() {
        assert_eq!(Expr::sqrt(Expr::rational(9, 4)), Expr::rational(3, 2));
        assert_eq!(Expr::pow(Expr::sqrt(x()), 2), x());
        assert_eq!(Expr::sqrt(x()) * Expr::sqrt(x()), x());
        assert!(matches!(Expr::sqrt(Expr::int(2)), Expr::Func(Func::Sqrt, _)));
    }

    #[test]
    fn test_function_constants() {
        assert_eq!(Expr::sin(Expr::zero()), Expr::zero());
        assert_eq!(Expr::cos(Expr::zero()), Expr::one());
        assert_eq!(Expr::exp(Expr::zero()), Expr::one());
        assert_eq!(Expr::ln(Expr::one()), Expr::zero());
        assert_eq!(Expr::exp(Expr::ln(x())), x());
    }

    #[test]
    fn test_simplify_hand_built_tree() {
        let raw = Expr::Mul(vec![
            x(),
            Expr::Add(vec![Expr::int(1), Expr::int(-1)]),
            y(),
        ]);
        assert_eq!(raw.simplify(), Expr::zero());

        let raw = Expr::Add(vec![Expr::Mul(vec![x(), Expr::int(2)]), Expr::Mul(vec![Expr::int(-2), x()])]);
        assert_eq!(raw.simplify(), Expr::zero());
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let e = (x() + Expr::int(1)) * Expr::pow(y(), -2) - Expr::rational(1, 3) * x();
        assert_eq!(e.simplify(), e);
    }

    #[test]
    fn test_expand() {
        let square = Expr::pow(x() + y(), 2).expand();
        let expected = Expr::pow(x(), 2) + Expr::int(2) * x() * y() + Expr::pow(y(), 2);
        assert_eq!(square, expected);

        let diff = (x() + y()) * (x() - y());
        assert_eq!(diff.expand(), Expr::pow(x(), 2) - Expr::pow(y(), 2));
    }

    #[test]
    fn test_split_coefficient() {
        let (c, rest) = split_coefficient(Expr::int(-3) * x());
        assert_eq!(c, Rational64::from_integer(-3));
        assert_eq!(rest, x());
        assert_eq!(with_coefficient(c, rest), Expr::int(-3) * x());
    }
}
