use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_rational::Rational64;
use num_traits::{One, Zero};

/// Named coordinate or parameter symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

/// Build a list of symbols from their names
pub fn symbols(names: &[&str]) -> Vec<Symbol> {
    names.iter().copied().map(Symbol::new).collect()
}

/// Elementary functions of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Sin,
    Cos,
    Exp,
    Ln,
    Sqrt,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Sqrt => "sqrt",
        }
    }

    pub fn apply_f64(self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Exp => x.exp(),
            Func::Ln => x.ln(),
            Func::Sqrt => x.sqrt(),
        }
    }
}

/// Symbolic expression with exact rational constants
///
/// Values built through the constructors and arithmetic operators are kept in
/// canonical form (see [`Expr::simplify`]), so structurally equal results
/// compare equal with `==`. The variants are public for pattern matching;
/// hand-assembled trees should be passed through `simplify` before comparing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    Num(Rational64),
    Sym(Symbol),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, i32),
    Func(Func, Box<Expr>),
}

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Num(Rational64::from_integer(n))
    }

    /// Exact fraction `numer / denom`
    ///
    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        Expr::Num(Rational64::new(numer, denom))
    }

    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Sym(Symbol::new(name))
    }

    /// `base^exp` for an integer exponent
    pub fn pow(base: Expr, exp: i32) -> Self {
        Expr::Pow(Box::new(base), exp).simplify()
    }

    pub fn sin(arg: Expr) -> Self {
        Expr::Func(Func::Sin, Box::new(arg)).simplify()
    }

    pub fn cos(arg: Expr) -> Self {
        Expr::Func(Func::Cos, Box::new(arg)).simplify()
    }

    pub fn exp(arg: Expr) -> Self {
        Expr::Func(Func::Exp, Box::new(arg)).simplify()
    }

    pub fn ln(arg: Expr) -> Self {
        Expr::Func(Func::Ln, Box::new(arg)).simplify()
    }

    pub fn sqrt(arg: Expr) -> Self {
        Expr::Func(Func::Sqrt, Box::new(arg)).simplify()
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Num(_))
    }

    pub fn as_number(&self) -> Option<&Rational64> {
        match self {
            Expr::Num(n) => Some(n),
            _ => None,
        }
    }

    /// Number of nodes in the expression tree
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Sym(_) => 1,
            Expr::Add(items) | Expr::Mul(items) => {
                1 + items.iter().map(Expr::node_count).sum::<usize>()
            }
            Expr::Pow(base, _) => 1 + base.node_count(),
            Expr::Func(_, arg) => 1 + arg.node_count(),
        }
    }
}

pub(crate) fn rational_to_f64(n: &Rational64) -> f64 {
    *n.numer() as f64 / *n.denom() as f64
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::int(i64::from(n))
    }
}

impl From<Rational64> for Expr {
    fn from(n: Rational64) -> Self {
        Expr::Num(n)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Sym(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::Sym(s.clone())
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, rhs]).simplify()
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, -rhs]).simplify()
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, rhs]).simplify()
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, Expr::Pow(Box::new(rhs), -1)]).simplify()
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Mul(vec![Expr::int(-1), self]).simplify()
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -self.clone()
    }
}

macro_rules! forward_ref_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $imp::$method(self.clone(), rhs.clone())
            }
        }

        impl $imp<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $imp::$method(self.clone(), rhs)
            }
        }

        impl $imp<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $imp::$method(self, rhs.clone())
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);
forward_ref_binop!(Mul, mul);
forward_ref_binop!(Div, div);

impl Zero for Expr {
    fn zero() -> Self {
        Expr::Num(Rational64::zero())
    }

    fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_zero())
    }
}

impl One for Expr {
    fn one() -> Self {
        Expr::Num(Rational64::one())
    }
}
