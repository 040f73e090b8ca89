use std::collections::{BTreeSet, HashMap};

use super::expr::{rational_to_f64, Expr, Symbol};
use crate::core::{Error, Result};

impl Expr {
    /// Replace every occurrence of `symbol` by `value`, then simplify
    pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Expr {
        self.replace(symbol, value).simplify()
    }

    fn replace(&self, symbol: &Symbol, value: &Expr) -> Expr {
        match self {
            Expr::Sym(s) if s == symbol => value.clone(),
            Expr::Num(_) | Expr::Sym(_) => self.clone(),
            Expr::Add(terms) => Expr::Add(terms.iter().map(|t| t.replace(symbol, value)).collect()),
            Expr::Mul(factors) => {
                Expr::Mul(factors.iter().map(|x| x.replace(symbol, value)).collect())
            }
            Expr::Pow(base, exp) => Expr::Pow(Box::new(base.replace(symbol, value)), *exp),
            Expr::Func(f, arg) => Expr::Func(*f, Box::new(arg.replace(symbol, value))),
        }
    }

    /// Symbols appearing in the expression
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Add(items) | Expr::Mul(items) => {
                items.iter().for_each(|e| e.collect_symbols(out));
            }
            Expr::Pow(base, _) => base.collect_symbols(out),
            Expr::Func(_, arg) => arg.collect_symbols(out),
        }
    }

    /// Numeric value with every symbol bound by `env`
    pub fn eval(&self, env: &HashMap<Symbol, f64>) -> Result<f64> {
        let value = self.eval_unchecked(env)?;
        if !value.is_finite() {
            return Err(Error::NonFinite(self.to_string()));
        }
        Ok(value)
    }

    fn eval_unchecked(&self, env: &HashMap<Symbol, f64>) -> Result<f64> {
        match self {
            Expr::Num(n) => Ok(rational_to_f64(n)),
            Expr::Sym(s) => env
                .get(s)
                .copied()
                .ok_or_else(|| Error::UnboundSymbol(s.name().to_owned())),
            Expr::Add(terms) => terms.iter().try_fold(0.0, |acc, t| Ok(acc + t.eval_unchecked(env)?)),
            Expr::Mul(factors) => {
                factors.iter().try_fold(1.0, |acc, x| Ok(acc * x.eval_unchecked(env)?))
            }
            Expr::Pow(base, exp) => Ok(base.eval_unchecked(env)?.powi(*exp)),
            Expr::Func(f, arg) => Ok(f.apply_f64(arg.eval_unchecked(env)?)),
        }
    }
}
