use std::fmt;

use num_traits::{One, Signed};

use super::expr::Expr;
use super::simplify::{split_coefficient, with_coefficient};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(n) if n.is_integer() => write!(f, "{}", n.numer()),
            Expr::Num(n) => write!(f, "{}/{}", n.numer(), n.denom()),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    let (c, rest) = split_coefficient(term.clone());
                    if i == 0 {
                        write!(f, "{term}")?;
                    } else if c.is_negative() {
                        write!(f, " - {}", with_coefficient(-c, rest))?;
                    } else {
                        write!(f, " + {term}")?;
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                let mut rest = factors.as_slice();
                if let Some((Expr::Num(c), tail)) = factors.split_first() {
                    if (-*c).is_one() && !tail.is_empty() {
                        f.write_str("-")?;
                        rest = tail;
                    }
                }
                for (i, factor) in rest.iter().enumerate() {
                    if i > 0 {
                        f.write_str("*")?;
                    }
                    write_operand(f, factor, false)?;
                }
                Ok(())
            }
            Expr::Pow(base, exp) => {
                write_operand(f, base, true)?;
                write!(f, "^{exp}")
            }
            Expr::Func(func, arg) => write!(f, "{}({arg})", func.name()),
        }
    }
}

/// Parenthesise operands that would otherwise bind wrongly
fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, power_base: bool) -> fmt::Result {
    let needs_parens = match e {
        Expr::Add(_) => true,
        Expr::Mul(_) | Expr::Pow(..) => power_base,
        Expr::Num(n) => n.is_negative() || !n.is_integer(),
        _ => false,
    };
    if needs_parens {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let r = Expr::sym("r");
        let r_s = Expr::sym("r_s");
        let e = Expr::int(1) - r_s / r.clone();
        assert_eq!(e.to_string(), "1 - r^-1*r_s");

        assert_eq!(Expr::rational(-3, 4).to_string(), "-3/4");
        assert_eq!((-Expr::sym("t")).to_string(), "-t");
        assert_eq!(
            Expr::pow(Expr::sin(Expr::sym("theta")), 2).to_string(),
            "sin(theta)^2"
        );
        assert_eq!(Expr::pow(r + Expr::int(1), -1).to_string(), "(1 + r)^-1");
    }
}
