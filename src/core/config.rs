use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, Result};

/// Variance of a single tensor index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    /// Contravariant index, written 'u'
    Upper,
    /// Covariant index, written 'l'
    Lower,
}

impl Variance {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'u' => Some(Variance::Upper),
            'l' => Some(Variance::Lower),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Variance::Upper => 'u',
            Variance::Lower => 'l',
        }
    }

    /// Opposite variance (raise <-> lower)
    pub fn flip(self) -> Self {
        match self {
            Variance::Upper => Variance::Lower,
            Variance::Lower => Variance::Upper,
        }
    }
}

/// Parsed index configuration, one [`Variance`] per tensor index
///
/// The textual form is the usual string over {'u', 'l'}, e.g. `"ul"` for a
/// tensor with a contravariant first index and a covariant second index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexConfig(Vec<Variance>);

impl IndexConfig {
    /// Parse a configuration string, rejecting any character other than 'u' or 'l'
    pub fn parse(config: &str) -> Result<Self> {
        config
            .chars()
            .map(Variance::from_char)
            .collect::<Option<Vec<_>>>()
            .map(IndexConfig)
            .ok_or_else(|| Error::InvalidConfig(config.to_owned()))
    }

    /// Parse and require exactly `order` indices
    pub fn parse_with_order(config: &str, order: usize) -> Result<Self> {
        let parsed = Self::parse(config)?;
        if parsed.order() != order {
            return Err(Error::ConfigLength {
                expected: order,
                got: parsed.order(),
            });
        }
        Ok(parsed)
    }

    pub fn order(&self) -> usize {
        self.0.len()
    }

    pub fn variances(&self) -> &[Variance] {
        &self.0
    }

    /// True when every index has variance `v`
    pub fn is_uniform(&self, v: Variance) -> bool {
        self.0.iter().all(|&x| x == v)
    }

    /// True when the configuration has both upper and lower indices
    pub fn is_mixed(&self) -> bool {
        !self.is_uniform(Variance::Upper) && !self.is_uniform(Variance::Lower)
    }

    /// Every index flipped
    pub fn flipped(&self) -> Self {
        IndexConfig(self.0.iter().map(|v| v.flip()).collect())
    }
}

impl FromStr for IndexConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for IndexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.0 {
            write!(f, "{}", v.as_char())?;
        }
        Ok(())
    }
}
