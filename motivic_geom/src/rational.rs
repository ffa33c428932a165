// Exact rational arithmetic for time-axis scaling.
//
// Onsets in source material are often expressed as fractions of a whole
// note before being quantized onto the tatum lattice, and pattern scaling
// takes a rational factor. The representation is an improper fraction in
// lowest terms with a strictly positive denominator, established at
// construction and preserved by every operation.

use crate::error::LiteralError;
use crate::maths::{floor_div, gcd, lcm};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A fraction in lowest terms; denominator is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// Construct and reduce. Fails on a zero denominator — at construction,
    /// not at first use.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, LiteralError> {
        if denominator == 0 {
            return Err(LiteralError::ZeroDenominator);
        }
        let (mut n, mut d) = (numerator, denominator);
        if d < 0 {
            n = -n;
            d = -d;
        }
        let g = gcd(n, d);
        if g > 1 {
            n /= g;
            d /= g;
        }
        Ok(Rational {
            numerator: n,
            denominator: d,
        })
    }

    pub fn from_integer(n: i64) -> Self {
        Rational {
            numerator: n,
            denominator: 1,
        }
    }

    pub fn numerator(self) -> i64 {
        self.numerator
    }

    pub fn denominator(self) -> i64 {
        self.denominator
    }

    pub fn is_integer(self) -> bool {
        self.denominator == 1
    }

    /// Largest integer not greater than the fraction.
    pub fn floor(self) -> i64 {
        floor_div(self.numerator, self.denominator)
    }

    // Reduce a fraction whose denominator is already known positive.
    fn reduced(numerator: i64, denominator: i64) -> Rational {
        debug_assert!(denominator > 0);
        let g = gcd(numerator, denominator);
        if g > 1 {
            Rational {
                numerator: numerator / g,
                denominator: denominator / g,
            }
        } else {
            Rational {
                numerator,
                denominator,
            }
        }
    }

    pub fn add(self, other: Rational) -> Rational {
        // Work over the lowest common denominator to keep intermediates small.
        let d = lcm(self.denominator, other.denominator);
        let n = self.numerator * (d / self.denominator) + other.numerator * (d / other.denominator);
        Rational::reduced(n, d)
    }

    pub fn sub(self, other: Rational) -> Rational {
        self.add(Rational {
            numerator: -other.numerator,
            denominator: other.denominator,
        })
    }

    pub fn mul(self, other: Rational) -> Rational {
        Rational::reduced(
            self.numerator * other.numerator,
            self.denominator * other.denominator,
        )
    }

    /// Division; fails when `other` is zero.
    pub fn div(self, other: Rational) -> Result<Rational, LiteralError> {
        Rational::new(
            self.numerator * other.denominator,
            self.denominator * other.numerator,
        )
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Cross-multiply in i128 so large onsets cannot overflow.
        let lhs = i128::from(self.numerator) * i128::from(other.denominator);
        let rhs = i128::from(other.numerator) * i128::from(self.denominator);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl FromStr for Rational {
    type Err = LiteralError;

    /// Accepts `n` and `n/d` with optional surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bad = || LiteralError::Rational {
            literal: trimmed.to_string(),
        };
        match trimmed.split_once('/') {
            Some((n, d)) => {
                let numerator: i64 = n.trim().parse().map_err(|_| bad())?;
                let denominator: i64 = d.trim().parse().map_err(|_| bad())?;
                if denominator == 0 {
                    return Err(LiteralError::ZeroDenominator);
                }
                Rational::new(numerator, denominator)
            }
            None => {
                let numerator: i64 = trimmed.parse().map_err(|_| bad())?;
                Ok(Rational::from_integer(numerator))
            }
        }
    }
}
