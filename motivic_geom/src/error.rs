// Typed errors for the geometry crate.
//
// Three families:
// - `LiteralError`:  malformed point/vector/rational literals, raised at
//   construction time so bad input never reaches the algorithms.
// - `ParseError`:    structural errors in the canonical text grammar, with
//   the byte position and the offending substring.
// - `MetricError`:   metric computations that would divide by zero. These
//   are typed rather than returning NaN or a sentinel so callers can tell
//   "undefined" apart from "small".

use thiserror::Error;

/// A malformed literal encountered while constructing a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("malformed integer literal '{literal}'")]
    Integer { literal: String },
    #[error("malformed rational literal '{literal}' (expected 'n' or 'n/d')")]
    Rational { literal: String },
    #[error("rational denominator must not be zero")]
    ZeroDenominator,
    #[error("malformed point literal '{literal}' (expected 'p(x,y)' or 'x y')")]
    Point { literal: String },
    #[error("malformed vector literal '{literal}' (expected 'v(x,y)')")]
    Vector { literal: String },
}

/// A structural error in the canonical `T(P(...),V(...))` grammar.
///
/// `position` is the byte offset into the input at which parsing failed;
/// `found` is a short snippet of the input starting there (empty at end of
/// input).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at byte {position}: expected {expected}, found '{found}'")]
pub struct ParseError {
    pub position: usize,
    pub expected: &'static str,
    pub found: String,
}

impl ParseError {
    pub fn new(position: usize, expected: &'static str, input: &str) -> Self {
        // Keep the snippet short; it is for error messages, not recovery.
        let rest = &input[position.min(input.len())..];
        let found: String = rest.chars().take(24).collect();
        ParseError {
            position,
            expected,
            found,
        }
    }
}

/// A metric whose value is undefined for the given geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("{metric} is undefined for an empty point set")]
    EmptySet { metric: &'static str },
    #[error("temporal density is undefined for a zero onset span")]
    ZeroOnsetSpan,
    #[error("{metric} is undefined for a zero pitch span")]
    ZeroPitchSpan { metric: &'static str },
    #[error("{metric} is undefined for a zero onset span")]
    ZeroWidth { metric: &'static str },
    #[error("compactness is undefined: no dataset points inside the bounding box")]
    EmptyBoundingBox,
    #[error("compression ratio is undefined for a zero encoding length")]
    ZeroEncodingLength,
}
