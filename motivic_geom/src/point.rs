// Points and translation vectors: the value types everything else is built on.
//
// A `Point` is a note event placed on the discrete (onset, pitch) lattice.
// Onset is in tatums (the score's smallest time unit), pitch is either a
// chromatic (MIDI) or morphetic number — this crate does not care which, it
// only requires integers. Voice and duration ride along for collaborators
// that render or play patterns back; they take no part in ordering or
// equality, so two notes at the same lattice position in different voices
// are the same point.
//
// The canonical order (onset ascending, then pitch ascending) is the one
// total order used everywhere: point sets iterate in it, vector tables are
// sorted by it, and pattern maximality in the extraction stage follows from
// partitioning data sorted by it.

use crate::error::LiteralError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// A note event on the (onset, pitch) lattice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub onset: i64,
    pub pitch: i32,
    /// Source voice/channel, if the producer knew it.
    pub voice: Option<u32>,
    /// Duration in tatums, if the producer knew it.
    pub duration: Option<u64>,
}

impl Point {
    pub fn new(onset: i64, pitch: i32) -> Self {
        Point {
            onset,
            pitch,
            voice: None,
            duration: None,
        }
    }

    pub fn with_voice(onset: i64, pitch: i32, voice: Option<u32>, duration: Option<u64>) -> Self {
        Point {
            onset,
            pitch,
            voice,
            duration,
        }
    }

    /// The translation image of this point. Voice and duration carry over:
    /// a translated note is still "the same note, elsewhere".
    pub fn translate(self, v: Vector) -> Self {
        Point {
            onset: self.onset + v.dt,
            pitch: self.pitch + v.dp,
            voice: self.voice,
            duration: self.duration,
        }
    }

    /// The vector from this point to `other`.
    pub fn vector_to(self, other: Point) -> Vector {
        Vector {
            dt: other.onset - self.onset,
            dp: other.pitch - self.pitch,
        }
    }

    /// Pitch-axis mirror image.
    pub fn inversion(self) -> Self {
        Point {
            pitch: -self.pitch,
            ..self
        }
    }

    /// Time-axis mirror image.
    pub fn retrograde(self) -> Self {
        Point {
            onset: -self.onset,
            ..self
        }
    }
}

// Ordering, equality and hashing all use (onset, pitch) only.

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.onset == other.onset && self.pitch == other.pitch
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.onset.hash(state);
        self.pitch.hash(state);
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.onset
            .cmp(&other.onset)
            .then(self.pitch.cmp(&other.pitch))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p({},{})", self.onset, self.pitch)
    }
}

impl FromStr for Point {
    type Err = LiteralError;

    /// Accepts the grammar form `p(x,y)` and the whitespace pair form `x y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || LiteralError::Point {
            literal: s.to_string(),
        };
        if let Some(inner) = s.strip_prefix("p(").and_then(|r| r.strip_suffix(')')) {
            let (x, y) = inner.split_once(',').ok_or_else(bad)?;
            let onset: i64 = x.trim().parse().map_err(|_| bad())?;
            let pitch: i32 = y.trim().parse().map_err(|_| bad())?;
            Ok(Point::new(onset, pitch))
        } else {
            let mut parts = s.split_whitespace();
            let x = parts.next().ok_or_else(bad)?;
            let y = parts.next().ok_or_else(bad)?;
            if parts.next().is_some() {
                return Err(bad());
            }
            let onset: i64 = x.parse().map_err(|_| bad())?;
            let pitch: i32 = y.parse().map_err(|_| bad())?;
            Ok(Point::new(onset, pitch))
        }
    }
}

/// A translation on the (onset, pitch) lattice — the additive group element
/// relating two occurrences of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    pub dt: i64,
    pub dp: i32,
}

impl Vector {
    pub const ZERO: Vector = Vector { dt: 0, dp: 0 };

    pub fn new(dt: i64, dp: i32) -> Self {
        Vector { dt, dp }
    }

    pub fn inverse(self) -> Self {
        Vector {
            dt: -self.dt,
            dp: -self.dp,
        }
    }

    /// Euclidean length, for diagnostics only — the algorithms compare
    /// vectors exactly.
    pub fn length(self) -> f64 {
        let dt = self.dt as f64;
        let dp = f64::from(self.dp);
        (dt * dt + dp * dp).sqrt()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector {
            dt: self.dt + rhs.dt,
            dp: self.dp + rhs.dp,
        }
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector {
            dt: self.dt - rhs.dt,
            dp: self.dp - rhs.dp,
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.inverse()
    }
}

impl Ord for Vector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dt.cmp(&other.dt).then(self.dp.cmp(&other.dp))
    }
}

impl PartialOrd for Vector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v({},{})", self.dt, self.dp)
    }
}

impl FromStr for Vector {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || LiteralError::Vector {
            literal: s.to_string(),
        };
        let inner = s
            .strip_prefix("v(")
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(bad)?;
        let (x, y) = inner.split_once(',').ok_or_else(bad)?;
        let dt: i64 = x.trim().parse().map_err(|_| bad())?;
        let dp: i32 = y.trim().parse().map_err(|_| bad())?;
        Ok(Vector::new(dt, dp))
    }
}
