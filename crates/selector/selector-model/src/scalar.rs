//! Scalar labels and interval keys.
//!
//! Labels key ordered maps, so `Float` compares and hashes by bit pattern:
//! `NaN` keys are stable and `Scalar::nan() == Scalar::nan()` holds. Use
//! [`Scalar::is_nan`] when checking for the "no label" sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn nan() -> Self {
        Scalar::Float(f64::NAN)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Scalar::Float(f) if f.is_nan())
    }

    /// Numeric view of the scalar; `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) => None,
        }
    }

    /// Numeric scalars match within `atol`; text matches exactly.
    pub fn approx_eq(&self, other: &Scalar, atol: f64) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() <= atol,
            _ => self == other,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Int(i) => i.hash(state),
            Scalar::Float(f) => f.to_bits().hash(state),
            Scalar::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// Closed interval `[lower, upper]` keying a range mapper.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    pub fn bounds(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.lower.to_bits() == other.lower.to_bits()
            && self.upper.to_bits() == other.upper.to_bits()
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.to_bits().hash(state);
        self.upper.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_keys_are_stable() {
        assert_eq!(Scalar::nan(), Scalar::nan());
        assert!(Scalar::nan().is_nan());
        assert!(!Scalar::Int(0).is_nan());
    }

    #[test]
    fn int_and_float_are_distinct_keys() {
        assert_ne!(Scalar::Int(1), Scalar::Float(1.0));
        assert!(Scalar::Int(1).approx_eq(&Scalar::Float(1.0), 1e-8));
    }

    #[test]
    fn text_matches_exactly() {
        assert!(Scalar::from("a").approx_eq(&Scalar::from("a"), 1.0));
        assert!(!Scalar::from("a").approx_eq(&Scalar::Int(1), 1.0));
    }

    #[test]
    fn untagged_json_shape() {
        let parsed: Vec<Scalar> = serde_json::from_str(r#"[1, 2.5, "x"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Scalar::Int(1), Scalar::Float(2.5), Scalar::from("x")]
        );
    }

    #[test]
    fn interval_is_closed() {
        let iv = Interval::new(1.0, 2.0);
        assert!(iv.contains(1.0));
        assert!(iv.contains(2.0));
        assert!(!iv.contains(2.0001));
    }
}
