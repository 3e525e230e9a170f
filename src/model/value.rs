//! Cell values and per-cell type classification

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A classified cell value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Finite floating point number
    Number(f64),
    /// Source text, kept exactly as split from the line
    String(String),
}

impl Value {
    /// Classify a field's text.
    ///
    /// The result is `Number` only when the text parses as an `f64` that is
    /// neither NaN nor infinite; anything else (including the empty string and
    /// out-of-range literals such as `1e400`) stays a `String`.
    pub fn classify(text: &str) -> Self {
        match text.parse::<f64>() {
            Ok(num) if num.is_finite() => Value::Number(num),
            _ => Value::String(text.to_string()),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::String(s) => Some(s),
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::String(s) => Cow::Borrowed(s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

// Numbers are always finite, so `==` on them is reflexive.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            // -0.0 == 0.0, so both must hash alike
            Value::Number(n) if *n == 0.0 => 0.0f64.to_bits().hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::String(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numbers() {
        assert_eq!(Value::classify("1"), Value::Number(1.0));
        assert_eq!(Value::classify("10.5"), Value::Number(10.5));
        assert_eq!(Value::classify("-3e2"), Value::Number(-300.0));
        assert_eq!(Value::classify(".5"), Value::Number(0.5));
    }

    #[test]
    fn test_accessors() {
        let n = Value::classify("2.5");
        assert_eq!(n.as_number(), Some(2.5));
        assert_eq!(n.as_str(), None);

        let s = Value::classify("abc");
        assert_eq!(s.as_number(), None);
        assert_eq!(s.as_str(), Some("abc"));
        assert!(!s.is_number());
    }

    #[test]
    fn test_classify_strings() {
        assert_eq!(Value::classify("abc"), Value::from("abc"));
        assert_eq!(Value::classify(""), Value::from(""));
        assert_eq!(Value::classify(" 1"), Value::from(" 1"));
        assert_eq!(Value::classify("1,5"), Value::from("1,5"));
    }

    #[test]
    fn test_non_finite_stays_string() {
        assert_eq!(Value::classify("NaN"), Value::from("NaN"));
        assert_eq!(Value::classify("inf"), Value::from("inf"));
        assert_eq!(Value::classify("-Infinity"), Value::from("-Infinity"));
        assert_eq!(Value::classify("1e400"), Value::from("1e400"));
    }

    #[test]
    fn test_signed_zero_hashes_alike() {
        use rustc_hash::FxHashSet;

        let mut set = FxHashSet::default();
        set.insert(Value::Number(0.0));
        assert!(set.contains(&Value::Number(-0.0)));
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![Value::Number(2.0), Value::from("abc")]).unwrap();
        assert_eq!(json, r#"[2.0,"abc"]"#);
    }
}
