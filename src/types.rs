use serde::{Deserialize, Serialize};
use std::fmt;

/// Value observed for a linguistic feature on a token
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl FeatureValue {
    pub fn is_empty_text(&self) -> bool {
        matches!(self, FeatureValue::Text(text) if text.is_empty())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FeatureValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FeatureValue::Flag(flag) => serde_json::Value::Bool(*flag),
            FeatureValue::Integer(value) => serde_json::Value::from(*value),
            FeatureValue::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Flag(flag) => write!(f, "{}", flag),
            FeatureValue::Integer(value) => write!(f, "{}", value),
            FeatureValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Integer(value)
    }
}

impl From<usize> for FeatureValue {
    fn from(value: usize) -> Self {
        FeatureValue::Integer(value as i64)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Flag(value)
    }
}

/// Constraints placed on a single token: feature name -> constraint value.
/// An empty map is the token wildcard.
pub type TokenPattern = serde_json::Map<String, serde_json::Value>;

/// Decoded individual: the ordered token constraints handed to the matcher
pub type Phenotype = Vec<TokenPattern>;

/// Half-open token range `[start, end)` reported by a matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when the span runs from the first to the last token of a doc of `len` tokens
    pub fn covers(&self, len: usize) -> bool {
        self.start == 0 && self.end == len
    }
}
