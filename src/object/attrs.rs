use std::collections::BTreeMap;
use std::fmt::Display;

/// A single attribute value
///
/// Attributes describe a type rather than its elements, so they are always
/// scalar.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    Logical(bool),
    Integer(i32),
    Double(f64),
    Character(String),
}

/// Attribute set of a prototype, keyed by attribute name
pub type Attrs = BTreeMap<String, Attr>;

impl Attr {
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Attr::Integer(i) => Some(*i),
            Attr::Logical(b) => Some(*b as i32),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Attr::Double(x) => Some(*x),
            Attr::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attr::Character(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for Attr {
    fn from(value: bool) -> Self {
        Attr::Logical(value)
    }
}

impl From<i32> for Attr {
    fn from(value: i32) -> Self {
        Attr::Integer(value)
    }
}

impl From<f64> for Attr {
    fn from(value: f64) -> Self {
        Attr::Double(value)
    }
}

impl From<&str> for Attr {
    fn from(value: &str) -> Self {
        Attr::Character(value.to_string())
    }
}

impl From<String> for Attr {
    fn from(value: String) -> Self {
        Attr::Character(value)
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attr::Logical(x) => write!(f, "{x}"),
            Attr::Integer(x) => write!(f, "{x}"),
            Attr::Double(x) => write!(f, "{x}"),
            Attr::Character(x) => write!(f, "{x}"),
        }
    }
}
