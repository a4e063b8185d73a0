//! Loosely typed values exchanged between reader adapters and the container.

use std::collections::BTreeMap;
use std::fmt;

use super::NumericArray;

/// A value as produced by a reader adapter or found in an archive.
///
/// Groups hold exactly one level of nesting: their entries are arrays or
/// text, never further groups.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// A numeric array node.
    Array(NumericArray),
    /// A character array, read back as a string.
    Text(String),
    /// A named group of leaf nodes.
    Group(BTreeMap<String, Field>),
}

impl Field {
    /// Short name of the variant, used in validation messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Text(_) => "text",
            Self::Group(_) => "group",
        }
    }

    /// Check if this is a numeric array.
    pub fn is_numeric(&self) -> bool {
        super::is_numeric(self)
    }

    /// Borrow the numeric array, if this is one.
    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow the text, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<NumericArray> for Field {
    fn from(a: NumericArray) -> Self {
        Self::Array(a)
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<BTreeMap<String, NumericArray>> for Field {
    fn from(map: BTreeMap<String, NumericArray>) -> Self {
        Self::Group(map.into_iter().map(|(k, v)| (k, Field::Array(v))).collect())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(a) => write!(f, "{} {:?}", a.element_type(), a.shape()),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::Group(g) => write!(f, "group ({} entries)", g.len()),
        }
    }
}
