//! Terms: the (field, bytes) pairs a filter is built from.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A term: a field name plus the raw bytes of an indexed token.
///
/// Terms order by field name first, then byte-lexicographically by content.
/// The bytes need not be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    /// Field the term belongs to.
    field: String,
    /// Raw term content.
    bytes: Vec<u8>,
}

impl Term {
    /// Create a new term.
    pub fn new<F: Into<String>, B: AsRef<[u8]>>(field: F, bytes: B) -> Self {
        Term {
            field: field.into(),
            bytes: bytes.as_ref().to_vec(),
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the raw term bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the term content as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.text())
    }
}

/// Anything that can be read as a (field, bytes) pair during filter construction.
///
/// The field is optional so that callers holding loosely typed input can hand
/// it over as-is; construction fails with an invalid argument error when a
/// field is missing.
pub trait FieldTerm {
    /// Field name, or `None` when the caller supplied no field.
    fn field(&self) -> Option<&str>;

    /// Raw term bytes.
    fn bytes(&self) -> &[u8];
}

impl FieldTerm for Term {
    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<F: AsRef<str>, B: AsRef<[u8]>> FieldTerm for (Option<F>, B) {
    fn field(&self) -> Option<&str> {
        self.0.as_ref().map(AsRef::as_ref)
    }

    fn bytes(&self) -> &[u8] {
        self.1.as_ref()
    }
}
