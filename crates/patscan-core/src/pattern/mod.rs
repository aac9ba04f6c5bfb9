//! Byte patterns with wildcards

mod signature;

pub use signature::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An immutable byte signature where `None` matches any byte.
///
/// Patterns are never empty. Parse one from the usual IDA-style notation:
///
/// ```
/// use patscan_core::BytePattern;
///
/// let pattern: BytePattern = "48 8D 0D ?? ?? ?? ??".parse().unwrap();
/// assert_eq!(pattern.len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BytePattern {
    elements: Box<[Option<u8>]>,
}

impl BytePattern {
    pub fn new(elements: Vec<Option<u8>>) -> Result<Self> {
        if elements.is_empty() {
            return Err(Error::InvalidPattern("Signature pattern is empty".to_string()));
        }
        Ok(Self {
            elements: elements.into_boxed_slice(),
        })
    }

    /// A pattern without wildcards
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes.iter().copied().map(Some).collect())
    }

    /// Parse whitespace-separated hex bytes, with `?` or `??` as wildcards
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut elements = Vec::new();
        for token in pattern.split_whitespace() {
            if token == "??" || token == "?" {
                elements.push(None);
                continue;
            }

            if token.len() != 2 {
                return Err(Error::InvalidPattern(format!(
                    "Invalid signature token '{}': expected two hex digits",
                    token
                )));
            }

            let value = u8::from_str_radix(token, 16).map_err(|e| {
                Error::InvalidPattern(format!("Invalid signature token '{}': {}", token, e))
            })?;
            elements.push(Some(value));
        }

        Self::new(elements)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Option<u8>] {
        &self.elements
    }

    pub fn is_all_wildcards(&self) -> bool {
        self.elements.iter().all(Option::is_none)
    }

    /// Index and value of the first non-wildcard element
    pub fn first_fixed(&self) -> Option<(usize, u8)> {
        self.elements
            .iter()
            .enumerate()
            .find_map(|(i, element)| element.map(|value| (i, value)))
    }

    /// Whether the pattern matches `buffer` starting at `offset`.
    ///
    /// Returns false when fewer than `len()` bytes remain after `offset`.
    pub fn matches_at(&self, buffer: &[u8], offset: usize) -> bool {
        let Some(window) = offset
            .checked_add(self.len())
            .and_then(|end| buffer.get(offset..end))
        else {
            return false;
        };

        self.elements
            .iter()
            .zip(window)
            .all(|(element, byte)| element.is_none_or(|value| value == *byte))
    }
}

impl FromStr for BytePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BytePattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<BytePattern> for String {
    fn from(pattern: BytePattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match element {
                Some(value) => write!(f, "{:02X}", value)?,
                None => f.write_str("??")?,
            }
        }
        Ok(())
    }
}
