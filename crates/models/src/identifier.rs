//! Primary-key identifiers shared by users, skills and partnerships.
//!
//! An identifier is exactly ten lowercase hexadecimal characters. Anything
//! else is rejected at parse time, so a value of this type is always safe to
//! hand to a query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Number of random bytes behind one identifier (two hex chars per byte).
pub const ID_BYTES: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub const LEN: usize = ID_BYTES * 2;

    /// True when `s` has the `[0-9a-f]{10}` shape.
    pub fn is_valid(s: &str) -> bool {
        s.len() == Self::LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn parse(s: &str) -> Result<Self, ModelError> {
        if s.is_empty() {
            return Err(ModelError::Validation("identifier required".into()));
        }
        if !Self::is_valid(s) {
            return Err(ModelError::Validation(format!("malformed identifier: {s:?}")));
        }
        Ok(Self(s.to_string()))
    }

    /// `Some` for well-formed input, `None` otherwise.
    pub fn try_parse(s: &str) -> Option<Self> {
        Self::is_valid(s).then(|| Self(s.to_string()))
    }

    /// Lowercase hex encoding of `bytes`.
    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        let mut out = String::with_capacity(Self::LEN);
        for b in bytes {
            out.push_str(&format!("{b:02x}"));
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for Identifier {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<String> for Identifier {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self { id.0 }
}
