//! Page tokens: the boundary key pair carried between requests.
//!
//! A token is the primary and backup sort values of a boundary row, joined
//! as `primary|backup` and passed through a [`TokenCodec`].

mod codec;

pub use codec::{ObfuscatedCodec, PlainCodec, TokenCodec};

use std::fmt;

use crate::error::TokenError;
use crate::query::Value;

/// Maximum accepted token length in bytes (4KB).
pub const MAX_TOKEN_SIZE: usize = 4 * 1024;

/// Separator between the two key values.
pub const DELIMITER: char = '|';

/// Boundary key pair of a page.
///
/// # Example
///
/// ```
/// use mik_paginate::{ObfuscatedCodec, PageToken, PlainCodec, Value};
///
/// let token = PageToken::new(10, 9);
/// assert_eq!(token.encode(&PlainCodec), "10|9");
/// assert_eq!(token.encode(&ObfuscatedCodec), "ZGO8BD==");
///
/// // parts come back as text; coerce them with a keys processor if needed
/// let parsed = PageToken::decode("ZGO8BD==", &ObfuscatedCodec).unwrap();
/// assert_eq!(parsed.primary(), &Value::from("10"));
/// assert_eq!(parsed.backup(), &Value::from("9"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageToken {
    primary: Value,
    backup: Value,
}

impl PageToken {
    /// Create a token from the two key values.
    pub fn new(primary: impl Into<Value>, backup: impl Into<Value>) -> Self {
        Self {
            primary: primary.into(),
            backup: backup.into(),
        }
    }

    /// Primary sort value.
    pub const fn primary(&self) -> &Value {
        &self.primary
    }

    /// Backup sort value.
    pub const fn backup(&self) -> &Value {
        &self.backup
    }

    /// Split into `(primary, backup)`.
    pub fn into_parts(self) -> (Value, Value) {
        (self.primary, self.backup)
    }

    /// Raw `primary|backup` form.
    pub fn to_raw(&self) -> String {
        format!(
            "{}{DELIMITER}{}",
            self.primary.to_token_part(),
            self.backup.to_token_part()
        )
    }

    /// Parse the raw form, splitting on the first delimiter.
    ///
    /// Both sides are kept as [`Value::String`] exactly as written. The raw
    /// form carries no type information, so `"004"` stays `"004"`.
    pub fn from_raw(raw: &str) -> Result<Self, TokenError> {
        let (primary, backup) = raw
            .split_once(DELIMITER)
            .ok_or(TokenError::MissingDelimiter)?;
        Ok(Self::new(primary, backup))
    }

    /// Encode through `codec`.
    pub fn encode(&self, codec: &dyn TokenCodec) -> String {
        codec.encode(&self.to_raw())
    }

    /// Decode a caller-supplied token.
    pub fn decode(token: &str, codec: &dyn TokenCodec) -> Result<Self, TokenError> {
        if token.len() > MAX_TOKEN_SIZE {
            return Err(TokenError::TooLarge);
        }
        Self::from_raw(&codec.decode(token)?)
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}
