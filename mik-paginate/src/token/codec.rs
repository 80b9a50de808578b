//! Reversible string codecs for page tokens.

use std::fmt::Debug;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use super::DELIMITER;
use crate::error::TokenError;

/// Turns a raw `primary|backup` payload into an opaque token and back.
///
/// Codecs are swappable through
/// [`CursorConfig::codec`](crate::CursorConfig::codec). A service that needs
/// tamper-evident tokens can plug in a signing codec here.
pub trait TokenCodec: Debug + Send + Sync {
    /// Encode a raw payload.
    fn encode(&self, raw: &str) -> String;

    /// Invert [`encode`](Self::encode). A payload without the delimiter
    /// should fail with [`TokenError::MissingDelimiter`].
    fn decode(&self, token: &str) -> Result<String, TokenError>;
}

/// Standard alphabet; accepts tokens with or without padding.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// rot13, then base64, then rot13 again.
///
/// This only discourages casual editing of tokens. It provides neither
/// integrity nor confidentiality: anyone can decode a token and mint a new one.
///
/// ```
/// use mik_paginate::{ObfuscatedCodec, TokenCodec};
///
/// assert_eq!(ObfuscatedCodec.encode("10|9"), "ZGO8BD==");
/// assert_eq!(ObfuscatedCodec.decode("ZGO8BD==").unwrap(), "10|9");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObfuscatedCodec;

impl TokenCodec for ObfuscatedCodec {
    fn encode(&self, raw: &str) -> String {
        rot13(&ENGINE.encode(rot13(raw)))
    }

    fn decode(&self, token: &str) -> Result<String, TokenError> {
        let mut bytes = ENGINE
            .decode(rot13(token))
            .map_err(|_| TokenError::Undecodable)?;
        for byte in &mut bytes {
            *byte = rot13_byte(*byte);
        }
        // same error the plain codec reports for this payload
        if !bytes.iter().any(|&b| char::from(b) == DELIMITER) {
            return Err(TokenError::MissingDelimiter);
        }
        String::from_utf8(bytes).map_err(|_| TokenError::Undecodable)
    }
}

/// Identity codec: tokens are the raw `primary|backup` text.
///
/// Handy for debugging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainCodec;

impl TokenCodec for PlainCodec {
    fn encode(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn decode(&self, token: &str) -> Result<String, TokenError> {
        Ok(token.to_string())
    }
}

const fn rot13_byte(b: u8) -> u8 {
    match b {
        b'a'..=b'm' | b'A'..=b'M' => b + 13,
        b'n'..=b'z' | b'N'..=b'Z' => b - 13,
        _ => b,
    }
}

/// Rotate ASCII letters by 13 places; everything else passes through.
fn rot13(s: &str) -> String {
    s.chars()
        .map(|c| u8::try_from(c).map_or(c, |b| char::from(rot13_byte(b))))
        .collect()
}
