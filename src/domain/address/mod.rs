//! Account address handling
//!
//! Every address that enters the picker is canonicalized: decoded (SS58 or hex)
//! and re-encoded under the configured network prefix. Canonicalization never
//! fails loudly; malformed input simply resolves to `None`.

mod ss58;

pub use ss58::{decode, encode, Decoded, ALLOWED_PAYLOAD_LENGTHS, MAX_PREFIX};

use thiserror::Error;

/// Generic Substrate prefix, used when no network is configured
pub const DEFAULT_PREFIX: u16 = 42;

/// Failure to resolve a string or byte sequence into an address
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,
    #[error("invalid base58 encoding")]
    InvalidBase58,
    #[error("invalid hex encoding")]
    InvalidHex,
    #[error("invalid payload length: {0}")]
    InvalidLength(usize),
    #[error("invalid checksum")]
    InvalidChecksum,
    #[error("invalid network prefix: {0}")]
    InvalidPrefix(u16),
}

/// Raw address as handed to the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput {
    /// SS58 string or `0x` hex
    Text(String),
    /// Raw account id / public key bytes
    Bytes(Vec<u8>),
}

impl From<&str> for AddressInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for AddressInput {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for AddressInput {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Convert any address input into its canonical form under `prefix`
pub fn try_canonicalize(input: &AddressInput, prefix: u16) -> Result<String, AddressError> {
    match input {
        AddressInput::Text(text) => {
            let decoded = decode(text)?;
            encode(&decoded.payload, prefix)
        }
        AddressInput::Bytes(bytes) => encode(bytes, prefix),
    }
}

/// Canonicalize, degrading every failure to `None`
pub fn canonicalize(input: &AddressInput, prefix: u16) -> Option<String> {
    match try_canonicalize(input, prefix) {
        Ok(address) => Some(address),
        Err(err) => {
            log::trace!("address resolution failed: {err}");
            None
        }
    }
}

/// Shorthand for canonicalizing a string
pub fn canonicalize_str(text: &str, prefix: u16) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    canonicalize(&AddressInput::Text(text.to_string()), prefix)
}

/// Whether the text decodes as an address (any prefix)
pub fn is_valid(text: &str) -> bool {
    decode(text).is_ok()
}

/// Shorten an address for narrow columns: `5Grwva..utQY`
pub fn shorten(address: &str) -> String {
    let value = address.trim();
    if value.chars().count() <= 14 {
        return value.to_string();
    }
    let start: String = value.chars().take(6).collect();
    let end: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    format!("{}..{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_GENERIC: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    #[test]
    fn test_canonicalize_reencodes_prefix() {
        let kusama = canonicalize_str(ALICE_GENERIC, 2).unwrap();
        assert_ne!(kusama, ALICE_GENERIC);
        assert_eq!(canonicalize_str(&kusama, DEFAULT_PREFIX).unwrap(), ALICE_GENERIC);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize_str(ALICE_GENERIC, 0).unwrap();
        let twice = canonicalize_str(&once, 0).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bytes_input() {
        let bytes = decode(ALICE_GENERIC).unwrap().payload;
        let input = AddressInput::from(bytes);
        assert_eq!(canonicalize(&input, DEFAULT_PREFIX).as_deref(), Some(ALICE_GENERIC));
        assert_eq!(canonicalize(&AddressInput::Bytes(vec![1, 2, 3]), 42), None);
    }

    #[test]
    fn test_malformed_degrades_to_none() {
        assert_eq!(canonicalize_str("", 42), None);
        assert_eq!(canonicalize_str("   ", 42), None);
        assert_eq!(canonicalize_str("alice", 42), None);
        assert!(!is_valid("5Grwva"));
        assert!(is_valid(ALICE_GENERIC));
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten(ALICE_GENERIC), "5Grwva..utQY");
        assert_eq!(shorten("short"), "short");
    }
}
