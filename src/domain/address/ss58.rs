//! SS58 encoding and decoding
//!
//! Layout of a decoded SS58 string: `prefix (1 or 2 bytes) | payload | checksum`.
//! The checksum is the head of `blake2b_512("SS58PRE" ++ prefix ++ payload)`.

use blake2::{Blake2b512, Digest};

use super::AddressError;

const CHECKSUM_PREFIX: &[u8] = b"SS58PRE";

/// Payload lengths accepted for account identifiers and indices
pub const ALLOWED_PAYLOAD_LENGTHS: [usize; 6] = [1, 2, 4, 8, 32, 33];

/// Largest prefix that fits in the two-byte format
pub const MAX_PREFIX: u16 = 16_383;

/// Prefixes reserved by the SS58 registry
const RESERVED_PREFIXES: [u16; 2] = [46, 47];

/// Result of decoding an SS58 (or hex) address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Raw account identifier bytes
    pub payload: Vec<u8>,
    /// Network prefix the address was encoded with (`None` for hex input)
    pub prefix: Option<u16>,
}

/// Decode an SS58 string or a `0x`-prefixed hex payload
pub fn decode(text: &str) -> Result<Decoded, AddressError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    if let Some(hex_payload) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        let payload = hex::decode(hex_payload).map_err(|_| AddressError::InvalidHex)?;
        check_payload_length(payload.len())?;
        return Ok(Decoded {
            payload,
            prefix: None,
        });
    }

    let data = bs58::decode(trimmed)
        .into_vec()
        .map_err(|_| AddressError::InvalidBase58)?;
    if data.len() < 2 {
        return Err(AddressError::InvalidLength(data.len()));
    }

    let (prefix, prefix_len) = match data[0] {
        0..=63 => (data[0] as u16, 1),
        64..=127 => {
            let lower = (data[0] << 2) | (data[1] >> 6);
            let upper = data[1] & 0b0011_1111;
            (lower as u16 | ((upper as u16) << 8), 2)
        }
        _ => return Err(AddressError::InvalidPrefix(data[0] as u16)),
    };

    let checksum_len = checksum_length(data.len().saturating_sub(prefix_len));
    if data.len() < prefix_len + checksum_len + 1 {
        return Err(AddressError::InvalidLength(data.len()));
    }
    let body_end = data.len() - checksum_len;
    let payload = &data[prefix_len..body_end];
    check_payload_length(payload.len())?;
    if payload.len() >= 32 && checksum_len != 2 {
        return Err(AddressError::InvalidLength(data.len()));
    }

    let hash = ss58_hash(&data[..body_end]);
    if hash[..checksum_len] != data[body_end..] {
        return Err(AddressError::InvalidChecksum);
    }

    Ok(Decoded {
        payload: payload.to_vec(),
        prefix: Some(prefix),
    })
}

/// Encode a payload with the given network prefix
pub fn encode(payload: &[u8], prefix: u16) -> Result<String, AddressError> {
    check_payload_length(payload.len())?;
    if prefix > MAX_PREFIX || RESERVED_PREFIXES.contains(&prefix) {
        return Err(AddressError::InvalidPrefix(prefix));
    }

    let mut data = match prefix {
        0..=63 => vec![prefix as u8],
        _ => {
            // Two-byte format: 0b01 marker, then the identifier bits split across bytes
            let first = (((prefix & 0b0000_0000_1111_1100) as u8) >> 2) | 0b0100_0000;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            vec![first, second]
        }
    };
    data.extend_from_slice(payload);

    let checksum_len = if payload.len() >= 32 { 2 } else { 1 };
    let hash = ss58_hash(&data);
    data.extend_from_slice(&hash[..checksum_len]);

    Ok(bs58::encode(data).into_string())
}

fn ss58_hash(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREFIX);
    hasher.update(data);
    hasher.finalize().to_vec()
}

// Length after the prefix is payload + checksum; only 32/33-byte payloads carry two bytes.
fn checksum_length(rest: usize) -> usize {
    if rest >= 34 {
        2
    } else {
        1
    }
}

fn check_payload_length(len: usize) -> Result<(), AddressError> {
    if ALLOWED_PAYLOAD_LENGTHS.contains(&len) {
        Ok(())
    } else {
        Err(AddressError::InvalidLength(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_PUBLIC: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";
    const ALICE_GENERIC: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const ALICE_POLKADOT: &str = "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5";

    #[test]
    fn test_encode_known_account() {
        let public = hex::decode(ALICE_PUBLIC).unwrap();
        assert_eq!(encode(&public, 42).unwrap(), ALICE_GENERIC);
        assert_eq!(encode(&public, 0).unwrap(), ALICE_POLKADOT);
    }

    #[test]
    fn test_decode_reports_prefix() {
        let decoded = decode(ALICE_GENERIC).unwrap();
        assert_eq!(decoded.prefix, Some(42));
        assert_eq!(hex::encode(&decoded.payload), ALICE_PUBLIC);

        let decoded = decode(ALICE_POLKADOT).unwrap();
        assert_eq!(decoded.prefix, Some(0));
    }

    #[test]
    fn test_two_byte_prefix() {
        let public = hex::decode(ALICE_PUBLIC).unwrap();
        let encoded = encode(&public, 1284).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.prefix, Some(1284));
        assert_eq!(decoded.payload, public);
    }

    #[test]
    fn test_short_payload_uses_single_byte_checksum() {
        let encoded = encode(&[7u8; 4], 2).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.payload, vec![7u8; 4]);
        assert_eq!(decoded.prefix, Some(2));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // Flip the last character
        let mut broken = ALICE_GENERIC.to_string();
        broken.pop();
        broken.push('Z');
        assert!(matches!(
            decode(&broken),
            Err(AddressError::InvalidChecksum) | Err(AddressError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_hex_input() {
        let decoded = decode(&format!("0x{ALICE_PUBLIC}")).unwrap();
        assert_eq!(decoded.prefix, None);
        assert_eq!(decoded.payload.len(), 32);
        assert_eq!(decode("0x1234zz"), Err(AddressError::InvalidHex));
        assert_eq!(decode("0x123456"), Err(AddressError::InvalidLength(3)));
    }

    #[test]
    fn test_rejects_reserved_prefix() {
        let public = hex::decode(ALICE_PUBLIC).unwrap();
        assert_eq!(encode(&public, 46), Err(AddressError::InvalidPrefix(46)));
        assert_eq!(
            encode(&public, MAX_PREFIX + 1),
            Err(AddressError::InvalidPrefix(MAX_PREFIX + 1))
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(decode(""), Err(AddressError::Empty));
        assert_eq!(decode("not-an-address!"), Err(AddressError::InvalidBase58));
    }
}
