// HOTP (RFC 4226) dynamic truncation and code formatting

use crate::keyed_hash::{DIGEST_LEN, Digest, HashProviderError, KeyedHashProvider};

pub const DIGITS: usize = 6;

const MODULUS: u32 = 1_000_000;

/// Extracts the 31-bit value selected by the low nibble of the last digest byte.
///
/// The offset is at most 15, so the 4-byte window never reaches past index 18.
pub fn truncate(digest: &Digest) -> u32 {
    let offset = (digest[DIGEST_LEN - 1] & 0x0f) as usize;

    (u32::from(digest[offset]) & 0x7f) << 24
        | u32::from(digest[offset + 1]) << 16
        | u32::from(digest[offset + 2]) << 8
        | u32::from(digest[offset + 3])
}

pub fn format_code(value: u32) -> String {
    format!("{:0width$}", value % MODULUS, width = DIGITS)
}

/// HOTP value for raw key bytes and an encoded moving factor.
pub fn hotp<P: KeyedHashProvider>(
    provider: &P,
    key: &[u8],
    counter: &[u8; 8],
) -> Result<String, HashProviderError> {
    let digest = provider.hmac_sha1(key, counter)?;
    Ok(format_code(truncate(&digest)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyed_hash::HmacSha1;

    fn digest_from_hex(hex: &str) -> Digest {
        let mut digest = [0u8; DIGEST_LEN];
        for (i, byte) in digest.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap();
        }
        digest
    }

    #[test]
    fn truncates_rfc4226_example() {
        // RFC 4226 section 5.4
        let digest = digest_from_hex("1f8698690e02ca16618550ef7f19da8e945b555a");
        assert_eq!(truncate(&digest), 0x50ef7f19);
        assert_eq!(format_code(truncate(&digest)), "872921");
    }

    #[test]
    fn clears_top_bit_at_largest_offset() {
        let mut digest = [0xffu8; DIGEST_LEN];
        digest[DIGEST_LEN - 1] = 0x0f;
        let value = truncate(&digest);
        assert_eq!(value, 0x7fff_ffff);
        assert!(value < 1 << 31);
    }

    #[test]
    fn reads_from_offset_zero() {
        let mut digest = [0u8; DIGEST_LEN];
        digest[..4].copy_from_slice(&[0x80, 0x00, 0x01, 0x02]);
        digest[DIGEST_LEN - 1] = 0xf0;
        assert_eq!(truncate(&digest), 0x0000_0102);
    }

    #[test]
    fn pads_to_six_digits() {
        assert_eq!(format_code(0), "000000");
        assert_eq!(format_code(42), "000042");
        assert_eq!(format_code(999_999), "999999");
        assert_eq!(format_code(1_000_000), "000000");
        assert_eq!(format_code(94_287_082), "287082");
        assert_eq!(format_code(u32::MAX), "967295");
    }

    #[test]
    fn matches_rfc4226_table() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        let key = b"12345678901234567890";
        for (counter, code) in expected.iter().enumerate() {
            let moving_factor = (counter as u64).to_be_bytes();
            assert_eq!(hotp(&HmacSha1, key, &moving_factor).unwrap(), *code);
        }
    }
}
