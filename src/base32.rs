// Base32 decoder (RFC 4648 alphabet, case-insensitive, trailing padding optional)

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base32 character {0:?}")]
    InvalidCharacter(char),
}

fn symbol_value(c: char) -> Option<u8> {
    ALPHABET
        .iter()
        .position(|&symbol| char::from(symbol) == c)
        .map(|index| index as u8)
}

/// Decodes `input` into raw key bytes.
///
/// Trailing `=` is stripped and letters are uppercased before lookup. Leftover
/// bits after the last symbol (fewer than 8) are alignment padding and dropped,
/// so the output is always `floor(len * 5 / 8)` bytes.
pub fn base32_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let input = input.trim_end_matches('=');

    // Validate everything first so no partial output escapes on failure.
    let values = input
        .chars()
        .map(|c| {
            let c = c.to_ascii_uppercase();
            symbol_value(c).ok_or(DecodeError::InvalidCharacter(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let mut result = Vec::with_capacity(values.len() * 5 / 8);
    let mut buffer = 0u32;
    let mut bits = 0u32;

    for value in values {
        buffer = ((buffer << 5) | u32::from(value)) & 0x1fff;
        bits += 5;

        if bits >= 8 {
            bits -= 8;
            result.push((buffer >> bits) as u8);
        }
    }

    Ok(result)
}
