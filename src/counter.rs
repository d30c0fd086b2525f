/// TOTP step in milliseconds.
pub const STEP_MS: u64 = 30_000;

pub fn counter(timestamp_ms: u64) -> u64 {
    timestamp_ms / STEP_MS
}

/// HOTP moving factor: the window counter as 8 big-endian bytes.
///
/// The full 64-bit range is encoded; counters that fit in 32 bits leave the
/// top four bytes zero.
pub fn encode(timestamp_ms: u64) -> [u8; 8] {
    counter(timestamp_ms).to_be_bytes()
}

/// Whole seconds until the current window closes, in `1..=30`.
pub fn seconds_remaining(now_ms: u64) -> u64 {
    let elapsed = now_ms % STEP_MS;
    (STEP_MS - elapsed).div_ceil(1_000)
}
