//! Numeral parsing and the clamp-don't-fail policy.
//!
//! Out-of-range numbers are never rejected. They are folded into range by
//! taking the absolute value and then capping at the upper bound, so `-3`
//! becomes `3` and `300` becomes `255` when clamped to a byte.

use crate::error::EngineError;

/// Clamp an integer into a byte: `min(|n|, 255)`.
pub fn clamp_byte(n: i64) -> u8 {
    n.unsigned_abs().min(u8::MAX as u64) as u8
}

/// Clamp an integer into a memory index: `min(|n|, capacity - 1)`.
///
/// `capacity` is expected to be at least 1; a zero capacity clamps to 0.
pub fn clamp_index(n: i64, capacity: usize) -> usize {
    let last = capacity.saturating_sub(1) as u64;
    n.unsigned_abs().min(last) as usize
}

/// Parse a base-16 numeral (no prefix, case-insensitive).
pub fn parse_hex(text: &str) -> Result<i64, EngineError> {
    parse_radix(text, 16)
}

/// Parse a base-2 numeral.
pub fn parse_binary(text: &str) -> Result<i64, EngineError> {
    parse_radix(text, 2)
}

/// Parse a base-10 numeral.
pub fn parse_decimal(text: &str) -> Result<i64, EngineError> {
    parse_radix(text, 10)
}

/// Digit-by-digit parse that saturates instead of overflowing. Every
/// consumer clamps the result, so saturation gives the same answer as an
/// arbitrary-precision parse would.
fn parse_radix(text: &str, radix: u32) -> Result<i64, EngineError> {
    let invalid = || EngineError::InvalidNumeral {
        text: text.to_string(),
        radix,
    };
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if digits.is_empty() {
        return Err(invalid());
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let d = c.to_digit(radix).ok_or_else(invalid)?;
        value = value.saturating_mul(radix as i64).saturating_add(d as i64);
    }
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_byte_in_range() {
        assert_eq!(clamp_byte(0), 0);
        assert_eq!(clamp_byte(42), 42);
        assert_eq!(clamp_byte(255), 255);
    }

    #[test]
    fn test_clamp_byte_caps_and_folds_sign() {
        assert_eq!(clamp_byte(256), 255);
        assert_eq!(clamp_byte(-7), 7);
        assert_eq!(clamp_byte(-1000), 255);
        assert_eq!(clamp_byte(i64::MIN), 255);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(10, 256), 10);
        assert_eq!(clamp_index(256, 256), 255);
        assert_eq!(clamp_index(-20, 256), 20);
        assert_eq!(clamp_index(5000, 768), 767);
        assert_eq!(clamp_index(3, 0), 0);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("FF"), Ok(255));
        assert_eq!(parse_hex("ff"), Ok(255));
        assert_eq!(parse_hex("100"), Ok(256));
        assert_eq!(parse_hex("-10"), Ok(-16));
    }

    #[test]
    fn test_parse_binary() {
        assert_eq!(parse_binary("00000101"), Ok(5));
        assert_eq!(parse_binary("11111111"), Ok(255));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0"), Ok(0));
        assert_eq!(parse_decimal("300"), Ok(300));
    }

    #[test]
    fn test_parse_rejects_non_numerals() {
        assert_eq!(
            parse_binary("102"),
            Err(EngineError::InvalidNumeral { text: "102".into(), radix: 2 })
        );
        assert!(parse_hex("").is_err());
        assert!(parse_hex("-").is_err());
        assert!(parse_hex("0x10").is_err());
        assert!(parse_decimal("1F").is_err());
    }

    #[test]
    fn test_parse_saturates_on_overflow() {
        let huge = "F".repeat(40);
        assert_eq!(parse_hex(&huge), Ok(i64::MAX));
        assert_eq!(clamp_byte(parse_hex(&huge).unwrap()), 255);
    }
}
