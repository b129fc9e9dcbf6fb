//! Hex address and offset parsing.

use anyhow::{Result, anyhow};

/// Parse a hex address string (with or without 0x prefix).
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16).map_err(|e| anyhow!("Invalid hex address '{}': {}", s, e))
}

/// Parse a signed hex offset such as `0x68`, `-0xC` or `+4`.
pub fn parse_hex_offset(s: &str) -> Result<i64> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = parse_hex_address(rest)
        .map_err(|_| anyhow!("Invalid hex offset '{}'", s))?;
    let magnitude = i64::try_from(magnitude).map_err(|_| anyhow!("Offset out of range: {}", s))?;
    Ok(if negative { -magnitude } else { magnitude })
}
