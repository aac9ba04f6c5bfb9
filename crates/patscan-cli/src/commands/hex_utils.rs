//! Hex address parsing.

use anyhow::{Result, bail};
use patscan_core::NativeAddress;

/// Parse a hex address string (with or without 0x prefix).
///
/// Fails when the value does not fit the native address width.
pub fn parse_hex_address(s: &str) -> Result<NativeAddress> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    let value = u64::from_str_radix(digits, 16)
        .map_err(|e| anyhow::anyhow!("Invalid hex address '{}': {}", s, e))?;

    let Some(address) = NativeAddress::try_from_u64(value) else {
        bail!("Address {} does not fit the target address width", s);
    };
    Ok(address)
}

/// Parse a byte count, accepting hex with a 0x prefix or decimal.
pub fn parse_size(s: &str) -> Result<usize> {
    let size = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => usize::from_str_radix(digits, 16),
        None => s.parse(),
    };
    size.map_err(|e| anyhow::anyhow!("Invalid size '{}': {}", s, e))
}
