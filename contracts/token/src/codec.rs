use alloy_primitives::{Address, U256};
use serde::Serializer;

use crate::errors::TokenError;

const ADDRESS_HEX_LEN: usize = 40;

/// Parse a `0x`-prefixed, 20-byte hex address. Case, including the prefix, is
/// not significant and no checksum is enforced.
pub fn parse_address(input: &str) -> Result<Address, TokenError> {
    let invalid = || TokenError::InvalidAddress(input.to_string());

    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    if hex.len() != ADDRESS_HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    hex.parse::<Address>().map_err(|_| invalid())
}

/// Parse a non-negative integer amount, either plain decimal digits or
/// `0x`-prefixed hex. Anything that does not fit in 256 bits is rejected.
pub fn parse_amount(input: &str) -> Result<U256, TokenError> {
    let invalid = || TokenError::InvalidAmount(input.to_string());

    let (digits, radix) = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => (hex, 16u32),
        None => (input, 10u32),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    U256::from_str_radix(digits, u64::from(radix)).map_err(|_| invalid())
}

/// EIP-55 checksummed form.
pub fn serialize_address<S: Serializer>(addr: &Address, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(addr)
}

/// Decimal string, so clients never lose precision.
pub fn serialize_amount<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}
