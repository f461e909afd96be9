//! JSON-RPC hex quantities (`0x`-prefixed, no leading zeros).

use primitive_types::U256;
use shared_types::ChainError;

pub fn parse_quantity(text: &str) -> Result<U256, ChainError> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::Decode(format!("quantity '{}' lacks 0x prefix", text)))?;
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16)
        .map_err(|_| ChainError::Decode(format!("'{}' is not a hex quantity", text)))
}

pub fn parse_quantity_u64(text: &str) -> Result<u64, ChainError> {
    let value = parse_quantity(text)?;
    if value > U256::from(u64::MAX) {
        return Err(ChainError::Decode(format!("quantity '{}' overflows u64", text)));
    }
    Ok(value.low_u64())
}

pub fn format_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

/// Big-endian bytes with leading zeros removed, as RLP expects for integers.
pub fn trimmed_be_bytes(value: U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    let first = buf.iter().position(|b| *b != 0).unwrap_or(buf.len());
    buf[first..].to_vec()
}
