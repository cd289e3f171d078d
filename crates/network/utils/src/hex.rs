use hex::FromHexError;

/// Strips surrounding whitespace and an optional `0x` / `0X` prefix from a hex string.
#[must_use]
pub fn strip_hex_prefix(value: &str) -> &str {
    let value = value.trim();
    value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value)
}

/// Returns true if the value carries an explicit `0x` / `0X` prefix.
#[must_use]
pub fn has_hex_prefix(value: &str) -> bool {
    let value = value.trim_start();
    value.starts_with("0x") || value.starts_with("0X")
}

/// Decodes a hex string, tolerating an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, FromHexError> {
    hex::decode(strip_hex_prefix(value))
}

/// Encodes bytes as a lowercase `0x`-prefixed hex string.
#[must_use]
pub fn encode_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}
