//! Byte-wise XOR parity used for stream integrity.

/// XOR-reduces `bytes` to a single byte.
///
/// Detects every single-bit error in the covered range; it is not an
/// authentication mechanism.
#[must_use]
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}
