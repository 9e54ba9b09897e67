//! Little-endian primitives shared by the encode and decode paths.
//!
//! Every multi-byte integer on the wire is little-endian. The helpers
//! here read whole slices; callers bound-check before slicing.

/// Fold an arbitrary-length little-endian slice into an unsigned value.
///
/// Bytes beyond the low eight are ignored, matching the fold the
/// firmware applies on its side.
pub fn uint_le(bytes: &[u8]) -> u64 {
    let mut val: u64 = 0;
    for (i, b) in bytes.iter().take(8).enumerate() {
        val |= (*b as u64) << (8 * i);
    }
    val
}

/// Read a u16 at `offset`, or `None` if the slice ends first.
pub fn u16_at(bytes: &[u8], offset: usize) -> Option<u16> {
    let b = bytes.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

/// Read a u32 at `offset`, or `None` if the slice ends first.
pub fn u32_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let b = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read the 24-bit packed temperature/humidity field at `offset`.
pub fn u24_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let b = bytes.get(offset..offset + 3)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], 0]))
}

/// Reinterpret a raw byte as a signed 8-bit value.
pub fn i8_from_raw(raw: u8) -> i8 {
    raw as i8
}

/// Decode a hex string into frame bytes.
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

/// Encode frame bytes as a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// 16-bit additive checksum: unsigned sum of every byte, truncated.
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, b| sum.wrapping_add(*b as u16))
}
