// Bounds-checked reads from resident byte buffers

/// Read little-endian 32-bit integer at `pos`
pub fn read_le_u32(data: &[u8], pos: usize) -> Option<u32> {
    let end = pos.checked_add(4)?;
    let bytes = data.get(pos..end)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Borrow `len` bytes starting at `pos`
pub fn read_slice(data: &[u8], pos: usize, len: usize) -> Option<&[u8]> {
    let end = pos.checked_add(len)?;
    data.get(pos..end)
}

/// Check if `data` has `signature` at `pos`
pub fn check_signature(data: &[u8], pos: usize, signature: &[u8]) -> bool {
    read_slice(data, pos, signature.len()) == Some(signature)
}
