// Test helpers that lay out APE tags byte by byte

use crate::ape::{flags, APE_SIGNATURE, APE_VERSION, DESCRIPTOR_SIZE};

pub fn descriptor(version: u32, size: u32, item_count: u32, flags: u32) -> Vec<u8> {
    let mut data = APE_SIGNATURE.to_vec();
    for field in [version, size, item_count, flags, 0, 0] {
        data.extend_from_slice(&field.to_le_bytes());
    }
    data
}

pub fn item(key: &str, value: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(value.len() as u32).to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(key.as_bytes());
    data.push(0);
    data.extend_from_slice(value);
    data
}

pub fn items(entries: &[(&str, &[u8])]) -> Vec<u8> {
    entries.iter().flat_map(|(k, v)| item(k, v)).collect()
}

/// Header (size 32) + items + footer
pub fn tag_with_header(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let body = items(entries);
    let count = entries.len() as u32;
    let mut data = descriptor(
        APE_VERSION,
        DESCRIPTOR_SIZE as u32,
        count,
        flags::HAS_HEADER | flags::IS_HEADER,
    );
    data.extend_from_slice(&body);
    data.extend_from_slice(&descriptor(
        APE_VERSION,
        (body.len() + DESCRIPTOR_SIZE) as u32,
        count,
        flags::HAS_HEADER,
    ));
    data
}

/// Items + footer, no header
pub fn tag_footer_only(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut data = items(entries);
    let size = (data.len() + DESCRIPTOR_SIZE) as u32;
    data.extend_from_slice(&descriptor(APE_VERSION, size, entries.len() as u32, 0));
    data
}
