// APE tag header/footer descriptor

use crate::ape::{flags, APE_SIGNATURE, DESCRIPTOR_SIZE};
use crate::utils::io::{check_signature, read_le_u32};

/// The 32-byte structure found at either end of an APE tag.
///
/// Headers and footers share this layout; the flags tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub has_signature: bool,
    pub version: u32,
    /// Byte length of items plus footer, header excluded
    pub size: u32,
    pub item_count: u32,
    pub flags: u32,
    /// Never validated; some writers leave garbage here
    pub reserved: [u32; 2],
}

impl Descriptor {
    /// Parse the descriptor at `pos`.
    ///
    /// Returns `None` when fewer than 32 bytes are available there.
    pub fn parse(data: &[u8], pos: usize) -> Option<Self> {
        let end = pos.checked_add(DESCRIPTOR_SIZE)?;
        let window = data.get(pos..end)?;

        Some(Descriptor {
            has_signature: check_signature(window, 0, APE_SIGNATURE),
            version: read_le_u32(window, 8)?,
            size: read_le_u32(window, 12)?,
            item_count: read_le_u32(window, 16)?,
            flags: read_le_u32(window, 20)?,
            reserved: [read_le_u32(window, 24)?, read_le_u32(window, 28)?],
        })
    }

    pub fn is_read_only(&self) -> bool {
        self.flags & flags::READ_ONLY != 0
    }

    /// Item type bits (0 = UTF-8 text, 1 = binary, 2 = external locator)
    pub fn item_type(&self) -> u32 {
        (self.flags & flags::ITEM_TYPE_MASK) >> 1
    }

    pub fn is_header(&self) -> bool {
        self.flags & flags::IS_HEADER != 0
    }

    pub fn has_no_footer(&self) -> bool {
        self.flags & flags::NO_FOOTER != 0
    }

    pub fn has_header(&self) -> bool {
        self.flags & flags::HAS_HEADER != 0
    }

    fn is_well_formed(&self) -> bool {
        self.has_signature && self.flags & flags::UNDEFINED_MASK == 0
    }

    /// Signature, clean undefined bits, header flags set, version 2000 or later
    pub fn is_valid_header(&self) -> bool {
        self.is_well_formed() && self.has_header() && self.is_header() && self.version >= 2000
    }

    /// Signature, clean undefined bits, footer present and not a header
    pub fn is_valid_footer(&self) -> bool {
        self.is_well_formed() && !self.has_no_footer() && !self.is_header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(version: u32, size: u32, items: u32, flags: u32) -> Vec<u8> {
        let mut data = APE_SIGNATURE.to_vec();
        for field in [version, size, items, flags, 0, 0] {
            data.extend_from_slice(&field.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_fields() {
        let data = raw(2000, 96, 3, flags::HAS_HEADER | flags::READ_ONLY | 0b100);
        let d = Descriptor::parse(&data, 0).unwrap();
        assert!(d.has_signature);
        assert_eq!(d.version, 2000);
        assert_eq!(d.size, 96);
        assert_eq!(d.item_count, 3);
        assert!(d.is_read_only());
        assert_eq!(d.item_type(), 2);
        assert!(d.has_header());
        assert!(!d.is_header());
    }

    #[test]
    fn test_parse_short_window() {
        let data = raw(2000, 32, 0, 0);
        assert!(Descriptor::parse(&data[..31], 0).is_none());
        assert!(Descriptor::parse(&data, 1).is_none());
    }

    #[test]
    fn test_header_validity() {
        let header = flags::HAS_HEADER | flags::IS_HEADER;
        assert!(Descriptor::parse(&raw(2000, 32, 0, header), 0).unwrap().is_valid_header());
        assert!(!Descriptor::parse(&raw(1000, 32, 0, header), 0).unwrap().is_valid_header());
        assert!(!Descriptor::parse(&raw(2000, 32, 0, flags::IS_HEADER), 0).unwrap().is_valid_header());
        assert!(!Descriptor::parse(&raw(2000, 32, 0, header | 1 << 3), 0).unwrap().is_valid_header());
    }

    #[test]
    fn test_footer_validity() {
        assert!(Descriptor::parse(&raw(2000, 32, 0, 0), 0).unwrap().is_valid_footer());
        // Footers do not check the version
        assert!(Descriptor::parse(&raw(1000, 32, 0, flags::HAS_HEADER), 0).unwrap().is_valid_footer());
        assert!(!Descriptor::parse(&raw(2000, 32, 0, flags::NO_FOOTER), 0).unwrap().is_valid_footer());
        assert!(!Descriptor::parse(&raw(2000, 32, 0, flags::IS_HEADER), 0).unwrap().is_valid_footer());
        assert!(!Descriptor::parse(&raw(2000, 32, 0, 1 << 28), 0).unwrap().is_valid_footer());
    }

    #[test]
    fn test_bad_signature() {
        let mut data = raw(2000, 32, 0, 0);
        data[3] = b'x';
        let d = Descriptor::parse(&data, 0).unwrap();
        assert!(!d.is_valid_footer());
        assert!(!d.is_valid_header());
    }

    #[test]
    fn test_reserved_is_ignored() {
        let mut data = raw(2000, 32, 0, 0);
        data[24..32].fill(0xFF);
        let d = Descriptor::parse(&data, 0).unwrap();
        assert_eq!(d.reserved, [u32::MAX, u32::MAX]);
        assert!(d.is_valid_footer());
    }
}
