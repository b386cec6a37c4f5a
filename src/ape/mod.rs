// APE tag support
//
// APEv2 tags are used by Monkey's Audio, Musepack, WavPack and are often
// appended to MP3 files. A tag is laid out as:
//
// - Header (optional, 32 bytes)
// - Items (item count from the descriptor)
//   - Value size: 4 bytes, little-endian
//   - Item flags: 4 bytes
//   - Key: NUL-terminated string
//   - Value: `value size` bytes, no terminator
// - Footer (32 bytes)
//
// Header and footer share one layout:
//   - Signature: "APETAGEX" (8 bytes)
//   - Version: 4 bytes, little-endian
//   - Tag size: items + footer, header excluded (4 bytes)
//   - Item count: (4 bytes)
//   - Flags: (4 bytes)
//   - Reserved: (8 bytes)
//
// Reference:
// - https://wiki.hydrogenaud.io/index.php?title=APE_Tag

pub mod descriptor;
pub mod item;
pub mod resolve;
pub mod tag;

#[cfg(test)]
pub(crate) mod fixtures;

pub use descriptor::Descriptor;
pub use item::{ItemReader, ItemRef};
pub use resolve::{resolve, resolve_len, Extent, Located, Request};
pub use tag::ApeTag;

pub const APE_SIGNATURE: &[u8; 8] = b"APETAGEX";
pub const APE_VERSION: u32 = 2000;

/// Size of a header or footer in bytes
pub const DESCRIPTOR_SIZE: usize = 32;

/// Size of the fixed item prefix (value size + flags)
pub const ITEM_PREFIX_SIZE: usize = 8;

/// APE tag and item flags
pub mod flags {
    pub const READ_ONLY: u32 = 1;
    pub const ITEM_TYPE_MASK: u32 = 0b110;
    /// Bits 3 to 28, must be zero
    pub const UNDEFINED_MASK: u32 = 0x1FFF_FFF8;
    pub const IS_HEADER: u32 = 1 << 29;
    pub const NO_FOOTER: u32 = 1 << 30;
    pub const HAS_HEADER: u32 = 1 << 31;
}
