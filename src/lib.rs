//! apetag - APEv2 tag extent resolution for audio files
//!
//! Finds how many bytes an APE tag occupies inside a buffer that is already
//! in memory, and keeps those bytes as an opaque tag that can be written back
//! unchanged. Values are never decoded.
//!
//! ```
//! use apetag::{scan, ScanOptions, Tag};
//!
//! # fn main() -> apetag::Result<()> {
//! let data = std::fs::read("Cargo.toml").unwrap_or_default();
//! let report = scan(&data, &ScanOptions::default())?;
//! if let Some(tag) = report.ape_tag(&data)? {
//!     let mut out = Vec::new();
//!     tag.serialize(&mut out);
//!     assert_eq!(out.len(), tag.size());
//! }
//! # Ok(())
//! # }
//! ```

pub mod ape;
pub mod error;
pub mod genre;
pub mod id3;
pub mod scan;
mod utils;

pub use ape::{resolve, resolve_len, ApeTag, Extent, Located, Request};
pub use error::{Result, TagError};
pub use id3::Id3v1Tag;
pub use scan::{scan, ScanOptions, ScanReport};

/// A tag kept as raw bytes.
///
/// Every supported tag kind can report its size and append itself to an
/// output stream, so callers rebuilding a file can treat them alike.
pub trait Tag {
    /// Size of the tag in bytes
    fn size(&self) -> usize;

    /// Append the tag bytes to `out`
    fn serialize(&self, out: &mut Vec<u8>);
}
