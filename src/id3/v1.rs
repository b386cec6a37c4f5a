// ID3v1 trailer container

use crate::ape::Located;
use crate::error::{Result, TagError};
use crate::utils::io::{check_signature, read_slice};
use crate::Tag;

const TAG_SIZE: usize = 128;

/// The fixed 128-byte ID3v1 trailer, kept as raw bytes.
///
/// APE tags in MP3 files usually sit right before this trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    data: [u8; TAG_SIZE],
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = TAG_SIZE;
    const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];

    /// Find an ID3v1 trailer at the end of `data`
    pub fn detect(data: &[u8]) -> Option<Located> {
        let offset = data.len().checked_sub(Self::TAG_SIZE)?;
        if !check_signature(data, offset, &Self::TAG_ID) {
            return None;
        }
        Some(Located {
            offset,
            len: Self::TAG_SIZE,
        })
    }

    /// Copy the trailer starting at `offset`
    pub fn new(data: &[u8], offset: usize) -> Result<Self> {
        let bytes = read_slice(data, offset, Self::TAG_SIZE).ok_or(TagError::OutOfBounds {
            offset,
            len: Self::TAG_SIZE,
            available: data.len(),
        })?;

        let mut tag = Id3v1Tag {
            data: [0u8; Self::TAG_SIZE],
        };
        tag.data.copy_from_slice(bytes);
        Ok(tag)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw genre byte, an index into [`crate::genre`]
    pub fn genre_index(&self) -> u8 {
        self.data[127]
    }
}

impl Tag for Id3v1Tag {
    fn size(&self) -> usize {
        Self::TAG_SIZE
    }

    fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.data);
    }
}
