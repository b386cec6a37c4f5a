// APE tag container

use crate::ape::{Descriptor, ItemReader, DESCRIPTOR_SIZE};
use crate::error::{Result, TagError};
use crate::Tag;

/// An APE tag held as the raw bytes it was resolved from.
///
/// The bytes are copied out of the source buffer once and never changed;
/// serializing writes them back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApeTag {
    data: Vec<u8>,
}

impl ApeTag {
    /// Copy `len` bytes starting at `offset`
    pub fn new(data: &[u8], offset: usize, len: usize) -> Result<Self> {
        let bytes = offset
            .checked_add(len)
            .and_then(|end| data.get(offset..end))
            .ok_or(TagError::OutOfBounds {
                offset,
                len,
                available: data.len(),
            })?;

        Ok(ApeTag {
            data: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Items of the tag, located through its footer
    pub fn items(&self) -> Option<ItemReader<'_>> {
        let footer_pos = self.data.len().checked_sub(DESCRIPTOR_SIZE)?;
        let footer = Descriptor::parse(&self.data, footer_pos)?;
        if !footer.is_valid_footer() {
            return None;
        }
        let payload = (footer.size as usize).checked_sub(DESCRIPTOR_SIZE)?;
        let items_start = footer_pos.checked_sub(payload)?;
        Some(ItemReader::new(
            &self.data[items_start..footer_pos],
            footer.item_count,
        ))
    }
}

impl Tag for ApeTag {
    fn size(&self) -> usize {
        self.data.len()
    }

    fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.data);
    }
}
