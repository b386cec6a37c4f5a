// APE tag item listing

use crate::ape::{flags, ITEM_PREFIX_SIZE};
use crate::error::{Result, TagError};
use crate::utils::encoding::decode_key;
use crate::utils::io::{read_le_u32, read_slice};

/// A borrowed view of one item. The value is never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef<'a> {
    pub flags: u32,
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl ItemRef<'_> {
    /// Key as text, for display
    pub fn key_text(&self) -> String {
        decode_key(self.key)
    }

    pub fn is_read_only(&self) -> bool {
        self.flags & flags::READ_ONLY != 0
    }

    /// Item type bits (0 = UTF-8 text, 1 = binary, 2 = external locator)
    pub fn item_type(&self) -> u32 {
        (self.flags & flags::ITEM_TYPE_MASK) >> 1
    }
}

/// Iterates over the items of a tag whose extent is already known.
///
/// `data` starts at the first item; trailing bytes (such as the footer) are
/// left alone.
pub struct ItemReader<'a> {
    data: &'a [u8],
    pos: usize,
    index: u32,
    count: u32,
}

impl<'a> ItemReader<'a> {
    pub fn new(data: &'a [u8], count: u32) -> Self {
        ItemReader {
            data,
            pos: 0,
            index: 0,
            count,
        }
    }

    fn read_item(&mut self) -> Option<ItemRef<'a>> {
        let value_size = read_le_u32(self.data, self.pos)? as usize;
        let flags = read_le_u32(self.data, self.pos + 4)?;
        let key_start = self.pos + ITEM_PREFIX_SIZE;
        let key_len = self
            .data
            .get(key_start..)?
            .iter()
            .position(|&b| b == 0)?;
        let key = &self.data[key_start..key_start + key_len];
        let value_start = key_start + key_len + 1;
        let value = read_slice(self.data, value_start, value_size)?;

        self.pos = value_start + value_size;
        Some(ItemRef { flags, key, value })
    }
}

impl<'a> Iterator for ItemReader<'a> {
    type Item = Result<ItemRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        let position = self.pos;
        match self.read_item() {
            Some(item) => {
                self.index += 1;
                Some(Ok(item))
            }
            None => {
                // Stop after the first malformed item
                self.index = self.count;
                Some(Err(TagError::MalformedItem { index, position }))
            }
        }
    }
}
