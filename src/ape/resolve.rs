// APE tag extent resolution
//
// Works out how many bytes an APE tag occupies without decoding any of its
// values. A tag may be found through its header (followed by items and a
// footer) or through its footer alone, in which case the items sit before
// the probed position and a second, footer-only pass yields the length.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::ape::{Descriptor, APE_VERSION, DESCRIPTOR_SIZE, ITEM_PREFIX_SIZE};
use crate::error::{Result, TagError};
use crate::utils::io::read_le_u32;

/// What the caller knows about the candidate position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Look for a header or footer at `offset`, with `available` bytes usable
    /// from there (typically the rest of the file).
    Probe { offset: usize, available: usize },
    /// Second pass over a footer-only tag. `offset` is the tag start reported
    /// by [`Extent::FooterOnly`], `distance` how far its footer lies past it.
    FooterOnlyReentry { offset: usize, distance: usize },
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// No tag at this position
    Absent,
    /// The tag covers `len` bytes from the requested offset
    Span(usize),
    /// The probe hit a footer whose items start `distance` bytes earlier, at
    /// `start`. Re-enter with [`Request::FooterOnlyReentry`].
    FooterOnly { start: usize, distance: usize },
}

impl Extent {
    /// Tag length, if this is a complete span
    pub fn span(&self) -> Option<usize> {
        match self {
            Extent::Span(len) => Some(*len),
            _ => None,
        }
    }
}

/// A resolved tag position inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Located {
    pub offset: usize,
    pub len: usize,
}

impl Located {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Resolve the extent of an APE tag in `data`.
///
/// `Ok(Extent::Absent)` means there is no tag at the requested position (no
/// signature, or not enough bytes). An `Err` means a tag is there but its
/// descriptors contradict each other or the item list.
pub fn resolve(data: &[u8], request: Request) -> Result<Extent> {
    match request {
        Request::Probe { offset, available } => probe(data, offset, available),
        Request::FooterOnlyReentry { offset, distance } => reenter(data, offset, distance),
    }
}

/// Probe at `offset` and, for a footer-only tag, run the re-entry pass too.
pub fn resolve_len(data: &[u8], offset: usize, available: usize) -> Result<Option<Located>> {
    match resolve(data, Request::Probe { offset, available })? {
        Extent::Absent => Ok(None),
        Extent::Span(len) => Ok(Some(Located { offset, len })),
        Extent::FooterOnly { start, distance } => {
            let reentry = Request::FooterOnlyReentry {
                offset: start,
                distance,
            };
            Ok(resolve(data, reentry)?
                .span()
                .map(|len| Located { offset: start, len }))
        }
    }
}

fn corrupt(err: TagError) -> Result<Extent> {
    warn!(%err, "inconsistent APE tag");
    Err(err)
}

fn reenter(data: &[u8], offset: usize, distance: usize) -> Result<Extent> {
    let Some(footer_pos) = offset.checked_add(distance) else {
        return Ok(Extent::Absent);
    };

    let Some(footer) = Descriptor::parse(data, footer_pos) else {
        debug!(offset = footer_pos, "no room for APE footer on re-entry");
        return Ok(Extent::Absent);
    };

    if !footer.is_valid_footer() {
        return corrupt(TagError::ReentryFooterInvalid { offset: footer_pos });
    }

    Ok(Extent::Span(distance + DESCRIPTOR_SIZE))
}

fn probe(data: &[u8], offset: usize, available: usize) -> Result<Extent> {
    let available = available.min(data.len().saturating_sub(offset));
    if available < DESCRIPTOR_SIZE {
        debug!(offset, available, "too few bytes for an APE descriptor");
        return Ok(Extent::Absent);
    }
    let Some(first) = Descriptor::parse(data, offset) else {
        return Ok(Extent::Absent);
    };

    // `pos + budget` always equals `offset + available`
    let mut budget = available - DESCRIPTOR_SIZE;
    let items_start = if first.is_valid_header() {
        if first.size as usize != DESCRIPTOR_SIZE {
            return corrupt(TagError::HeaderSizeMismatch {
                offset,
                size: first.size,
            });
        }
        offset + DESCRIPTOR_SIZE
    } else if first.is_valid_footer() {
        if first.version != APE_VERSION {
            return corrupt(TagError::FooterOnlyVersion {
                offset,
                version: first.version,
            });
        }
        let size = first.size as usize;
        if size <= DESCRIPTOR_SIZE {
            return corrupt(TagError::FooterStartNotBefore {
                offset,
                size: first.size,
            });
        }
        // A tag reaching past the buffer start is not resident here, so it is absent
        let Some(start) = offset.checked_sub(size - DESCRIPTOR_SIZE) else {
            debug!(offset, size, "APE footer reaches before the start of the buffer");
            return Ok(Extent::Absent);
        };
        budget += size;
        start
    } else {
        debug!(offset, "no APE header or footer");
        return Ok(Extent::Absent);
    };

    let Some(items_end) = walk_items(data, items_start, first.item_count, &mut budget) else {
        return Ok(Extent::Absent);
    };

    if items_start < offset {
        // Footer-only: the footer we probed closes the item list
        if items_end != offset {
            return corrupt(TagError::ItemsEndMismatch {
                end: items_end,
                footer: offset,
            });
        }
        return Ok(Extent::FooterOnly {
            start: items_start,
            distance: offset - items_start,
        });
    }

    if budget < DESCRIPTOR_SIZE {
        debug!(offset = items_end, "no room for APE footer after items");
        return Ok(Extent::Absent);
    }
    let footer = match Descriptor::parse(data, items_end) {
        Some(footer) if footer.is_valid_footer() => footer,
        _ => {
            debug!(offset = items_end, "no valid APE footer after items");
            return Ok(Extent::Absent);
        }
    };

    let footer_end = items_end + DESCRIPTOR_SIZE;
    let actual = footer_end - items_start;
    if footer.size as usize != actual {
        return corrupt(TagError::FooterSizeMismatch {
            offset: items_end,
            declared: footer.size,
            actual,
        });
    }
    if footer.item_count != first.item_count {
        return corrupt(TagError::ItemCountMismatch {
            header: first.item_count,
            footer: footer.item_count,
        });
    }

    Ok(Extent::Span(footer_end - offset))
}

/// Skip `count` items from `pos`, charging every byte against `budget`.
///
/// Returns the position just past the last item, or `None` when the items do
/// not fit.
fn walk_items(data: &[u8], mut pos: usize, count: u32, budget: &mut usize) -> Option<usize> {
    for index in 0..count {
        if *budget < ITEM_PREFIX_SIZE {
            debug!(index, pos, "APE item prefix truncated");
            return None;
        }
        let value_size = read_le_u32(data, pos)? as usize;
        *budget -= ITEM_PREFIX_SIZE;
        pos += ITEM_PREFIX_SIZE;

        let key_start = pos;
        loop {
            if *budget == 0 {
                debug!(index, pos = key_start, "APE item key is not terminated");
                return None;
            }
            *budget -= 1;
            let byte = *data.get(pos)?;
            pos += 1;
            if byte == 0 {
                break;
            }
        }

        if *budget < value_size {
            debug!(index, value_size, "APE item value truncated");
            return None;
        }
        *budget -= value_size;
        pos += value_size;
        trace!(index, key_len = pos - key_start - value_size - 1, value_size, "APE item");
    }
    Some(pos)
}
