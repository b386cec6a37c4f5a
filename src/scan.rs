// Locating tags in a whole file buffer

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ape::{resolve_len, ApeTag, Descriptor, Located, DESCRIPTOR_SIZE};
use crate::error::Result;
use crate::id3::Id3v1Tag;

/// Where to look for tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Probe for a header at the start of the buffer
    pub probe_start: bool,
    /// Probe for a footer at the end of the buffer
    pub probe_end: bool,
    /// Step over an ID3v1 trailer before probing the end
    pub id3v1_trailer: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            probe_start: true,
            probe_end: true,
            id3v1_trailer: true,
        }
    }
}

/// Tags found in a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub ape: Option<Located>,
    pub id3v1: Option<Located>,
}

impl ScanReport {
    pub fn ape_tag(&self, data: &[u8]) -> Result<Option<ApeTag>> {
        self.ape
            .map(|at| ApeTag::new(data, at.offset, at.len))
            .transpose()
    }

    pub fn id3v1_tag(&self, data: &[u8]) -> Result<Option<Id3v1Tag>> {
        self.id3v1
            .map(|at| Id3v1Tag::new(data, at.offset))
            .transpose()
    }
}

/// Look for an APE tag at the start and end of `data`, and an ID3v1 trailer.
///
/// Only inconsistent APE tags are errors; a buffer with no tags yields an
/// empty report.
pub fn scan(data: &[u8], options: &ScanOptions) -> Result<ScanReport> {
    let mut report = ScanReport::default();

    if options.probe_start {
        report.ape = resolve_len(data, 0, data.len())?;
    }

    if options.id3v1_trailer {
        report.id3v1 = Id3v1Tag::detect(data);
    }

    if report.ape.is_none() && options.probe_end {
        let end = report.id3v1.map_or(data.len(), |at| at.offset);
        if let Some(footer_pos) = end.checked_sub(DESCRIPTOR_SIZE) {
            report.ape = resolve_len(data, footer_pos, DESCRIPTOR_SIZE)?
                .map(|at| with_header(data, at));
        }
    }

    debug!(ape = ?report.ape, id3v1 = ?report.id3v1, "scan complete");
    Ok(report)
}

/// Extend a tag found through its footer by the header in front of it.
///
/// The footer pass only covers items and footer; when the footer announces a
/// header and a matching one sits right before the items, it belongs to the tag.
fn with_header(data: &[u8], at: Located) -> Located {
    let Some(footer) = at
        .end()
        .checked_sub(DESCRIPTOR_SIZE)
        .and_then(|pos| Descriptor::parse(data, pos))
    else {
        return at;
    };
    let Some(header) = at
        .offset
        .checked_sub(DESCRIPTOR_SIZE)
        .and_then(|pos| Descriptor::parse(data, pos))
    else {
        return at;
    };

    if footer.has_header() && header.is_valid_header() && header.item_count == footer.item_count {
        Located {
            offset: at.offset - DESCRIPTOR_SIZE,
            len: at.len + DESCRIPTOR_SIZE,
        }
    } else {
        at
    }
}
