//! Error types for tag resolution

use thiserror::Error;

/// Errors raised while resolving or copying a tag.
///
/// A tag that is simply not there is never an error; the resolver reports
/// that as [`Extent::Absent`](crate::ape::Extent::Absent). The variants below
/// mean the bytes looked like a tag but contradict themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A valid header declared a payload of its own.
    #[error("APE header at {offset} declares size {size}, expected 32")]
    HeaderSizeMismatch { offset: usize, size: u32 },
    /// A footer found without a header is not version 2000.
    #[error("APE footer-only tag at {offset} has version {version}, expected 2000")]
    FooterOnlyVersion { offset: usize, version: u32 },
    /// Walking back from a footer did not land before the footer.
    #[error("APE footer at {offset} declares size {size}, which does not reach before the footer")]
    FooterStartNotBefore { offset: usize, size: u32 },
    /// Items of a footer-only tag do not end where the footer begins.
    #[error("APE items end at {end}, but the footer starts at {footer}")]
    ItemsEndMismatch { end: usize, footer: usize },
    /// Footer size disagrees with the bytes between header and footer end.
    #[error("APE footer at {offset} declares size {declared}, actual size is {actual}")]
    FooterSizeMismatch {
        offset: usize,
        declared: u32,
        actual: usize,
    },
    /// Header and footer disagree on the number of items.
    #[error("APE header declares {header} items, footer declares {footer}")]
    ItemCountMismatch { header: u32, footer: u32 },
    /// Re-entering a footer-only tag did not find a valid footer.
    #[error("no valid APE footer at {offset} on footer-only re-entry")]
    ReentryFooterInvalid { offset: usize },
    /// A byte range does not fit inside the buffer.
    #[error("range {offset}+{len} is outside a buffer of {available} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },
    /// An item could not be read from already resolved tag bytes.
    #[error("malformed APE item {index} at byte {position}")]
    MalformedItem { index: u32, position: usize },
}

impl TagError {
    /// True for the internally inconsistent tag conditions.
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            TagError::OutOfBounds { .. } | TagError::MalformedItem { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TagError>;
