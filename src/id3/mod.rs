// ID3 tag handling
pub mod v1;

pub use v1::Id3v1Tag;
