// Encoding utilities

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Decode an APE item key for display.
///
/// Keys are meant to be ASCII. Anything that is not valid UTF-8 is shown as
/// Windows-1252, which is what legacy taggers tend to write.
pub fn decode_key(data: &[u8]) -> String {
    match UTF_8.decode_without_bom_handling_and_without_replacement(data) {
        Some(text) => text.into_owned(),
        None => WINDOWS_1252.decode(data).0.into_owned(),
    }
}
