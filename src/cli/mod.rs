// CLI module for apetag
//
// Only compiled into the binary; the library does no file I/O.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;
