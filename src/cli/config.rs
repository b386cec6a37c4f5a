// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};

/// apetag - APE tag inspection tool
#[derive(Parser, Debug)]
#[command(name = "apetag")]
#[command(about = "Locate, list and extract APE tags in audio files", long_about = None)]
#[command(version)]
#[command(author = "xwsjjctz <xwsjjctz@icloud.com>")]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (only errors are logged)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (log every probe decision)
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not look for an ID3v1 trailer before the APE footer
    #[arg(long)]
    pub no_id3v1: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locate APE and ID3v1 tags in file(s)
    Detect {
        /// Audio file path(s) or glob patterns
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Include the raw APE tag bytes (base64)
        #[arg(long)]
        raw: bool,
    },

    /// Write the APE tag of a file, byte for byte, to another file
    Extract {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file
        #[arg(short, long)]
        output: String,
    },

    /// List the items of the APE tag in file(s)
    Items {
        /// Audio file path(s) or glob patterns
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// Look up an ID3v1 genre by name or index
    Genre {
        /// Genre name or numeric index
        #[arg(value_name = "QUERY", required_unless_present = "list")]
        query: Option<String>,

        /// Print the whole table
        #[arg(short, long)]
        list: bool,
    },
}

impl Config {
    pub fn scan_options(&self) -> apetag::ScanOptions {
        apetag::ScanOptions {
            id3v1_trailer: !self.no_id3v1,
            ..apetag::ScanOptions::default()
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect() {
        let config = Config::try_parse_from(["apetag", "-f", "json", "detect", "a.mp3", "b.ape"]).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(matches!(config.command, Commands::Detect { ref files, raw: false } if files.len() == 2));
        assert!(config.scan_options().id3v1_trailer);
    }

    #[test]
    fn test_genre_requires_query_or_list() {
        assert!(Config::try_parse_from(["apetag", "genre"]).is_err());
        assert!(Config::try_parse_from(["apetag", "genre", "--list"]).is_ok());
    }

    #[test]
    fn test_log_level() {
        let config = Config::try_parse_from(["apetag", "-v", "--no-id3v1", "items", "x"]).unwrap();
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
        assert!(!config.scan_options().id3v1_trailer);
    }
}
