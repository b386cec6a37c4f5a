// CLI binary entry point for apetag

mod cli;

use clap::Parser;
use std::process;

use cli::commands::{command_detect, command_extract, command_genre, command_items};
use cli::{Commands, Config, OutputFormatter};

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let formatter = OutputFormatter::new(config.format);
    let options = config.scan_options();

    let result = match &config.command {
        Commands::Detect { files, raw } => command_detect(files, *raw, &options, &formatter),
        Commands::Extract { file, output } => command_extract(file, output, &options),
        Commands::Items { files } => command_items(files, &options, &formatter),
        Commands::Genre { query, list } => command_genre(query.as_deref(), *list, &formatter),
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        process::exit(1);
    }
}
