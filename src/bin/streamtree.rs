//! Streamtree CLI Binary
//!
//! Command-line interface for replaying and inspecting streamed workspaces.

use clap::Parser;
use std::process;
use streamtree::config::ConfigLoader;
use streamtree::logging::init_logging;
use streamtree::tooling::cli::{Cli, CliContext};

fn main() {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        process::exit(1);
    });
    cli.apply_log_overrides(&mut config);

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let context = CliContext::with_config(config);
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
