use std::path::PathBuf;

use clap::Parser;
use canopy::cli::commands::{Cli, Commands};
use canopy::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let dir = cli
        .workspace_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    match &cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = canopy::tui::run(&dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            // Init is handled before workspace loading
            if let Err(e) = handlers::cmd_init(&dir, args) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
