use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "regex-search-cli")]
#[command(about = "Regex search CLI: run searches and manage saved patterns", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Show version information
    #[command(name = "-version")]
    Version,

    /// Show help and available actions
    #[command(name = "-help")]
    Help,

    /// Search a document and print every match
    #[command(name = "-search")]
    Search {
        /// JSON element tree or plain text file
        document: PathBuf,

        /// Site the pattern is saved for
        #[arg(long)]
        host: String,

        /// Pattern line; repeat for several lines
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Match lines as plain text
        #[arg(long)]
        literal: bool,

        /// Case-insensitive matching
        #[arg(long)]
        ignore_case: bool,
    },

    /// List saved patterns
    #[command(name = "-history")]
    History {
        #[arg(long)]
        host: Option<String>,
    },

    /// Remove the saved pattern for a host
    #[command(name = "-forget")]
    Forget { host: String },

    /// Check which pattern lines compile
    #[command(name = "-validate-patterns")]
    ValidatePatterns {
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Display current configuration
    #[command(name = "-show-config")]
    ShowConfig,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.action {
        Some(Action::Version) => commands::version::run(),
        Some(Action::Help) => commands::help::run(),
        Some(Action::Search {
            document,
            host,
            patterns,
            literal,
            ignore_case,
        }) => commands::search::run(commands::search::SearchArgs {
            document,
            host,
            patterns,
            literal,
            ignore_case,
        }),
        Some(Action::History { host }) => commands::history::run(host),
        Some(Action::Forget { host }) => commands::forget::run(host),
        Some(Action::ValidatePatterns { patterns }) => commands::validate_patterns::run(patterns),
        Some(Action::ShowConfig) => commands::show_config::run(),
        None => {
            // No subcommand: show help
            commands::help::run();
        }
    }
}
