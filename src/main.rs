use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use regex_search_engine::Document;
use regex_search_history::{HistoryService, JsonFileStore, KeyValueStore, MemoryStore};

mod config;
mod overlay;
mod text_input;

use config::AppConfig;
use overlay::Overlay;

#[derive(Parser)]
#[command(name = "regex-search")]
#[command(about = "Multi-line regex search overlay for documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Document to search: a JSON element tree or plain text
    document: PathBuf,

    /// Site the pattern history is kept for (defaults to the file name)
    #[arg(long)]
    host: Option<String>,

    /// Pre-fill the pattern box instead of using the saved pattern
    #[arg(long)]
    pattern: Option<String>,
}

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_create();
    let document = Document::from_path(&cli.document)?;
    let host = cli.host.unwrap_or_else(|| host_for(&cli.document));

    let store: Arc<dyn KeyValueStore> = match config.history_path() {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => {
            log::warn!("No data directory; pattern history will not persist");
            Arc::new(MemoryStore::new())
        }
    };
    let history = HistoryService::spawn(store, config.history_limit)?;
    let prefill = cli.pattern.or_else(|| history.last_for(&host));

    let Some(overlay) = Overlay::open(
        document,
        host.clone(),
        &config,
        Some(history.recorder(host)),
        prefill,
    ) else {
        log::info!("overlay already active");
        return Ok(());
    };
    let result = overlay::run(overlay);

    history.shutdown();
    result
}

/// Sends logs to a file, since stderr output would land on the overlay.
/// Without a log file the logger stays uninstalled.
fn init_logging() {
    let Some(file) = config::log_path().and_then(|path| open_log_file(&path)) else {
        return;
    };
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn host_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "local".to_string())
}
