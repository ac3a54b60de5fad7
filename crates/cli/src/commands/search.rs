use std::path::PathBuf;

use anyhow::{Result, bail};
use regex_search_engine::{
    Document, HighlightRegistry, Navigator, SearchConfig, SearchMode, Status, TextSource,
};
use regex_search_history::HistoryService;

use super::{escape_newlines, open_history};
use crate::config::Settings;

pub struct SearchArgs {
    pub document: PathBuf,
    pub host: String,
    pub patterns: Vec<String>,
    pub literal: bool,
    pub ignore_case: bool,
}

pub struct Report {
    pub status: Status,
    /// `node:start..end  text` per match, in document order.
    pub matches: Vec<String>,
}

pub fn run(args: SearchArgs) {
    let settings = Settings::load();
    let history = match open_history(&settings) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("Failed to open history: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = search(&args, &settings, &history);
    history.shutdown();

    match result {
        Ok(report) => {
            println!("{}", report.status);
            for line in &report.matches {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn search(args: &SearchArgs, settings: &Settings, history: &HistoryService) -> Result<Report> {
    let input = if args.patterns.is_empty() {
        match history.last_for(&args.host) {
            Some(saved) => saved,
            None => bail!("No --pattern given and nothing saved for {}", args.host),
        }
    } else {
        args.patterns.join("\n")
    };

    let document = Document::from_path(&args.document)?;
    let recorder = history.recorder(args.host.as_str());
    let mut navigator = Navigator::new(search_config(args, settings))
        .with_recorder(move |raw: &str| recorder.record(raw));
    let mut surface = HighlightRegistry::new();

    let status = navigator.search(&input, &document, &mut surface);
    if let Some(error) = navigator.error() {
        log::warn!("{}", error);
    }

    let matches = navigator
        .matches()
        .spans()
        .iter()
        .map(|span| {
            let text = document
                .leaf_text(span.node)
                .and_then(|text| text.get(span.start..span.end))
                .unwrap_or_default();
            format!(
                "{}:{}..{}  {}",
                span.node,
                span.start,
                span.end,
                escape_newlines(text)
            )
        })
        .collect();

    Ok(Report { status, matches })
}

fn search_config(args: &SearchArgs, settings: &Settings) -> SearchConfig {
    let mut config = settings.search.clone();
    if args.literal {
        config.mode = SearchMode::Literal;
    }
    if args.ignore_case {
        config.case_sensitive = false;
    }
    config
}
