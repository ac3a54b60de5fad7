use anyhow::Result;
use regex_search_history::{HistoryEntry, HistoryService};

use super::{escape_newlines, open_history};
use crate::config::Settings;

pub fn run(host: Option<String>) {
    let settings = Settings::load();
    let entries = open_history(&settings).and_then(|history| {
        let entries = entries_for(&history, host.as_deref());
        history.shutdown();
        entries
    });

    match entries {
        Ok(entries) if entries.is_empty() => match host {
            Some(host) => println!("No saved pattern for {}", host),
            None => println!("No saved patterns"),
        },
        Ok(entries) => {
            let width = entries.iter().map(|e| e.host.len()).max().unwrap_or(0);
            for entry in entries {
                println!("{:width$}  {}", entry.host, escape_newlines(&entry.regex));
            }
        }
        Err(e) => {
            eprintln!("Failed to read history: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Most recent first.
fn entries_for(history: &HistoryService, host: Option<&str>) -> Result<Vec<HistoryEntry>> {
    let mut entries = history.entries()?;
    if let Some(host) = host {
        entries.retain(|entry| entry.host == host);
    }
    Ok(entries)
}
