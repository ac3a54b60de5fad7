use crate::config::{config_path, parse_settings};

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            return;
        }
    };

    if !path.exists() {
        println!("# Config file: {} (not created yet)", path.display());
        println!("# Using default configuration");
        println!();
        print_defaults();
        return;
    }

    println!("# Config file: {}", path.display());
    println!();

    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            if contents.trim().is_empty() {
                println!("# (empty file - using defaults)");
                println!();
                print_defaults();
            } else {
                print!("{}", contents);
                if !contents.ends_with('\n') {
                    println!();
                }
                let settings = parse_settings(&contents);
                println!();
                match settings.history_path() {
                    Some(store) => println!("# History store: {}", store.display()),
                    None => println!("# History store: (in memory)"),
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to read config file: {}", e);
        }
    }
}

fn print_defaults() {
    println!("# Default values:");
    println!("mode = regex");
    println!("case_sensitive = true");
    println!("history_limit = {}", regex_search_history::DEFAULT_LIMIT);
    if let Some(store) = regex_search_history::default_store_path() {
        println!("history_file = {}", store.display());
    }
    println!("smooth_scroll = true");
    println!("scroll_duration_ms = 200");
}
