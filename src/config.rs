use std::{fs, path::PathBuf};

use regex_search_engine::{ScrollBehavior, SearchConfig, SearchMode};

const DEFAULT_HISTORY_LIMIT: usize = regex_search_history::DEFAULT_LIMIT;
const MAX_HISTORY_LIMIT: usize = 1000;
const DEFAULT_SCROLL_DURATION_MS: u64 = 200;
const MAX_SCROLL_DURATION_MS: u64 = 2000;

const DEFAULT_CONFIG: &str = "# Pattern interpretation: regex or literal\n\
mode = regex\n\
# Match case exactly\n\
case_sensitive = true\n\
# Number of sites whose last pattern is remembered\n\
history_limit = 20\n\
# Where the per-site history is stored (~ supported)\n\
# history_file = ~/.local/share/regex-search/store.json\n\
# Animate scrolling to the current match\n\
smooth_scroll = true\n\
# Length of the scroll animation in milliseconds\n\
# scroll_duration_ms = 200\n";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub history_limit: usize,
    pub history_file: Option<PathBuf>,
    pub smooth_scroll: bool,
    pub scroll_duration_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Regex,
            case_sensitive: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_file: None,
            smooth_scroll: true,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let mut config = Self::default();
        let Some(path) = ensure_config_file() else {
            return config;
        };

        if let Ok(contents) = fs::read_to_string(&path) {
            config = Self::from_contents(&contents);
        }

        config
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            case_sensitive: self.case_sensitive,
            mode: self.mode,
        }
    }

    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        }
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(regex_search_history::default_store_path)
    }

    fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();

            if key.eq_ignore_ascii_case("mode") {
                if let Some(mode) = SearchMode::from_str(value) {
                    config.mode = mode;
                }
            }

            if key.eq_ignore_ascii_case("case_sensitive") {
                if let Some(case_sensitive) = parse_bool(value) {
                    config.case_sensitive = case_sensitive;
                }
            }

            if key.eq_ignore_ascii_case("history_limit") {
                if let Ok(limit) = value.parse::<usize>() {
                    config.history_limit = limit.clamp(1, MAX_HISTORY_LIMIT);
                }
            }

            if key.eq_ignore_ascii_case("history_file")
                && let Some(path) = parse_string_value(value)
            {
                config.history_file = Some(expand_home(&path));
            }

            if key.eq_ignore_ascii_case("smooth_scroll") {
                if let Some(smooth) = parse_bool(value) {
                    config.smooth_scroll = smooth;
                }
            }

            if key.eq_ignore_ascii_case("scroll_duration_ms") {
                if let Ok(duration) = value.parse::<u64>() {
                    config.scroll_duration_ms = duration.min(MAX_SCROLL_DURATION_MS);
                }
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unquoted = if (trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2)
        || (trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2)
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let unquoted = unquoted.trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&path, DEFAULT_CONFIG) {
            log::warn!("Failed to write default config {}: {}", path.display(), e);
        }
    }
    Some(path)
}

pub fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map(|p| p.join("regex-search").join("config.txt"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir().map(|p| p.join(".config").join("regex-search").join("config.txt"))
    }
}

/// Log file used while the overlay owns the terminal.
pub fn log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("regex-search").join("regex-search.log"))
}
