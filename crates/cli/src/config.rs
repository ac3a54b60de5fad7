use std::path::PathBuf;

use regex_search_engine::{SearchConfig, SearchMode};

/// Returns the path to the config file
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

/// The subset of the config file the CLI acts on.
#[derive(Debug, Clone)]
pub struct Settings {
    pub search: SearchConfig,
    pub history_limit: usize,
    pub history_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            history_limit: regex_search_history::DEFAULT_LIMIT,
            history_file: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|contents| parse_settings(&contents))
            .unwrap_or_default()
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(regex_search_history::default_store_path)
    }
}

/// Parses settings from config file contents
pub fn parse_settings(contents: &str) -> Settings {
    let mut settings = Settings::default();

    for line in contents.lines() {
        let trimmed = line.trim();

        // Skip comments and empty lines
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "mode" => {
                if let Some(mode) = SearchMode::from_str(value) {
                    settings.search.mode = mode;
                }
            }
            "case_sensitive" => match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => settings.search.case_sensitive = true,
                "false" | "0" | "no" | "off" => settings.search.case_sensitive = false,
                _ => {}
            },
            "history_limit" => {
                if let Ok(limit) = value.parse::<usize>() {
                    settings.history_limit = limit.clamp(1, 1000);
                }
            }
            "history_file" => {
                let value = value.trim_matches(|c| c == '"' || c == '\'').trim();
                if !value.is_empty() {
                    settings.history_file = Some(expand_home(value));
                }
            }
            _ => {}
        }
    }

    settings
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let settings = parse_settings(
            "# comment\n\
             mode = literal\n\
             case_sensitive = false\n\
             history_limit = 0\n\
             history_file = \"/tmp/store.json\"\n\
             smooth_scroll = false\n",
        );
        assert_eq!(settings.search.mode, SearchMode::Literal);
        assert!(!settings.search.case_sensitive);
        assert_eq!(settings.history_limit, 1);
        assert_eq!(settings.history_path(), Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let settings = parse_settings("mode = fuzzy\ncase_sensitive = maybe\nhistory_limit = x\n");
        assert_eq!(settings.search.mode, SearchMode::Regex);
        assert!(settings.search.case_sensitive);
        assert_eq!(settings.history_limit, regex_search_history::DEFAULT_LIMIT);
    }

    #[test]
    fn test_history_file_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let settings = parse_settings("history_file = ~/store.json\n");
        assert_eq!(settings.history_file, Some(home.join("store.json")));
        let settings = parse_settings("history_file = ~\n");
        assert_eq!(settings.history_file, Some(home));
        let settings = parse_settings("history_file = ~user/store.json\n");
        assert_eq!(settings.history_file, Some(PathBuf::from("~user/store.json")));
    }
}
