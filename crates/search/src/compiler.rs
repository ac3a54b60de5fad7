use regex::{Regex, RegexBuilder};

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Regex,
    Literal,
}

impl SearchMode {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regex" | "regexp" => Some(Self::Regex),
            "literal" | "plain" | "text" => Some(Self::Literal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            mode: SearchMode::Regex,
        }
    }
}

/// Trimmed, non-blank input lines in the order they were typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    lines: Vec<String>,
}

impl PatternSet {
    pub fn parse(raw: &str) -> Self {
        let lines = raw
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCheck {
    pub pattern: String,
    pub error: Option<String>,
}

impl LineCheck {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// The "any line matches here" regex used for the document scan.
#[derive(Debug, Clone)]
pub struct CombinedMatcher {
    regex: Regex,
}

impl CombinedMatcher {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Every match in `text`, scanning from offset 0.
    pub fn find_all<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            regex: &self.regex,
            text,
            cursor: Some(0),
        }
    }
}

/// Byte ranges of successive matches. An empty match is reported, then the
/// cursor moves one character past it, so the scan always terminates.
pub struct Matches<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    cursor: Option<usize>,
}

impl Iterator for Matches<'_, '_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor?;
        let Some(found) = self.regex.find_at(self.text, cursor) else {
            self.cursor = None;
            return None;
        };

        let (start, end) = (found.start(), found.end());
        self.cursor = if start == end {
            next_char_boundary(self.text, end)
        } else {
            Some(end)
        };
        Some((start, end))
    }
}

fn next_char_boundary(text: &str, at: usize) -> Option<usize> {
    text.get(at..)?
        .chars()
        .next()
        .map(|ch| at + ch.len_utf8())
}

#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    patterns: PatternSet,
    checks: Vec<LineCheck>,
    matcher: CombinedMatcher,
}

impl CompiledPatterns {
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn matcher(&self) -> &CombinedMatcher {
        &self.matcher
    }

    pub fn valid_lines(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|check| check.is_valid())
            .map(|check| check.pattern.as_str())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &LineCheck> {
        self.checks.iter().filter(|check| !check.is_valid())
    }
}

fn prepare(line: &str, mode: SearchMode) -> String {
    match mode {
        SearchMode::Regex => line.to_string(),
        SearchMode::Literal => regex::escape(line),
    }
}

fn build(pattern: &str, config: &SearchConfig) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(!config.case_sensitive)
        .build()
}

/// Compiles every line on its own and reports which ones are usable.
pub fn check_lines(patterns: &PatternSet, config: &SearchConfig) -> Vec<LineCheck> {
    patterns
        .lines()
        .iter()
        .map(|line| LineCheck {
            pattern: line.clone(),
            error: build(&prepare(line, config.mode), config)
                .err()
                .map(|e| e.to_string()),
        })
        .collect()
}

/// `Ok(None)` means there was nothing to compile.
pub fn compile(raw: &str, config: &SearchConfig) -> Result<Option<CompiledPatterns>, SearchError> {
    let patterns = PatternSet::parse(raw);
    if patterns.is_empty() {
        return Ok(None);
    }

    let checks = check_lines(&patterns, config);
    for check in checks.iter().filter(|check| !check.is_valid()) {
        log::warn!(
            "Invalid regex: {} ({})",
            check.pattern,
            check.error.as_deref().unwrap_or_default()
        );
    }

    let parts: Vec<String> = checks
        .iter()
        .filter(|check| check.is_valid())
        .map(|check| format!("(?:{})", prepare(&check.pattern, config.mode)))
        .collect();

    if parts.is_empty() {
        let first = &checks[0];
        return Err(SearchError::InvalidPattern {
            pattern: first.pattern.clone(),
            message: first.error.clone().unwrap_or_default(),
        });
    }

    let combined = parts.join("|");
    let regex = build(&combined, config).map_err(|e| SearchError::invalid(&combined, &e))?;

    Ok(Some(CompiledPatterns {
        patterns,
        checks,
        matcher: CombinedMatcher { regex },
    }))
}
