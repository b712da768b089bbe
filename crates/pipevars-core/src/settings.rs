//! Export settings.

use std::path::PathBuf;

/// Separator used to join nested keys (`a.b.c` becomes `a__b__c`).
pub const DEFAULT_SEPARATOR: &str = "__";

/// Everything a pipeline run needs to know, passed in explicitly instead of
/// being read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Input files, in merge order. Later files win on key collision.
    pub files: Vec<PathBuf>,
    /// Prepended to every exported key.
    pub prefix: Option<String>,
    /// Join separator for nested keys.
    pub separator: String,
    /// Append-only env-file destination.
    pub output: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            prefix: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            output: None,
        }
    }
}

impl ExportSettings {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    /// Set the key prefix. An empty prefix means no prefix; anything else,
    /// whitespace included, is used as given.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix)
        };
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// The exported name of `key`, with the prefix applied.
    pub fn export_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }
}

/// Split a comma-separated file list. Entries are trimmed and blanks dropped.
pub fn parse_file_list(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
