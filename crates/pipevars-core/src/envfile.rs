//! Env-file output.
//!
//! Lines follow the CI environment-file convention: `KEY=value` for plain
//! values and a heredoc block for anything that would be ambiguous on one
//! line:
//!
//! ```text
//! KEY<<EOF
//! value
//! EOF
//! ```

use crate::{Error, ExportSettings, FlatMapping, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Heredoc delimiter for multi-line entries.
pub const HEREDOC_DELIMITER: &str = "EOF";

const HEREDOC_TRIGGERS: [char; 6] = ['\n', '\r', '\\', '%', '=', ':'];

/// Whether `value` must be written as a heredoc block.
pub fn needs_heredoc(value: &str) -> bool {
    value.contains(HEREDOC_TRIGGERS)
}

/// Format one entry, including the trailing newline.
pub fn format_env_entry(key: &str, value: &str) -> String {
    if needs_heredoc(value) {
        format!("{key}<<{HEREDOC_DELIMITER}\n{value}\n{HEREDOC_DELIMITER}\n")
    } else {
        format!("{key}={value}\n")
    }
}

/// Render a whole mapping in insertion order with the settings' prefix.
pub fn render_env_file(mapping: &FlatMapping, settings: &ExportSettings) -> String {
    mapping
        .iter()
        .map(|(key, value)| format_env_entry(&settings.export_key(key), &value.to_env_string()))
        .collect()
}

/// Append-only writer for an env file.
///
/// The file is created if missing and never truncated. Buffered output is
/// flushed by [`EnvFileWriter::finish`].
pub struct EnvFileWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl EnvFileWriter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::OutputOpen {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_entry(&mut self, key: &str, value: &str) -> Result<()> {
        self.out.write_all(format_env_entry(key, value).as_bytes())?;
        Ok(())
    }

    /// Flush everything written so far. The file is closed on drop.
    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
