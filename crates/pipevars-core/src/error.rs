//! Error types for pipevars.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no output destination configured")]
    MissingOutput,

    #[error("cannot open output file {}: {source}", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
