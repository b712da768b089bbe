//! Core types for pipevars.
//!
//! This crate contains:
//! - The untyped document `Value` and the `FlatMapping` alias
//! - Export settings shared by the pipeline and the CLI
//! - Env-file formatting and the append-only env-file writer

pub mod envfile;
pub mod error;
pub mod settings;
pub mod value;

pub use envfile::{EnvFileWriter, format_env_entry, render_env_file};
pub use error::{Error, Result};
pub use settings::{DEFAULT_SEPARATOR, ExportSettings, parse_file_list};
pub use value::{FlatMapping, Value};
