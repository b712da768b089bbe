//! Variable file handling for pipevars.
//!
//! This crate handles:
//! - Loading YAML, JSON and dotenv files
//! - Extracting pipeline `variables` blocks and flattening nested keys
//! - Resolving `$(Name)` references between variables

pub mod error;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod resolve;

pub use error::{ConfigError, ConfigResult};
pub use loader::{Format, Loaded, RawDocument, SkipReason, load_file, try_load};
pub use normalize::{extract_variables, flatten, flatten_with, normalize};
pub use pipeline::{PipelineReport, VariablePipeline};
pub use resolve::{MAX_PASSES, Resolution, Resolver, resolve_references, unresolved_references};
