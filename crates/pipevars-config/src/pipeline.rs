//! Load, merge and resolve a list of variable files.

use crate::ConfigResult;
use crate::loader::{Loaded, SkipReason, try_load};
use crate::normalize::normalize;
use crate::resolve::Resolver;
use pipevars_core::{DEFAULT_SEPARATOR, ExportSettings, FlatMapping};
use std::path::Path;
use tracing::{info, warn};

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Merged and resolved variables, in first-insertion order.
    pub variables: FlatMapping,
    /// Files that contributed nothing, in input order.
    pub skipped: Vec<SkipReason>,
    /// Resolver passes executed.
    pub passes: usize,
    /// Whether resolution reached a fixed point.
    pub converged: bool,
}

/// Sequential loader -> normalizer -> merge -> resolver pipeline.
#[derive(Debug, Clone)]
pub struct VariablePipeline {
    separator: String,
    resolver: Resolver,
}

impl Default for VariablePipeline {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl VariablePipeline {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            resolver: Resolver::default(),
        }
    }

    /// Build a pipeline from export settings.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self::new(settings.separator.clone())
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Process `paths` in order. Later files overwrite earlier keys.
    ///
    /// Missing files and unsupported formats are logged and skipped; parse
    /// errors abort the run.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> ConfigResult<PipelineReport> {
        let mut merged = FlatMapping::new();
        let mut skipped = Vec::new();

        for path in paths {
            let path = path.as_ref();
            match try_load(path)? {
                Loaded::Document(document) => {
                    let flat = normalize(document, &self.separator);
                    info!(path = %path.display(), count = flat.len(), "Loaded variables");
                    merged.extend(flat);
                }
                Loaded::Skipped(reason) => {
                    warn!(path = %path.display(), "{}", reason);
                    skipped.push(reason);
                }
            }
        }

        let resolution = self.resolver.resolve(merged);

        Ok(PipelineReport {
            variables: resolution.mapping,
            skipped,
            passes: resolution.passes,
            converged: resolution.converged,
        })
    }
}
