//! CLI command implementations.

pub mod export;
pub mod print;

use anyhow::{Context, Result};
use pipevars_config::{PipelineReport, VariablePipeline};
use pipevars_core::ExportSettings;

/// Run the variable pipeline for the configured files.
fn load(settings: &ExportSettings) -> Result<PipelineReport> {
    if settings.files.is_empty() {
        tracing::warn!("No input files given");
    }

    VariablePipeline::from_settings(settings)
        .run(&settings.files)
        .context("Failed to load variables")
}
