//! Export resolved variables to the CI environment file.

use super::load;
use anyhow::{Context, Result};
use pipevars_core::{EnvFileWriter, Error, ExportSettings};
use tracing::info;

/// Append every resolved variable to the settings' output file.
///
/// Returns the number of variables written. Skipped input files are echoed
/// as `::warning::` workflow commands so they show up in the CI run.
pub fn run(settings: &ExportSettings) -> Result<usize> {
    let output = settings
        .output
        .as_deref()
        .ok_or(Error::MissingOutput)
        .context("Set --output or the GITHUB_ENV environment variable")?;

    let report = load(settings)?;

    for reason in &report.skipped {
        println!("::warning::{reason}");
    }

    let mut writer = EnvFileWriter::open(output)?;
    for (key, value) in &report.variables {
        let key = settings.export_key(key);
        let value = value.to_env_string();
        writer.write_entry(&key, &value)?;
        println!("Exported: {key}={value}");
    }
    writer.finish()?;

    let count = report.variables.len();
    info!(count, output = %output.display(), "Exported variables");
    Ok(count)
}
