//! Print resolved variables.

use super::load;
use crate::PrintFormat;
use anyhow::Result;
use indexmap::IndexMap;
use pipevars_config::unresolved_references;
use pipevars_core::{ExportSettings, FlatMapping, Value, render_env_file};
use tracing::warn;

pub fn run(settings: &ExportSettings, format: PrintFormat) -> Result<()> {
    let report = load(settings)?;

    for name in unresolved_references(&report.variables) {
        warn!(name = %name, "Unresolved reference");
    }

    print!("{}", render(&report.variables, settings, format)?);
    Ok(())
}

fn render(
    variables: &FlatMapping,
    settings: &ExportSettings,
    format: PrintFormat,
) -> Result<String> {
    match format {
        PrintFormat::Env => Ok(render_env_file(variables, settings)),
        PrintFormat::Json => {
            let prefixed: IndexMap<String, &Value> = variables
                .iter()
                .map(|(key, value)| (settings.export_key(key), value))
                .collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&prefixed)?))
        }
    }
}
