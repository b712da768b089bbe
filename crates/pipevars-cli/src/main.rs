//! pipevars CLI tool.

use clap::{Parser, Subcommand, ValueEnum};
use pipevars_core::{DEFAULT_SEPARATOR, ExportSettings, parse_file_list};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pipevars")]
#[command(about = "Load variable files and export them to the CI environment", long_about = None)]
struct Cli {
    /// Comma-separated variable files (YAML, JSON or .env); later files win
    #[arg(long, global = true, env = "INPUT_FILES", default_value = "")]
    files: String,

    /// Prefix added to every exported variable name
    #[arg(long, global = true, env = "INPUT_PREFIX", default_value = "")]
    prefix: String,

    /// Separator used to join nested keys
    #[arg(long, global = true, env = "INPUT_SEPARATOR", default_value = DEFAULT_SEPARATOR)]
    separator: String,

    /// Log filter (e.g. "info", "pipevars_config=debug")
    #[arg(long, global = true, env = "PIPEVARS_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append resolved variables to the CI environment file
    Export {
        /// Environment file to append to
        #[arg(long, env = "GITHUB_ENV")]
        output: Option<PathBuf>,
    },
    /// Print resolved variables to stdout
    Print {
        /// Output format
        #[arg(long, value_enum, default_value_t = PrintFormat::Env)]
        format: PrintFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrintFormat {
    /// Environment-file lines
    Env,
    /// Pretty JSON object
    Json,
}

impl Cli {
    fn settings(&self) -> ExportSettings {
        let settings = ExportSettings::new(parse_file_list(&self.files))
            .with_prefix(self.prefix.as_str())
            .with_separator(self.separator.as_str());

        match &self.command {
            Commands::Export {
                output: Some(output),
            } => settings.with_output(output),
            _ => settings,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the data, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = cli.settings();

    match cli.command {
        Commands::Export { .. } => {
            commands::export::run(&settings)?;
        }
        Commands::Print { format } => {
            commands::print::run(&settings, format)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from([
            "pipevars",
            "export",
            "--files",
            "a.yml, b.env",
            "--prefix",
            "APP_",
            "--output",
            "/tmp/github_env",
        ])
        .unwrap();

        let settings = cli.settings();
        assert_eq!(
            settings.files,
            vec![PathBuf::from("a.yml"), PathBuf::from("b.env")]
        );
        assert_eq!(settings.prefix.as_deref(), Some("APP_"));
        assert_eq!(settings.separator, "__");
        assert_eq!(settings.output, Some(PathBuf::from("/tmp/github_env")));
    }

    #[test]
    fn test_parse_print_json() {
        let cli = Cli::try_parse_from([
            "pipevars",
            "--files",
            "vars.json",
            "--separator",
            ".",
            "print",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Print {
                format: PrintFormat::Json
            }
        ));
        let settings = cli.settings();
        assert_eq!(settings.separator, ".");
        assert!(settings.output.is_none());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["pipevars"]).is_err());
    }
}
