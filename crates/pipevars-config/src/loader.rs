//! Variable file loading.
//!
//! The format is picked from the file extension:
//! - `.yaml`, `.yml` -> YAML
//! - `.json` -> JSON
//! - `.env` -> dotenv (`KEY=VALUE` lines)
//!
//! Missing files and unknown extensions are not errors. They are reported as
//! a [`SkipReason`] and contribute no variables. Malformed content is an error.

use crate::{ConfigError, ConfigResult};
use indexmap::IndexMap;
use pipevars_core::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Dotenv,
}

impl Format {
    /// Detect the format from an extension (without the dot), ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "env" => Some(Format::Dotenv),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Yaml => "YAML",
            Format::Json => "JSON",
            Format::Dotenv => "dotenv",
        }
    }

    /// Parse file content in this format. `path` is only used for errors.
    pub fn parse(&self, path: &Path, content: &str) -> ConfigResult<RawDocument> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format: self.name(),
            message,
        };

        match self {
            Format::Yaml => parse_yaml(content)
                .map(RawDocument::Tree)
                .map_err(|e| parse_error(e.to_string())),
            Format::Json => parse_json(content)
                .map(RawDocument::Tree)
                .map_err(|e| parse_error(e.to_string())),
            Format::Dotenv => Ok(RawDocument::Flat(parse_dotenv(content))),
        }
    }
}

/// Parsed content of one file, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDocument {
    /// YAML or JSON document.
    Tree(Value),
    /// dotenv pairs. Never nested.
    Flat(IndexMap<String, String>),
}

impl RawDocument {
    pub fn empty() -> Self {
        RawDocument::Tree(Value::empty_mapping())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawDocument::Tree(Value::Mapping(map)) => map.is_empty(),
            RawDocument::Tree(value) => value.is_null(),
            RawDocument::Flat(map) => map.is_empty(),
        }
    }
}

/// Why a file contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound(PathBuf),
    Unsupported { path: PathBuf, extension: String },
}

impl SkipReason {
    pub fn path(&self) -> &Path {
        match self {
            SkipReason::NotFound(path) | SkipReason::Unsupported { path, .. } => path,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound(path) => {
                write!(f, "File {} not found, skip.", path.display())
            }
            SkipReason::Unsupported { path, extension } if extension.is_empty() => {
                write!(f, "Unsupported file type for {}, skip.", path.display())
            }
            SkipReason::Unsupported { extension, .. } => {
                write!(f, "Unsupported file type .{extension}, skip.")
            }
        }
    }
}

/// Outcome of [`try_load`].
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Document(RawDocument),
    Skipped(SkipReason),
}

/// Load a file, reporting missing files and unknown formats as skips.
pub fn try_load(path: &Path) -> ConfigResult<Loaded> {
    if !path.exists() {
        return Ok(Loaded::Skipped(SkipReason::NotFound(path.to_path_buf())));
    }

    let Some(format) = Format::from_path(path) else {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(Loaded::Skipped(SkipReason::Unsupported {
            path: path.to_path_buf(),
            extension,
        }));
    };

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), format = format.name(), "Loading variable file");
    format.parse(path, &content).map(Loaded::Document)
}

/// Load a file. Skipped files are logged and yield an empty document.
pub fn load_file(path: &Path) -> ConfigResult<RawDocument> {
    match try_load(path)? {
        Loaded::Document(doc) => Ok(doc),
        Loaded::Skipped(reason) => {
            warn!(path = %path.display(), "{}", reason);
            Ok(RawDocument::empty())
        }
    }
}

/// Parse a YAML document. An empty or null document is an empty mapping.
///
/// Merge keys (`<<: *anchor`) are applied before conversion.
pub fn parse_yaml(content: &str) -> Result<Value, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Value::empty_mapping());
    }
    let mut value: serde_yaml::Value = serde_yaml::from_str(content)?;
    value.apply_merge()?;
    Ok(match Value::from(value) {
        Value::Null => Value::empty_mapping(),
        value => value,
    })
}

pub fn parse_json(content: &str) -> Result<Value, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(Value::from(value))
}

/// Parse `KEY=VALUE` lines.
///
/// Lines are trimmed. Blank lines, `#` comments and lines without `=` are
/// ignored. Keys and values are trimmed; the value is everything after the
/// first `=`.
pub fn parse_dotenv(content: &str) -> IndexMap<String, String> {
    let mut vars = IndexMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("a.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("prod.env")), Some(Format::Dotenv));
        assert_eq!(Format::from_path(Path::new("a.toml")), None);
        assert_eq!(Format::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "vars.yml", "app:\n  name: demo\n  port: 8080\n");

        let doc = load_file(&path).unwrap();
        let RawDocument::Tree(value) = doc else {
            panic!("expected tree document");
        };
        let app = value.as_mapping().unwrap()["app"].as_mapping().unwrap();
        assert_eq!(app["name"], Value::from("demo"));
        assert_eq!(app["port"], Value::from(8080));
    }

    #[test]
    fn test_empty_yaml_is_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            ("empty.yml", ""),
            ("null.yaml", "~\n"),
            ("comment.yml", "# nothing\n"),
        ];
        for (name, content) in cases {
            let path = write(&dir, name, content);
            let doc = load_file(&path).unwrap();
            assert_eq!(doc, RawDocument::empty(), "{name}");
        }
    }

    #[test]
    fn test_yaml_merge_keys_applied() {
        let value = parse_yaml(
            "base: &base\n  host: h\n  port: 1\nprod:\n  <<: *base\n  port: 2\n",
        )
        .unwrap();
        let prod = value.as_mapping().unwrap()["prod"].as_mapping().unwrap();
        assert!(!prod.contains_key("<<"));
        assert_eq!(prod["host"], Value::from("h"));
        assert_eq!(prod["port"], Value::from(2));
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "vars.json", r#"{"db": {"host": "localhost"}, "debug": true}"#);

        let RawDocument::Tree(value) = load_file(&path).unwrap() else {
            panic!("expected tree document");
        };
        let map = value.as_mapping().unwrap();
        assert_eq!(map["debug"], Value::from(true));
        assert_eq!(map["db"].as_mapping().unwrap()["host"], Value::from("localhost"));
    }

    #[test]
    fn test_parse_dotenv() {
        let vars = parse_dotenv(
            "# comment\n\n  NAME = demo  \nURL=postgres://u:p@h/db?x=1\n   # indented comment\nnot a pair\nEMPTY=\n",
        );
        assert_eq!(vars.len(), 3);
        assert_eq!(vars["NAME"], "demo");
        assert_eq!(vars["URL"], "postgres://u:p@h/db?x=1");
        assert_eq!(vars["EMPTY"], "");
    }

    #[test]
    fn test_load_dotenv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, ".env", "A=1\n");
        // `.env` has no extension in Path terms, so it is unsupported
        assert!(matches!(try_load(&path).unwrap(), Loaded::Skipped(_)));

        let path = write(&dir, "local.env", "A=1\nA=2\n");
        let RawDocument::Flat(vars) = load_file(&path).unwrap() else {
            panic!("expected flat document");
        };
        assert_eq!(vars["A"], "2");
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");

        match try_load(&path).unwrap() {
            Loaded::Skipped(reason) => {
                assert_eq!(reason, SkipReason::NotFound(path.clone()));
                assert!(reason.to_string().contains("not found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(load_file(&path).unwrap(), RawDocument::empty());
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "vars.toml", "a = 1\n");

        match try_load(&path).unwrap() {
            Loaded::Skipped(SkipReason::Unsupported { extension, .. }) => {
                assert_eq!(extension, "toml");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(load_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.yml", "a: [1, 2\nb: :\n");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "YAML", .. }));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.json", "{\"a\": }");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "JSON", .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
