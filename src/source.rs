//! Loading raw condition configurations from files or inline JSON.

use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while loading a configuration or an event file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Conditions file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to load conditions from file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {field}: {source}")]
    ParseJson {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Either conditions-file or conditions-json must be provided")]
    MissingInput,

    #[error("Only one of conditions-file or conditions-json should be provided, not both")]
    ConflictingInputs,

    #[error("{field} must be a valid JSON object")]
    NotAnObject { field: String },
}

/// Read and parse a JSON configuration file. Relative paths are resolved
/// against the current working directory.
///
/// # Errors
///
/// Returns [`SourceError`] if the file does not exist, cannot be read, or is
/// not valid JSON.
pub fn load_conditions_from_file(path: impl AsRef<Path>) -> Result<Value, SourceError> {
    let path = absolute(path.as_ref());
    if !path.exists() {
        return Err(SourceError::FileNotFound { path });
    }
    read_json_file(&path)
}

/// Parse a JSON string supplied through the input called `field`.
///
/// # Errors
///
/// Returns [`SourceError::ParseJson`] naming `field` if the text is not JSON.
pub fn parse_json_string(input: &str, field: &str) -> Result<Value, SourceError> {
    serde_json::from_str(input).map_err(|source| SourceError::ParseJson {
        field: field.to_owned(),
        source,
    })
}

pub(crate) fn read_json_file(path: &Path) -> Result<Value, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::ReadFile {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SourceError::ParseFile {
        path: path.to_owned(),
        source,
    })
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_owned();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_owned())
}

/// Where the condition configuration comes from: exactly one of a file path or
/// an inline JSON string. Empty strings count as not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionsInput {
    pub file: Option<String>,
    pub json: Option<String>,
}

impl ConditionsInput {
    #[must_use]
    pub fn new(file: Option<String>, json: Option<String>) -> Self {
        Self {
            file: file.filter(|s| !s.is_empty()),
            json: json.filter(|s| !s.is_empty()),
        }
    }

    #[must_use]
    pub fn from_file(path: impl Into<String>) -> Self {
        Self::new(Some(path.into()), None)
    }

    #[must_use]
    pub fn from_json(json: impl Into<String>) -> Self {
        Self::new(None, Some(json.into()))
    }

    /// Load the raw configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if neither or both inputs are set, if loading
    /// fails, or if inline JSON is not an object.
    pub fn load(&self) -> Result<Value, SourceError> {
        match (self.file.as_deref(), self.json.as_deref()) {
            (None, None) => Err(SourceError::MissingInput),
            (Some(_), Some(_)) => Err(SourceError::ConflictingInputs),
            (Some(file), None) => {
                info!("Loading conditions from file: {file}");
                load_conditions_from_file(file)
            }
            (None, Some(json)) => {
                info!("Loading conditions from JSON input");
                let parsed = parse_json_string(json, "conditions-json")?;
                if !parsed.is_object() {
                    return Err(SourceError::NotAnObject {
                        field: "conditions-json".to_owned(),
                    });
                }
                Ok(parsed)
            }
        }
    }
}
