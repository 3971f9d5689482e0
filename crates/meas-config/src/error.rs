use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config version exists for the definition at or before the requested
    /// point in time. Fatal to any run that depends on it.
    #[error("no config published for definition '{definition_id}'{}", as_of_suffix(.as_of))]
    NotFound {
        definition_id: String,
        as_of: Option<chrono::DateTime<chrono::Utc>>,
    },

    /// The rule set failed load-time validation. Fatal before any run output.
    #[error("malformed rule set for definition '{definition_id}' ({config_version}): {message}")]
    Malformed {
        definition_id: String,
        config_version: String,
        message: String,
    },

    #[error("failed to read config table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config table {path}: {message}")]
    Table { path: PathBuf, message: String },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn table(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Table {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn as_of_suffix(as_of: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    match as_of {
        Some(ts) => format!(" at or before {}", ts.to_rfc3339()),
        None => String::new(),
    }
}
