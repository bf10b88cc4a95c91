//! Startup errors.
//!
//! Everything in [`GameError`] is fatal: it aborts startup and `main` exits
//! non-zero. Once the frame loop is running nothing produces a `GameError`;
//! lookups that miss are skipped in place.

use std::fmt;
use std::path::PathBuf;

/// Errors that can abort startup.
#[derive(Debug)]
pub enum GameError {
    /// A data file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A data file is not valid JSON or doesn't match the expected shape.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// An entity definition has a known component with missing or invalid
    /// fields.
    Component {
        entity: String,
        kind: String,
        source: serde_json::Error,
    },
    /// The platform event loop could not be created or failed while running.
    EventLoop(String),
    /// The window could not be created.
    Window(String),
    /// GPU adapter, device, or surface setup failed.
    Graphics(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            GameError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            GameError::Component { entity, kind, source } => {
                write!(f, "entity \"{}\": invalid {} component: {}", entity, kind, source)
            }
            GameError::EventLoop(msg) => write!(f, "event loop error: {}", msg),
            GameError::Window(msg) => write!(f, "window creation failed: {}", msg),
            GameError::Graphics(msg) => write!(f, "graphics initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            GameError::Parse { source, .. } => Some(source),
            GameError::Component { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Read and deserialize a JSON file, tagging failures with the path.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| GameError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
