//! Error types surfaced by the generator.
//!
//! Per-entity anomalies (dangling references, missing fields) are absorbed
//! where they occur and never show up here. Only failures that make the whole
//! run meaningless are reported: unreadable input, bad configuration, and a
//! malformed command line.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse XML record {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed XML record {path}: {message}")]
    MalformedRecord { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
