//! Error types shared by the extractor and the runner.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlossError {
    /// Reading the input or writing an output/report file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document is not well-formed XML.
    #[error("XML error in {} at {line}:{column}: {message}", path.display())]
    Xml {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// The expanded query uses syntax outside the supported subset.
    #[error("query error: {0}")]
    Query(String),

    /// Report serialization failed.
    #[error("report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl GlossError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GlossError::Io {
            path: path.into(),
            source,
        }
    }

    /// Source position of the failure when the error carries one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            GlossError::Xml { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }

    /// File the failure relates to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            GlossError::Io { path, .. } | GlossError::Xml { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GlossError>;
