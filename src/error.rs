use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtoError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed label '{}' at line {line}: {message}", path.display())]
    Label {
        path: PathBuf,
        line: usize,
        message: String,
    },
    /// A grapheme asked for more phoneme segments than the label still holds.
    #[error(
        "alignment mismatch at grapheme '{grapheme}': {requested} phoneme(s) requested, {remaining} remaining"
    )]
    AlignmentMismatch {
        grapheme: String,
        requested: usize,
        remaining: usize,
    },
    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl OtoError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn label(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Label {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
