//! Top-level error for the few conditions the pipeline cannot absorb.

use std::path::{Path, PathBuf};

use super::error_code::{self, StratguardErrorCode};
use super::{ConfigError, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot read {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl StratguardErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InputUnreadable { .. } => error_code::INPUT_UNREADABLE,
            Self::OutputWrite { .. } => error_code::OUTPUT_WRITE_FAILED,
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
            Self::Config(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
        }
    }
}

/// Convenience type alias.
pub type StratguardResult<T> = Result<T, PipelineError>;

/// Attach a path to raw I/O errors at the file-system boundary.
pub trait PipelineResultExt<T> {
    fn reading(self, path: &Path) -> StratguardResult<T>;
    fn writing(self, path: &Path) -> StratguardResult<T>;
}

impl<T> PipelineResultExt<T> for std::io::Result<T> {
    fn reading(self, path: &Path) -> StratguardResult<T> {
        self.map_err(|source| PipelineError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })
    }

    fn writing(self, path: &Path) -> StratguardResult<T> {
        self.map_err(|source| PipelineError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
