use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Coarse error class, used by callers that only care which stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Schema,
    Value,
    Configuration,
}

/// Errors raised by the training pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// File could not be opened, created or read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Delimited file is malformed (ragged rows, bad encoding, ...).
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    /// Expected column is absent or holds unusable values.
    Schema(String),
    /// Invalid argument value (split fraction, folds, empty grid, ...).
    Value(String),
    /// Hyperparameter or training input does not fit the pipeline.
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PipelineError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        PipelineError::Schema(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Self {
        PipelineError::Value(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        PipelineError::Configuration(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Io { .. } | PipelineError::Csv { .. } => ErrorKind::Io,
            PipelineError::Schema(_) => ErrorKind::Schema,
            PipelineError::Value(_) => ErrorKind::Value,
            PipelineError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            PipelineError::Csv { path, source } => {
                write!(f, "Failed to parse {}: {}", path.display(), source)
            }
            PipelineError::Schema(msg) => write!(f, "Schema error: {}", msg),
            PipelineError::Value(msg) => write!(f, "Invalid value: {}", msg),
            PipelineError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}
