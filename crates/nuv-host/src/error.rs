//! Error types for host capabilities.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while executing a host capability.
#[derive(Error, Debug)]
pub enum HostError {
    /// Wrong number or kind of arguments at the script boundary.
    #[error("{0}")]
    Argument(String),

    /// Path does not exist.
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// Path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The host refused access to the path or capability.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other IO failure.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded as YAML.
    #[error("cannot encode document: {0}")]
    Encoding(String),

    /// Text is not a well-formed YAML mapping.
    #[error("cannot decode document: {message}")]
    Decode {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// A script-supplied transform failed during a scan.
    #[error("transform failed: {0}")]
    Callback(String),
}

/// Script-visible classification of a [`HostError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    NotFound,
    NotADirectory,
    PermissionDenied,
    Io,
    Encoding,
    Decode,
    Callback,
}

impl ErrorKind {
    /// Name used as the prefix of the message thrown into scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::NotADirectory => "NotADirectory",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::Io => "IOError",
            ErrorKind::Encoding => "EncodingError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Callback => "CallbackError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HostError {
    /// Classify an IO error raised while touching `path`.
    pub fn from_io(source: std::io::Error, path: impl Into<String>) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => HostError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => HostError::PermissionDenied(path),
            _ => HostError::Io { path, source },
        }
    }

    /// Get the script-visible kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HostError::Argument(_) => ErrorKind::Argument,
            HostError::NotFound(_) => ErrorKind::NotFound,
            HostError::NotADirectory(_) => ErrorKind::NotADirectory,
            HostError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            HostError::Io { .. } => ErrorKind::Io,
            HostError::Encoding(_) => ErrorKind::Encoding,
            HostError::Decode { .. } => ErrorKind::Decode,
            HostError::Callback(_) => ErrorKind::Callback,
        }
    }
}

impl From<serde_yaml::Error> for HostError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        HostError::Decode {
            message: err.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }
}

/// Result type for host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;
