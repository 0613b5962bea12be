//! Error types for bootmeasure_core.

use thiserror::Error;

/// Result type alias using bootmeasure_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while measuring a boot entry.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file or directory access.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// File or directory does not exist on the volume.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Path cannot be mapped onto a volume.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// No volume answers to the given name.
    #[error("Volume not found: {name}")]
    VolumeNotFound { name: String },

    /// Configuration value is missing or malformed.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Unsupported algorithm.
    #[error("Unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    /// Invalid digest format or encoding.
    #[error("Invalid digest: {reason}")]
    InvalidDigest { reason: String },

    /// Directory lies deeper than the traversal cap.
    #[error("Directory {path} exceeds maximum depth {limit}")]
    DepthExceeded { path: String, limit: usize },

    /// Joined path is longer than the path cap.
    #[error("Path {path} exceeds maximum length {limit}")]
    PathTooLong { path: String, limit: usize },

    /// Symbolic link met during traversal; links are never followed.
    #[error("Symbolic link not followed: {path}")]
    SymlinkSkipped { path: String },
}

impl Error {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a VolumeNotFound error.
    pub fn volume_not_found(name: impl Into<String>) -> Self {
        Error::VolumeNotFound { name: name.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedAlgorithm error.
    pub fn unsupported_algorithm(algorithm: impl Into<String>) -> Self {
        Error::UnsupportedAlgorithm {
            algorithm: algorithm.into(),
        }
    }

    /// Create an InvalidDigest error.
    pub fn invalid_digest(reason: impl Into<String>) -> Self {
        Error::InvalidDigest {
            reason: reason.into(),
        }
    }

    /// Create a DepthExceeded error.
    pub fn depth_exceeded(path: impl Into<String>, limit: usize) -> Self {
        Error::DepthExceeded {
            path: path.into(),
            limit,
        }
    }

    /// Create a PathTooLong error.
    pub fn path_too_long(path: impl Into<String>, limit: usize) -> Self {
        Error::PathTooLong {
            path: path.into(),
            limit,
        }
    }

    /// Create a SymlinkSkipped error.
    pub fn symlink_skipped(path: impl Into<String>) -> Self {
        Error::SymlinkSkipped { path: path.into() }
    }

    /// Whether the error means "absent" rather than "broken".
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } | Error::VolumeNotFound { .. } => true,
            Error::Io { source } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(Error::not_found("\\a").is_not_found());
        assert!(Error::volume_not_found("ESP").is_not_found());
        assert!(
            Error::from(std::io::Error::from(std::io::ErrorKind::NotFound)).is_not_found()
        );
        assert!(
            !Error::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                .is_not_found()
        );
        assert!(!Error::depth_exceeded("\\a", 3).is_not_found());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::path_too_long("\\x", 10).to_string(),
            "Path \\x exceeds maximum length 10"
        );
        assert_eq!(
            Error::volume_not_found("ESP").to_string(),
            "Volume not found: ESP"
        );
    }
}
