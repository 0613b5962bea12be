//! What a measurement covered and what it could not.

use crate::error::Error;
use serde::Serialize;

/// Category of a traversal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Io,
    DepthExceeded,
    PathTooLong,
    InvalidPath,
    Symlink,
    VolumeResolution,
    Other,
}

impl From<&Error> for FailureKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::VolumeNotFound { .. } => FailureKind::VolumeResolution,
            e if e.is_not_found() => FailureKind::NotFound,
            Error::Io { .. } => FailureKind::Io,
            Error::DepthExceeded { .. } => FailureKind::DepthExceeded,
            Error::PathTooLong { .. } => FailureKind::PathTooLong,
            Error::InvalidPath { .. } => FailureKind::InvalidPath,
            Error::SymlinkSkipped { .. } => FailureKind::Symlink,
            _ => FailureKind::Other,
        }
    }
}

/// A file, directory or volume that did not make it into the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalFailure {
    pub volume: String,
    pub path: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Overall verdict of one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStatus {
    /// Everything selected was absorbed.
    Complete,
    /// At least one traversal failure; the digest covers less than asked.
    Degraded,
}

/// Per-measurement accounting, stored next to the digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeasureReport {
    pub files_hashed: usize,
    pub bytes_hashed: u64,
    pub directories_visited: usize,
    /// Files that vanished between listing and hashing.
    pub missing: Vec<String>,
    pub failures: Vec<TraversalFailure>,
}

impl MeasureReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn status(&self) -> MeasurementStatus {
        if self.is_complete() {
            MeasurementStatus::Complete
        } else {
            MeasurementStatus::Degraded
        }
    }

    pub(crate) fn record(&mut self, volume: &str, path: &str, err: &Error) {
        tracing::warn!(volume, path, error = %err, "measurement incomplete");
        self.failures.push(TraversalFailure {
            volume: volume.to_string(),
            path: path.to_string(),
            kind: FailureKind::from(err),
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let io = Error::from(std::io::Error::other("boom"));
        let gone = Error::from(std::io::Error::from(std::io::ErrorKind::NotFound));

        assert_eq!(FailureKind::from(&io), FailureKind::Io);
        assert_eq!(FailureKind::from(&gone), FailureKind::NotFound);
        assert_eq!(
            FailureKind::from(&Error::volume_not_found("ESP")),
            FailureKind::VolumeResolution
        );
        assert_eq!(
            FailureKind::from(&Error::depth_exceeded("\\a", 1)),
            FailureKind::DepthExceeded
        );
        assert_eq!(
            FailureKind::from(&Error::symlink_skipped("\\EFI\\link")),
            FailureKind::Symlink
        );
        assert_eq!(
            FailureKind::from(&Error::invalid_config("x")),
            FailureKind::Other
        );
    }

    #[test]
    fn test_status_follows_failures() {
        let mut report = MeasureReport::default();
        report.missing.push("\\gone".to_string());
        assert_eq!(report.status(), MeasurementStatus::Complete);

        report.record("ESP", "\\EFI", &Error::not_found("\\EFI"));
        assert!(!report.is_complete());
        assert_eq!(report.status(), MeasurementStatus::Degraded);
        assert_eq!(report.failures[0].kind, FailureKind::NotFound);
        assert_eq!(report.failures[0].volume, "ESP");
    }

    #[test]
    fn test_report_serializes() {
        let mut report = MeasureReport::default();
        report.record("v", "\\p", &Error::path_too_long("\\p", 4));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["kind"], "path_too_long");
        assert_eq!(json["files_hashed"], 0);
    }
}
