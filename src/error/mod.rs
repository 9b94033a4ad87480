//! # Error Module
//!
//! Error types for the media organizer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - every error names the file or directory involved
//! - **Separate policy from failure** - a GPS abort is a decision, not a crash

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Invalid arguments: {0}")]
    Argument(#[from] ArgumentError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Aborting: {missing} file(s) missing gps data")]
    GpsPolicyAbort { missing: usize },

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),
}

/// Errors in the paths handed to the organizer
#[derive(Error, Debug)]
pub enum ArgumentError {
    #[error("{path} is not a directory")]
    SourceNotDirectory { path: PathBuf },

    #[error("{path} is not a directory. Aborting")]
    DestinationNotDirectory { path: PathBuf },

    #[error("{path} does not exist. Aborting")]
    DestinationDeclined { path: PathBuf },

    #[error("Failed to create {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while walking the source tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by metadata providers
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse metadata of {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{tool} is not installed or not found in PATH")]
    ToolUnavailable { tool: String },

    #[error("{tool} failed on {path}: {reason}")]
    ToolFailed {
        tool: String,
        path: PathBuf,
        reason: String,
    },
}

// io::Error is not Clone; the copy keeps its kind and message
impl Clone for MetadataError {
    fn clone(&self) -> Self {
        match self {
            MetadataError::Read { path, source } => MetadataError::Read {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            MetadataError::Parse { path, reason } => MetadataError::Parse {
                path: path.clone(),
                reason: reason.clone(),
            },
            MetadataError::ToolUnavailable { tool } => MetadataError::ToolUnavailable { tool: tool.clone() },
            MetadataError::ToolFailed { tool, path, reason } => MetadataError::ToolFailed {
                tool: tool.clone(),
                path: path.clone(),
                reason: reason.clone(),
            },
        }
    }
}

/// Errors that occur while writing the destination tree
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} -> {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to preserve attributes of {from} on {to}: {source}")]
    PreserveAttributes {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CopyError {
    /// The source file the failed operation was working on, if any
    pub fn source_path(&self) -> Option<&PathBuf> {
        match self {
            CopyError::CreateDirectory { .. } => None,
            CopyError::Copy { from, .. } | CopyError::PreserveAttributes { from, .. } => Some(from),
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloned_read_error_keeps_kind_and_message() {
        let error = MetadataError::Read {
            path: PathBuf::from("/src/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let copy = error.clone();
        assert_eq!(copy.to_string(), error.to_string());
        assert!(matches!(
            copy,
            MetadataError::Read { ref source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied
        ));
    }

    #[test]
    fn argument_error_names_path() {
        let error = ArgumentError::SourceNotDirectory {
            path: PathBuf::from("/photos/inbox"),
        };
        assert_eq!(error.to_string(), "/photos/inbox is not a directory");
    }

    #[test]
    fn copy_error_includes_both_paths() {
        let error = CopyError::Copy {
            from: PathBuf::from("/src/a.jpg"),
            to: PathBuf::from("/dst/2020/2020-01-01 10-00-00.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/src/a.jpg"));
        assert!(message.contains("2020-01-01 10-00-00.jpg"));
        assert_eq!(error.source_path(), Some(&PathBuf::from("/src/a.jpg")));
    }

    #[test]
    fn gps_abort_reports_count() {
        let error = OrganizerError::GpsPolicyAbort { missing: 3 };
        assert!(error.to_string().contains("3 file(s)"));
    }

    #[test]
    fn tool_unavailable_names_tool() {
        let error = MetadataError::ToolUnavailable {
            tool: "exiftool".to_string(),
        };
        assert!(error.to_string().starts_with("exiftool"));
    }
}
