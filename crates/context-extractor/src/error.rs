//! Error types for context capture and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a save before or while writing the snapshot.
#[derive(Error, Debug)]
pub enum SaveError {
    /// No document is being edited.
    #[error("No active editor")]
    NoActiveDocument,

    /// The configured `filePath` is empty.
    #[error("No target file configured (cursorContextSave.filePath is empty)")]
    EmptyTargetPath,

    /// The snapshot could not be written.
    #[error("Could not write {}: {source}", path.display())]
    Write {
        /// Resolved target path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading settings sent by the editor.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings object does not match the expected shape.
    #[error("Invalid cursorContextSave settings: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display() {
        let err = SaveError::Write {
            path: PathBuf::from("/tmp/out.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/out.txt"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_no_active_document_display() {
        assert_eq!(SaveError::NoActiveDocument.to_string(), "No active editor");
    }
}
