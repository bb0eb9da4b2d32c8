//! User-facing messages for save outcomes.

use context_extractor::{SaveError, SavedSnapshot};
use lsp_types::MessageType;
use serde_json::{json, Value};

/// The `window/showMessage` a save outcome turns into.
pub fn save_message(outcome: &Result<SavedSnapshot, SaveError>) -> (MessageType, String) {
    match outcome {
        Ok(saved) => (
            MessageType::INFO,
            format!("Cursor context saved to {}", saved.path.display()),
        ),
        Err(SaveError::NoActiveDocument) => (MessageType::ERROR, SaveError::NoActiveDocument.to_string()),
        Err(e) => (MessageType::ERROR, format!("Failed to save cursor context: {}", e)),
    }
}

/// The `workspace/executeCommand` result for a successful save.
pub fn save_result(saved: &SavedSnapshot) -> Value {
    json!({
        "path": saved.path.display().to_string(),
        "bytes": saved.bytes,
        "source": saved.source,
        "range": saved.range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_extractor::CaptureSource;
    use std::path::PathBuf;

    fn snapshot() -> SavedSnapshot {
        SavedSnapshot {
            path: PathBuf::from("/work/ctx.txt"),
            bytes: 5,
            source: CaptureSource::Context,
            range: None,
        }
    }

    #[test]
    fn test_success_message_names_path() {
        let (kind, message) = save_message(&Ok(snapshot()));
        assert_eq!(kind, MessageType::INFO);
        assert_eq!(message, "Cursor context saved to /work/ctx.txt");
    }

    #[test]
    fn test_write_failure_message_carries_reason() {
        let outcome = Err(SaveError::Write {
            path: PathBuf::from("/readonly/ctx.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        });
        let (kind, message) = save_message(&outcome);
        assert_eq!(kind, MessageType::ERROR);
        assert!(message.starts_with("Failed to save cursor context:"));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn test_no_active_document_message() {
        let (kind, message) = save_message(&Err(SaveError::NoActiveDocument));
        assert_eq!(kind, MessageType::ERROR);
        assert_eq!(message, "No active editor");
    }

    #[test]
    fn test_save_result_shape() {
        let value = save_result(&snapshot());
        assert_eq!(value["path"], "/work/ctx.txt");
        assert_eq!(value["bytes"], 5);
        assert_eq!(value["source"], "context");
        assert!(value["range"].is_null());
    }
}
