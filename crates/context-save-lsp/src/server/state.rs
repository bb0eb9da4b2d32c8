//! Document state management.

use std::sync::{Mutex, MutexGuard};

use context_extractor::position_to_char;
use dashmap::DashMap;
use lsp_types::TextDocumentContentChangeEvent;
use ropey::Rope;

pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A document we're tracking (an open file in the editor).
#[derive(Debug, Clone)]
pub struct Document {
    /// The document content. Cloning a rope is cheap (structural sharing),
    /// so a save works on its own snapshot.
    pub content: Rope,

    /// Document version (incremented by editor on each change).
    pub version: i32,
}

impl Document {
    pub fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
        }
    }

    /// Apply one change event. Ranged changes are incremental edits with
    /// UTF-16 columns; a change without a range replaces the whole text.
    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        match change.range {
            Some(range) => {
                let start = position_to_char(&self.content, range.start);
                let end = position_to_char(&self.content, range.end).max(start);

                self.content.remove(start..end);
                self.content.insert(start, &change.text);
            }
            None => {
                self.content = Rope::from_str(&change.text);
            }
        }
    }
}

/// Open documents plus the one the user touched last.
///
/// The most recently opened or edited document stands in for the active
/// editor when a command names no document.
#[derive(Debug, Default)]
pub struct DocumentStore {
    /// Open documents, keyed by their URI.
    documents: DashMap<String, Document>,
    active: Mutex<Option<String>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly opened document and make it active.
    pub fn open(&self, uri: String, text: &str, version: i32) {
        self.documents.insert(uri.clone(), Document::new(text, version));
        *lock(&self.active) = Some(uri);
    }

    /// Apply edits to an open document and make it active. Returns false
    /// (and changes nothing) for a document that was never opened.
    pub fn change(
        &self,
        uri: &str,
        version: i32,
        changes: impl IntoIterator<Item = TextDocumentContentChangeEvent>,
    ) -> bool {
        match self.documents.get_mut(uri) {
            Some(mut doc) => {
                for change in changes {
                    doc.apply_change(change);
                }
                doc.version = version;
                tracing::trace!("Document {} now at version {}", uri, doc.version);
            }
            None => return false,
        }

        *lock(&self.active) = Some(uri.to_string());
        true
    }

    /// Stop tracking a document. Closing the active one leaves no active
    /// document.
    pub fn close(&self, uri: &str) {
        self.documents.remove(uri);

        let mut active = lock(&self.active);
        if active.as_deref() == Some(uri) {
            *active = None;
        }
    }

    pub fn active(&self) -> Option<String> {
        lock(&self.active).clone()
    }

    /// Content of `uri`, or of the active document when `uri` is `None`.
    /// `None` if that document is not open.
    pub fn snapshot(&self, uri: Option<String>) -> Option<(String, Rope)> {
        let uri = uri.or_else(|| self.active())?;
        let content = self.documents.get(&uri)?.content.clone();
        Some((uri, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{Position, Range};

    fn edit(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position { line: start.0, character: start.1 },
                end: Position { line: end.0, character: end.1 },
            }),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_incremental_insert() {
        let mut doc = Document::new("hello\nworld", 1);
        doc.apply_change(edit((1, 0), (1, 0), "big "));
        assert_eq!(doc.content.to_string(), "hello\nbig world");
    }

    #[test]
    fn test_incremental_delete_across_lines() {
        let mut doc = Document::new("one\ntwo\nthree", 1);
        doc.apply_change(edit((0, 3), (2, 0), " "));
        assert_eq!(doc.content.to_string(), "one three");
    }

    #[test]
    fn test_edit_after_surrogate_pair() {
        // the emoji takes two UTF-16 columns
        let mut doc = Document::new("😀ab", 1);
        doc.apply_change(edit((0, 2), (0, 3), "X"));
        assert_eq!(doc.content.to_string(), "😀Xb");
    }

    #[test]
    fn test_next_line_insert_skips_unicode_separators() {
        let mut doc = Document::new("one\u{0085}more\ntwo", 1);
        doc.apply_change(edit((1, 0), (1, 0), "X"));
        assert_eq!(doc.content.to_string(), "one\u{0085}more\nXtwo");
    }

    #[test]
    fn test_full_replacement() {
        let mut doc = Document::new("old", 1);
        doc.apply_change(TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new\ncontent".to_string(),
        });
        assert_eq!(doc.content.to_string(), "new\ncontent");
    }

    #[test]
    fn test_store_last_opened_is_active() {
        let store = DocumentStore::new();
        store.open("file:///a".to_string(), "a", 1);
        store.open("file:///b".to_string(), "b", 1);

        let (uri, content) = store.snapshot(None).unwrap();
        assert_eq!(uri, "file:///b");
        assert_eq!(content.to_string(), "b");
    }

    #[test]
    fn test_store_edit_makes_document_active() {
        let store = DocumentStore::new();
        store.open("file:///a".to_string(), "a", 1);
        store.open("file:///b".to_string(), "b", 1);

        assert!(store.change("file:///a", 2, vec![edit((0, 1), (0, 1), "!")]));

        let (uri, content) = store.snapshot(None).unwrap();
        assert_eq!(uri, "file:///a");
        assert_eq!(content.to_string(), "a!");
    }

    #[test]
    fn test_store_change_to_unknown_document_is_ignored() {
        let store = DocumentStore::new();
        store.open("file:///a".to_string(), "a", 1);

        assert!(!store.change("file:///zzz", 2, vec![edit((0, 0), (0, 0), "x")]));
        assert_eq!(store.active().as_deref(), Some("file:///a"));
    }

    #[test]
    fn test_store_closing_active_clears_it() {
        let store = DocumentStore::new();
        store.open("file:///a".to_string(), "a", 1);
        store.close("file:///a");

        assert!(store.active().is_none());
        assert!(store.snapshot(None).is_none());
    }

    #[test]
    fn test_store_closing_other_document_keeps_active() {
        let store = DocumentStore::new();
        store.open("file:///a".to_string(), "a", 1);
        store.open("file:///b".to_string(), "b", 1);
        store.close("file:///a");

        assert_eq!(store.active().as_deref(), Some("file:///b"));
    }

    #[test]
    fn test_store_named_document_must_be_open() {
        let store = DocumentStore::new();
        store.open("file:///a".to_string(), "a", 1);

        assert!(store.snapshot(Some("file:///missing".to_string())).is_none());
        assert!(store.snapshot(Some("file:///a".to_string())).is_some());
    }
}
