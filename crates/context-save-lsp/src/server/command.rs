//! The `cursorContextSave.save` command and its argument.

use context_extractor::Selection;
use lsp_types::{Position, Range, TextDocumentIdentifier};
use ropey::Rope;
use serde::Deserialize;
use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};

use super::state::DocumentStore;

/// Command id the editor binds to a key or palette entry.
pub const SAVE_COMMAND: &str = "cursorContextSave.save";

/// First argument of `cursorContextSave.save`.
///
/// ```json
/// {
///   "textDocument": { "uri": "file:///work/src/main.rs" },
///   "selection": {
///     "anchor": { "line": 10, "character": 0 },
///     "active": { "line": 10, "character": 0 }
///   }
/// }
/// ```
///
/// Clients without a notion of selection direction may send `range`, and
/// clients that only know the cursor may send `position`. Without
/// `textDocument` the most recently edited document is used.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveContextArgs {
    pub text_document: Option<TextDocumentIdentifier>,
    pub selection: Option<Selection>,
    pub range: Option<Range>,
    pub position: Option<Position>,
}

impl SaveContextArgs {
    /// Parse the command's argument list. No arguments means all defaults.
    pub fn from_arguments(arguments: &[Value]) -> std::result::Result<Self, serde_json::Error> {
        match arguments.first() {
            Some(value) => serde_json::from_value(value.clone()),
            None => Ok(Self::default()),
        }
    }

    /// The editor selection, preferring `selection`, then `range`, then a
    /// bare cursor at `position`.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
            .or_else(|| self.range.map(Selection::from))
            .or_else(|| self.position.map(Selection::cursor))
    }

    /// Uri of the target document, if given.
    pub fn document_uri(&self) -> Option<String> {
        self.text_document.as_ref().map(|doc| doc.uri.to_string())
    }
}

/// What a `cursorContextSave.save` request resolves to before anything is
/// written.
#[derive(Debug)]
pub enum SaveRequest {
    /// A document snapshot and the selection to save from it.
    Ready {
        uri: String,
        content: Rope,
        selection: Selection,
    },
    /// The named document, or the active one, is not open.
    NoActiveDocument,
}

/// Reject commands other than [`SAVE_COMMAND`].
pub fn ensure_known_command(command: &str) -> Result<()> {
    if command == SAVE_COMMAND {
        Ok(())
    } else {
        Err(Error::invalid_params(format!("Unknown command: {}", command)))
    }
}

/// Resolve the command arguments against the open documents.
///
/// A missing document is a user-facing condition and comes back as
/// [`SaveRequest::NoActiveDocument`]. Malformed arguments and arguments
/// without any cursor information are protocol errors.
pub fn prepare_save(store: &DocumentStore, arguments: &[Value]) -> Result<SaveRequest> {
    let args = SaveContextArgs::from_arguments(arguments).map_err(|e| {
        Error::invalid_params(format!("Invalid {} argument: {}", SAVE_COMMAND, e))
    })?;

    let (uri, content) = match store.snapshot(args.document_uri()) {
        Some(target) => target,
        None => return Ok(SaveRequest::NoActiveDocument),
    };

    let selection = args.selection().ok_or_else(|| {
        Error::invalid_params(format!(
            "{} needs a selection, range or position",
            SAVE_COMMAND
        ))
    })?;

    Ok(SaveRequest::Ready {
        uri,
        content,
        selection,
    })
}
