// This file is part of cursor-context-save.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0

//! Deciding which text to save.
//!
//! # How it works
//!
//! 1. If the selection is non-empty, the selected text is the answer
//! 2. Otherwise take the cursor line and widen it by `radius` lines each way
//! 3. Clamp the window to the document and extend its last line to end-of-line
//! 4. Return the text inside that window
//!
//! This is a pure function of its inputs; nothing here touches the filesystem.

use lsp_types::{Position, Range};
use serde::Serialize;

use crate::document::TextSource;
use crate::selection::Selection;

/// Lines around the cursor to save when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    /// First line, inclusive.
    pub start_line: u32,
    /// Last line, inclusive.
    pub end_line: u32,
}

impl ContextWindow {
    /// The window of `radius` lines around `cursor_line`.
    ///
    /// Returns `None` for a document with no lines. A cursor past the last
    /// line is treated as sitting on the last line.
    pub fn around(cursor_line: u32, radius: u32, line_count: u32) -> Option<Self> {
        let last_line = line_count.checked_sub(1)?;
        let line = cursor_line.min(last_line);

        Some(Self {
            start_line: line.saturating_sub(radius),
            end_line: line.saturating_add(radius).min(last_line),
        })
    }

    /// Number of lines in the window.
    pub fn line_span(&self) -> u32 {
        self.end_line - self.start_line + 1
    }

    /// The window as a range: column 0 of the first line to the end of the
    /// last line (its terminator excluded).
    pub fn to_range<D: TextSource + ?Sized>(&self, document: &D) -> Range {
        Range {
            start: Position {
                line: self.start_line,
                character: 0,
            },
            end: Position {
                line: self.end_line,
                character: document.line_len(self.end_line),
            },
        }
    }
}

/// Where captured text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureSource {
    /// The user's selection.
    Selection,
    /// Lines around the cursor.
    Context,
}

/// Text picked for saving, with the range it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub text: String,
    /// `None` only when the document has no lines.
    pub range: Option<Range>,
    pub source: CaptureSource,
}

/// Pick the text to save: the selection if there is one, otherwise `radius`
/// lines above and below the cursor line.
pub fn capture<D: TextSource + ?Sized>(document: &D, selection: &Selection, radius: u32) -> Capture {
    if !selection.is_empty() {
        let range = selection.range();
        return Capture {
            text: document.text_in(range),
            range: Some(range),
            source: CaptureSource::Selection,
        };
    }

    let window = ContextWindow::around(selection.active.line, radius, document.line_count());
    match window {
        Some(window) => {
            let range = window.to_range(document);
            tracing::debug!(
                "Context window lines {}..={} ({} lines)",
                window.start_line,
                window.end_line,
                window.line_span()
            );
            Capture {
                text: document.text_in(range),
                range: Some(range),
                source: CaptureSource::Context,
            }
        }
        None => {
            tracing::debug!("Document has no lines, nothing to capture");
            Capture {
                text: String::new(),
                range: None,
                source: CaptureSource::Context,
            }
        }
    }
}

/// Text to save for `selection` in `document`. See [`capture`].
pub fn extract<D: TextSource + ?Sized>(document: &D, selection: &Selection, radius: u32) -> String {
    capture(document, selection, radius).text
}
