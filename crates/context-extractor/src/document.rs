//! Read-only access to line-indexed document text.
//!
//! The extractor never talks to an editor directly. It only needs three things
//! from a document: how many lines it has, the text of a line, and the text
//! inside a range. `TextSource` captures exactly that, so the server can back
//! it with a `Rope` and tests can back it with a plain list of lines.
//!
//! Columns are LSP columns: UTF-16 code units, clamped to the line's length
//! (terminator excluded).

use lsp_types::{Position, Range};
use ropey::Rope;

/// A read-only, line-indexed text source.
pub trait TextSource {
    /// Number of lines. An empty document still has one (empty) line in most
    /// editors, but implementations may report zero.
    fn line_count(&self) -> u32;

    /// Text of `line` without its line terminator, or `None` past the end.
    fn line_text(&self, line: u32) -> Option<String>;

    /// Text between two positions. Positions are clamped to the document.
    fn text_in(&self, range: Range) -> String;

    /// Length of `line` in UTF-16 code units, terminator excluded.
    fn line_len(&self, line: u32) -> u32 {
        self.line_text(line)
            .map(|text| text.encode_utf16().count() as u32)
            .unwrap_or(0)
    }
}

impl TextSource for Rope {
    fn line_count(&self) -> u32 {
        self.len_lines() as u32
    }

    fn line_text(&self, line: u32) -> Option<String> {
        let slice = self.get_line(line as usize)?;
        let content = content_len_chars(self, line as usize);
        Some(slice.slice(..content).to_string())
    }

    fn text_in(&self, range: Range) -> String {
        let start = position_to_char(self, range.start);
        let end = position_to_char(self, range.end);
        if end <= start {
            return String::new();
        }
        self.slice(start..end).to_string()
    }

    fn line_len(&self, line: u32) -> u32 {
        let line = line as usize;
        if line >= self.len_lines() {
            return 0;
        }
        let start = self.line_to_char(line);
        let end = start + content_len_chars(self, line);
        (self.char_to_utf16_cu(end) - self.char_to_utf16_cu(start)) as u32
    }
}

/// Convert an LSP position into a char index into `rope`.
///
/// Lines past the end clamp to the last line; columns past the end of the
/// line clamp to the end of its content.
pub fn position_to_char(rope: &Rope, position: Position) -> usize {
    let last_line = rope.len_lines().saturating_sub(1);
    let line = (position.line as usize).min(last_line);

    let line_start = rope.line_to_char(line);
    let line_end = line_start + content_len_chars(rope, line);

    let start_cu = rope.char_to_utf16_cu(line_start);
    let target_cu = (start_cu + position.character as usize).min(rope.len_utf16_cu());

    rope.utf16_cu_to_char(target_cu).min(line_end)
}

/// Characters on `line` before its terminator.
fn content_len_chars(rope: &Rope, line: usize) -> usize {
    let slice = rope.line(line);
    let len = slice.len_chars();

    if len >= 2 && slice.char(len - 2) == '\r' && slice.char(len - 1) == '\n' {
        len - 2
    } else if len >= 1 && is_line_break(slice.char(len - 1)) {
        len - 1
    } else {
        len
    }
}

/// Line breaks as LSP counts them. Ropey is built with only `cr_lines` so it
/// agrees; VT, FF, NEL, LS and PS are ordinary characters.
fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r')
}
