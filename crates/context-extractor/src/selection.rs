//! Editor selections.

use lsp_types::{Position, Range};
use serde::{Deserialize, Serialize};

/// A selection as editors report it: where it started (`anchor`) and where
/// the cursor is now (`active`). The two are equal when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// An empty selection: just a cursor.
    pub fn cursor(at: Position) -> Self {
        Self {
            anchor: at,
            active: at,
        }
    }

    /// True when only a cursor is present.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// The selected range with `start` before `end` in reading order.
    pub fn range(&self) -> Range {
        let (a, b) = (self.anchor, self.active);
        if (a.line, a.character) <= (b.line, b.character) {
            Range { start: a, end: b }
        } else {
            Range { start: b, end: a }
        }
    }
}

impl From<Range> for Selection {
    /// A forward selection over `range`, cursor at its end.
    fn from(range: Range) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, character: u32) -> Position {
        Position { line, character }
    }

    #[test]
    fn test_cursor_is_empty() {
        assert!(Selection::cursor(pos(3, 4)).is_empty());
        assert!(!Selection::new(pos(3, 4), pos(3, 5)).is_empty());
    }

    #[test]
    fn test_backward_selection_range_is_ordered() {
        let selection = Selection::new(pos(5, 2), pos(1, 7));
        let range = selection.range();
        assert_eq!(range.start, pos(1, 7));
        assert_eq!(range.end, pos(5, 2));
    }

    #[test]
    fn test_same_line_backward_selection() {
        let selection = Selection::new(pos(2, 9), pos(2, 1));
        assert_eq!(selection.range().start, pos(2, 1));
    }

    #[test]
    fn test_from_range_puts_cursor_at_end() {
        let selection = Selection::from(Range {
            start: pos(0, 0),
            end: pos(1, 3),
        });
        assert_eq!(selection.active, pos(1, 3));
    }
}
