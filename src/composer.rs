//! Message buffer being composed by the user.

use crate::prompt::Insertion;

#[derive(Debug, Default, Clone)]
pub struct Composer {
    content: String,
    /// Char offset into `content`
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_at(&self, cursor: usize) -> usize {
        self.content
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_at(self.cursor - 1);
        self.content.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_at(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    /// Start of the current line
    pub fn move_home(&mut self) {
        let (_, col) = self.cursor_row_col();
        self.cursor -= col;
    }

    /// End of the current line
    pub fn move_end(&mut self) {
        let rest = self.content.chars().skip(self.cursor).take_while(|&c| c != '\n').count();
        self.cursor += rest;
    }

    /// Replace the buffer wholesale with `transform(current)`. The cursor is
    /// clamped to the new length.
    pub fn update(&mut self, transform: impl FnOnce(&str) -> String) {
        self.content = transform(&self.content);
        self.cursor = self.cursor.min(self.len());
    }

    /// Apply a picker insertion and park the cursor after the template
    pub fn apply_insertion(&mut self, insertion: &Insertion) {
        let end = insertion.end_cursor(&self.content);
        self.update(|prev| insertion.apply(prev));
        self.cursor = end.min(self.len());
    }

    /// Take the buffer for sending, leaving the composer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Zero-based (row, column) of the cursor, in chars
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.content.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> Composer {
        let mut c = Composer::new();
        for ch in s.chars() {
            if ch == '\n' {
                c.insert_newline();
            } else {
                c.insert_char(ch);
            }
        }
        c
    }

    #[test]
    fn test_editing() {
        let mut c = typed("héllo");
        assert_eq!(c.cursor(), 5);
        c.backspace();
        assert_eq!(c.content(), "héll");
        c.move_left();
        c.move_left();
        c.move_left();
        c.delete();
        assert_eq!(c.content(), "hll");
        c.insert_char('e');
        assert_eq!(c.content(), "hell");
        assert_eq!(c.cursor(), 2);
    }

    #[test]
    fn test_home_end_are_line_local() {
        let mut c = typed("first\nsecond");
        c.move_left();
        c.move_home();
        assert_eq!(c.cursor(), 6);
        assert_eq!(c.cursor_row_col(), (1, 0));
        c.move_end();
        assert_eq!(c.cursor(), 12);
        assert_eq!(c.line_count(), 2);
    }

    #[test]
    fn test_apply_insertion_moves_cursor_after_template() {
        let mut c = typed("intro");
        let insertion = Insertion::new(c.cursor(), "TEMPLATE");
        c.apply_insertion(&insertion);
        assert_eq!(c.content(), "intro\nTEMPLATE");
        assert_eq!(c.cursor(), 14);

        let mut c = typed("a b");
        c.move_left();
        c.move_left();
        c.apply_insertion(&Insertion::new(c.cursor(), "X"));
        assert_eq!(c.content(), "a\nX\n b");
        assert_eq!(c.cursor_row_col(), (1, 1));
    }

    #[test]
    fn test_update_clamps_cursor() {
        let mut c = typed("long text");
        c.update(|_| "hi".to_string());
        assert_eq!(c.cursor(), 2);
        assert_eq!(c.take(), "hi");
        assert!(c.is_empty());
        assert_eq!(c.cursor(), 0);
    }
}
