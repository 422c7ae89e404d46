use kb_weaver_engine::sync::EditorSurface;

/// Plain text buffer with a cursor: the in-process editor surface for the
/// terminal UI. `replace_all` moves the cursor to the end of the document,
/// which is exactly the disruption the sync guard keeps away from routine
/// keystrokes.
#[derive(Debug)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    /// Char index within the current line.
    col: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl TextArea {
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let removed = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
            self.lines[self.row].push_str(&removed);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < char_len(&self.lines[self.row]) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(char_len(&self.lines[self.row]));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(char_len(&self.lines[self.row]));
        }
    }
}

impl EditorSurface for TextArea {
    fn content(&self) -> String {
        self.lines.join("\n")
    }

    fn replace_all(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = char_len(&self.lines[self.row]);
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_builds_up_a_document() {
        let mut area = TextArea::default();
        for c in "## Problem".chars() {
            area.insert_char(c);
        }
        area.insert_newline();
        area.insert_char('X');

        assert_eq!(area.content(), "## Problem\nX");
        assert_eq!(area.cursor(), (1, 1));
    }

    #[test]
    fn backspace_joins_lines_at_column_zero() {
        let mut area = TextArea::default();
        area.replace_all("ab\ncd");
        area.row = 1;
        area.col = 0;

        area.backspace();
        assert_eq!(area.content(), "abcd");
        assert_eq!(area.cursor(), (0, 2));
    }

    #[test]
    fn replace_all_moves_the_cursor_to_the_end() {
        let mut area = TextArea::default();
        area.replace_all("one\ntwo");
        assert_eq!(area.cursor(), (1, 3));
        assert_eq!(area.lines().len(), 2);
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut area = TextArea::default();
        for c in "héllo".chars() {
            area.insert_char(c);
        }
        area.move_left();
        area.backspace();
        assert_eq!(area.content(), "hélo");
    }

    #[test]
    fn vertical_movement_clamps_the_column() {
        let mut area = TextArea::default();
        area.replace_all("longer line\nab");
        assert_eq!(area.cursor(), (1, 2));
        area.move_up();
        assert_eq!(area.cursor(), (0, 2));
        area.move_down();
        assert_eq!(area.cursor(), (1, 2));
    }
}
