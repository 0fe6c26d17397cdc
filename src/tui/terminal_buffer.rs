use std::io::Write;

use anyhow::Result;
use crossterm::QueueableCommand;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub reverse: bool,
}

impl CellStyle {
    pub fn fg(color: Option<Color>) -> Self {
        Self {
            fg: color,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// `None` for the trailing half of a wide character
    pub ch: Option<char>,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: Some(' '),
            style: CellStyle::default(),
        }
    }
}

/// A grid of cells the whole screen is painted into before it is written
/// to the terminal in one go. Coordinates outside the grid are clipped, so
/// scrolled content may be painted at negative rows.
pub struct TerminalBuffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
    cursor: Option<(u16, u16)>,
}

impl TerminalBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Cell::default(); width as usize * height as usize],
            width,
            height,
            cursor: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x as i32, y as i32).map(|i| &self.cells[i])
    }

    /// Writes `text` starting at `(x, y)` and returns the number of columns
    /// it takes, including clipped ones.
    pub fn put(&mut self, x: i32, y: i32, text: &str, style: CellStyle) -> i32 {
        let mut col = x;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            if let Some(i) = self.index(col, y) {
                self.cells[i] = Cell {
                    ch: Some(ch),
                    style,
                };
            }
            if width == 2 {
                if let Some(i) = self.index(col + 1, y) {
                    self.cells[i] = Cell { ch: None, style };
                }
            }
            col += width;
        }
        col - x
    }

    pub fn fill(&mut self, x: i32, y: i32, width: i32, ch: char, style: CellStyle) {
        for col in x..x + width {
            if let Some(i) = self.index(col, y) {
                self.cells[i] = Cell {
                    ch: Some(ch),
                    style,
                };
            }
        }
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) -> &mut Self {
        self.cursor = self.index(x, y).map(|_| (x as u16, y as u16));
        self
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Text of one row, trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        let start = y as usize * self.width as usize;
        let row = &self.cells[start..start + self.width as usize];
        let text: String = row.iter().filter_map(|c| c.ch).collect();
        text.trim_end().to_string()
    }

    /// Writes the grid to `out`, switching colors only where they change.
    pub fn composite(&self, out: &mut impl Write) -> Result<()> {
        out.queue(Hide)?;
        for y in 0..self.height {
            out.queue(MoveTo(0, y))?;
            let mut current: Option<CellStyle> = None;
            for x in 0..self.width {
                let Some(cell) = self.get(x, y) else {
                    continue;
                };
                let Some(ch) = cell.ch else {
                    continue;
                };
                if current != Some(cell.style) {
                    out.queue(SetAttribute(Attribute::Reset))?;
                    out.queue(ResetColor)?;
                    if let Some(fg) = cell.style.fg {
                        out.queue(SetForegroundColor(fg))?;
                    }
                    if let Some(bg) = cell.style.bg {
                        out.queue(SetBackgroundColor(bg))?;
                    }
                    if cell.style.reverse {
                        out.queue(SetAttribute(Attribute::Reverse))?;
                    }
                    current = Some(cell.style);
                }
                out.queue(Print(ch))?;
            }
        }
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(ResetColor)?;
        if let Some((x, y)) = self.cursor {
            out.queue(MoveTo(x, y))?;
            out.queue(Show)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_clips_outside_the_grid() {
        let mut buffer = TerminalBuffer::new(5, 2);
        assert_eq!(buffer.put(3, 0, "abcd", CellStyle::default()), 4);
        buffer.put(0, -1, "hidden", CellStyle::default());
        buffer.put(0, 1, "xy", CellStyle::default());
        assert_eq!(buffer.row_text(0), "   ab");
        assert_eq!(buffer.row_text(1), "xy");
    }

    #[test]
    fn test_wide_characters_take_two_columns() {
        let mut buffer = TerminalBuffer::new(6, 1);
        assert_eq!(buffer.put(0, 0, "日本", CellStyle::default()), 4);
        assert_eq!(buffer.get(1, 0).unwrap().ch, None);
        assert_eq!(buffer.row_text(0), "日本");
    }

    #[test]
    fn test_composite_writes_escape_sequences() {
        let mut buffer = TerminalBuffer::new(3, 1);
        buffer.put(0, 0, "ok", CellStyle::fg(Some(Color::Red)));
        let mut out = Vec::new();
        buffer.composite(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ok"));
        assert!(text.contains("\u{1b}["));
    }
}
