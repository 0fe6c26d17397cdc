use crate::native::{Point, Size};

/// How the next placement relates to the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    /// Every placement starts a new row.
    NewRow,
    /// The next placement joins the current row, then back to `NewRow`.
    Once,
    /// Every placement inside a row scope shares one row. `joined` is false
    /// until the first placement, which starts a fresh row unless the scope
    /// was entered right after a `same_row`.
    Scoped { joined: bool },
}

/// Sequential layout pen for one nesting level.
#[derive(Debug, Clone)]
pub struct Cursor {
    padding: u16,
    position: Point,
    row_height: u16,
    col_width: u16,
    row_mode: RowMode,
    end_padding: u16,
    /// Identifier of the frame laid out by this cursor
    frame: Option<String>,
}

impl Cursor {
    pub fn new(padding: u16) -> Self {
        Self {
            padding,
            position: Point::new(padding, padding),
            row_height: 0,
            col_width: 0,
            row_mode: RowMode::NewRow,
            end_padding: padding,
            frame: None,
        }
    }

    /// A cursor laying out the children of `frame`.
    pub fn for_frame(padding: u16, frame: String, extra_end_padding: u16) -> Self {
        Self {
            end_padding: padding.saturating_add(extra_end_padding),
            frame: Some(frame),
            ..Self::new(padding)
        }
    }

    pub fn padding(&self) -> u16 {
        self.padding
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn row_mode(&self) -> RowMode {
        self.row_mode
    }

    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    /// Computes where a widget of `size` goes and advances the pen past it.
    pub fn advance(&mut self, size: Size) -> Point {
        let same_row = match self.row_mode {
            RowMode::NewRow => false,
            RowMode::Once => {
                self.row_mode = RowMode::NewRow;
                true
            }
            RowMode::Scoped { joined } => {
                self.row_mode = RowMode::Scoped { joined: true };
                joined
            }
        };

        if same_row {
            self.position.x = self.position.x.saturating_add(self.padding);
        } else {
            self.position.x = self.padding;
            self.position.y = self
                .position
                .y
                .saturating_add(self.row_height)
                .saturating_add(self.padding);
            self.row_height = 0;
        }

        let at = self.position;
        self.row_height = self.row_height.max(size.height);
        self.position.x = self.position.x.saturating_add(size.width);
        self.col_width = self.col_width.max(self.position.x);
        at
    }

    /// The next placement joins the current row. Inside a row scope this is
    /// already the case.
    pub fn same_row(&mut self) {
        if self.row_mode == RowMode::NewRow {
            self.row_mode = RowMode::Once;
        }
    }

    /// Enters a row scope, returning the mode to restore on exit.
    pub fn enter_row(&mut self) -> RowMode {
        let previous = self.row_mode;
        let joined = match previous {
            RowMode::NewRow => false,
            RowMode::Once => true,
            RowMode::Scoped { joined } => joined,
        };
        self.row_mode = RowMode::Scoped { joined };
        previous
    }

    pub fn exit_row(&mut self, previous: RowMode) {
        let placed = matches!(self.row_mode, RowMode::Scoped { joined: true });
        self.row_mode = match previous {
            RowMode::Scoped { joined } => RowMode::Scoped {
                joined: joined || placed,
            },
            RowMode::Once if !placed => RowMode::Once,
            _ => RowMode::NewRow,
        };
    }

    /// Extent of everything placed so far.
    pub fn size(&self) -> Size {
        Size::new(
            self.col_width,
            self.position.y.saturating_add(self.row_height),
        )
    }

    /// Size a frame needs to show everything placed by this cursor.
    pub fn frame_size(&self) -> Size {
        let content = self.size();
        Size::new(
            content.width.saturating_add(self.padding),
            content.height.saturating_add(self.end_padding),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAD: u16 = 5;

    #[test]
    fn test_new_rows_stack_vertically() {
        let mut cursor = Cursor::new(PAD);
        let a = cursor.advance(Size::new(40, 10));
        let b = cursor.advance(Size::new(20, 30));
        assert_eq!(a, Point::new(PAD, 2 * PAD));
        assert_eq!(b, Point::new(PAD, a.y + 10 + PAD));
        assert_eq!(cursor.size(), Size::new(PAD + 40, b.y + 30));
    }

    #[test]
    fn test_same_row_is_single_shot() {
        let mut cursor = Cursor::new(PAD);
        let a = cursor.advance(Size::new(40, 10));
        cursor.same_row();
        let b = cursor.advance(Size::new(20, 12));
        let c = cursor.advance(Size::new(20, 12));
        assert_eq!(b, Point::new(a.x + 40 + PAD, a.y));
        assert_eq!(c, Point::new(PAD, a.y + 12 + PAD));
    }

    #[test]
    fn test_row_scope_starts_fresh_row_then_joins() {
        let mut cursor = Cursor::new(PAD);
        let a = cursor.advance(Size::new(40, 10));
        let previous = cursor.enter_row();
        let b = cursor.advance(Size::new(10, 10));
        cursor.same_row();
        let c = cursor.advance(Size::new(10, 10));
        let d = cursor.advance(Size::new(10, 10));
        cursor.exit_row(previous);
        let e = cursor.advance(Size::new(10, 10));

        assert_eq!(b, Point::new(PAD, a.y + 10 + PAD));
        assert_eq!(c.y, b.y);
        assert_eq!(d, Point::new(c.x + 10 + PAD, b.y));
        assert_eq!(e.x, PAD);
        assert!(e.y > b.y);
    }

    #[test]
    fn test_row_scope_after_same_row_joins_previous_row() {
        let mut cursor = Cursor::new(PAD);
        let a = cursor.advance(Size::new(40, 10));
        cursor.same_row();
        let previous = cursor.enter_row();
        let b = cursor.advance(Size::new(10, 10));
        cursor.exit_row(previous);
        assert_eq!(b.y, a.y);
        assert_eq!(cursor.row_mode(), RowMode::NewRow);
    }

    #[test]
    fn test_nested_row_scope_keeps_outer_row() {
        let mut cursor = Cursor::new(PAD);
        let outer = cursor.enter_row();
        let a = cursor.advance(Size::new(10, 10));
        let inner = cursor.enter_row();
        let b = cursor.advance(Size::new(10, 10));
        cursor.exit_row(inner);
        let c = cursor.advance(Size::new(10, 10));
        cursor.exit_row(outer);

        assert_eq!(a.y, b.y);
        assert_eq!(b.y, c.y);
        assert_eq!(c.x, b.x + 10 + PAD);
    }

    #[test]
    fn test_frame_size_adds_end_padding() {
        let mut cursor = Cursor::for_frame(PAD, "f".into(), 15);
        cursor.advance(Size::new(40, 10));
        assert_eq!(cursor.size(), Size::new(PAD + 40, 2 * PAD + 10));
        assert_eq!(cursor.frame_size(), Size::new(2 * PAD + 40, 3 * PAD + 10 + 15));
        assert_eq!(cursor.frame(), Some("f"));
    }
}
