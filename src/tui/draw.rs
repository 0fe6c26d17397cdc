//! Cell metrics and painting of retained widgets.

use unicode_width::UnicodeWidthStr;

use crate::color::Palette;
use crate::native::{NativeHandle, NativeWidget, ScrollbarGeometry, Size, Value, WidgetArena, WidgetKind};
use crate::tui::terminal_buffer::{CellStyle, TerminalBuffer};

const ENTRY_WIDTH: u16 = 20;
const SPINBOX_WIDTH: u16 = 8;
const COMBOBOX_WIDTH: u16 = 16;
const TRACK_WIDTH: u16 = 20;

fn text_width(text: &str) -> u16 {
    let widest = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
    u16::try_from(widest).unwrap_or(u16::MAX)
}

/// Requested size of a widget in cells.
pub fn measure(widget: &NativeWidget) -> Size {
    let width_or = |default: u16| widget.width.unwrap_or(default);
    match widget.kind {
        WidgetKind::Label => Size::new(
            text_width(&widget.text),
            u16::try_from(widget.text.lines().count().max(1)).unwrap_or(u16::MAX),
        ),
        WidgetKind::Button | WidgetKind::Checkbutton => {
            Size::new(text_width(&widget.text).saturating_add(4), 1)
        }
        WidgetKind::Entry => Size::new(width_or(ENTRY_WIDTH).saturating_add(2), 1),
        WidgetKind::Spinbox => Size::new(width_or(SPINBOX_WIDTH).saturating_add(3), 1),
        WidgetKind::Combobox => Size::new(width_or(COMBOBOX_WIDTH).saturating_add(3), 1),
        WidgetKind::Scale | WidgetKind::Progressbar => Size::new(width_or(TRACK_WIDTH), 1),
        WidgetKind::Separator => Size::new(
            widget.place.width.unwrap_or_else(|| width_or(TRACK_WIDTH)),
            1,
        ),
        WidgetKind::Frame | WidgetKind::LabelFrame => widget.forced_size.unwrap_or_default(),
    }
}

/// Keeps the last `width` columns of `text`, padded to exactly `width`.
fn fit_tail(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut chars: Vec<char> = text.chars().collect();
    while UnicodeWidthStr::width(chars.iter().collect::<String>().as_str()) > width {
        chars.remove(0);
    }
    let shown: String = chars.into_iter().collect();
    let pad = width.saturating_sub(shown.width());
    format!("{shown}{}", " ".repeat(pad))
}

/// Keeps the first `width` columns of `text`, padded to exactly `width`.
fn fit_head(text: &str, width: u16) -> String {
    let mut shown = String::new();
    for ch in text.chars() {
        if (shown.clone() + &ch.to_string()).width() > width as usize {
            break;
        }
        shown.push(ch);
    }
    let pad = (width as usize).saturating_sub(shown.width());
    format!("{shown}{}", " ".repeat(pad))
}

pub struct Painter<'a> {
    pub arena: &'a WidgetArena,
    pub palette: &'a Palette,
    pub focus: Option<NativeHandle>,
}

impl Painter<'_> {
    /// Paints the content root scrolled up by `offset` rows.
    pub fn paint(&self, buffer: &mut TerminalBuffer, offset: u16) {
        self.paint_children(buffer, None, 0, -(offset as i32));
    }

    fn paint_children(
        &self,
        buffer: &mut TerminalBuffer,
        parent: Option<NativeHandle>,
        x: i32,
        y: i32,
    ) {
        for &handle in self.arena.children(parent) {
            let Some(widget) = self.arena.get(handle) else {
                continue;
            };
            let Some(at) = widget.position else {
                continue;
            };
            let (wx, wy) = (x + at.x as i32, y + at.y as i32);
            self.paint_widget(buffer, handle, widget, wx, wy);
            if widget.kind.is_container() {
                self.paint_children(buffer, Some(handle), wx, wy);
            }
        }
    }

    fn paint_widget(
        &self,
        buffer: &mut TerminalBuffer,
        handle: NativeHandle,
        widget: &NativeWidget,
        x: i32,
        y: i32,
    ) {
        let focused = self.focus == Some(handle);
        let base = CellStyle::fg(self.palette.for_style(widget.style.as_deref()));
        let highlight = match (focused, self.palette.focus) {
            (false, _) => base,
            (true, Some(bg)) => CellStyle {
                bg: Some(bg),
                ..base
            },
            (true, None) => CellStyle {
                reverse: true,
                ..base
            },
        };
        let muted = CellStyle::fg(self.palette.muted);
        let size = measure(widget);

        match widget.kind {
            WidgetKind::Label => {
                for (row, line) in widget.text.lines().enumerate() {
                    buffer.put(x, y + row as i32, line, base);
                }
            }
            WidgetKind::Button => {
                buffer.put(x, y, &format!("[ {} ]", widget.text), highlight);
            }
            WidgetKind::Checkbutton => {
                let mark = if widget.value.as_bool().unwrap_or(false) { 'x' } else { ' ' };
                buffer.put(x, y, &format!("[{mark}]"), highlight);
                buffer.put(x + 3, y, &format!(" {}", widget.text), base);
            }
            WidgetKind::Entry => {
                let inner = size.width.saturating_sub(2);
                let text = fit_tail(&widget.display_value(), inner);
                buffer.put(x, y, "[", muted);
                buffer.put(x + 1, y, &text, highlight);
                buffer.put(x + 1 + inner as i32, y, "]", muted);
                if focused {
                    let typed = widget.display_value().width().min(inner as usize) as i32;
                    buffer.set_cursor(x + 1 + typed, y);
                }
            }
            WidgetKind::Spinbox => {
                let inner = size.width.saturating_sub(3);
                let text = match &widget.value {
                    Value::Text(typed) => fit_tail(typed, inner),
                    _ => fit_tail(&widget.display_value(), inner),
                };
                buffer.put(x, y, "[", muted);
                buffer.put(x + 1, y, &text, highlight);
                buffer.put(x + 1 + inner as i32, y, "]±", muted);
            }
            WidgetKind::Combobox => {
                let inner = size.width.saturating_sub(3);
                let text = fit_head(&widget.display_value(), inner);
                buffer.put(x, y, "[", muted);
                buffer.put(x + 1, y, &text, highlight);
                buffer.put(x + 1 + inner as i32, y, "▾]", muted);
            }
            WidgetKind::Scale => {
                let width = size.width as i32;
                buffer.fill(x, y, width, '─', muted);
                let knob = (widget.fraction() * (width - 1).max(0) as f64).round() as i32;
                buffer.put(x + knob, y, "●", highlight);
            }
            WidgetKind::Progressbar => {
                let width = size.width as i32;
                let filled = (widget.fraction() * width as f64).round() as i32;
                buffer.fill(x, y, width, '░', muted);
                buffer.fill(x, y, filled, '█', base);
            }
            WidgetKind::Separator => {
                buffer.fill(x, y, size.width as i32, '─', base);
            }
            WidgetKind::LabelFrame => paint_border(buffer, x, y, size, &widget.text, muted),
            WidgetKind::Frame => {}
        }
    }
}

fn paint_border(buffer: &mut TerminalBuffer, x: i32, y: i32, size: Size, title: &str, style: CellStyle) {
    let (w, h) = (size.width as i32, size.height as i32);
    if w < 2 || h < 2 {
        return;
    }
    buffer.put(x, y, "┌", style);
    buffer.fill(x + 1, y, w - 2, '─', style);
    buffer.put(x + w - 1, y, "┐", style);
    for row in 1..h - 1 {
        buffer.put(x, y + row, "│", style);
        buffer.put(x + w - 1, y + row, "│", style);
    }
    buffer.put(x, y + h - 1, "└", style);
    buffer.fill(x + 1, y + h - 1, w - 2, '─', style);
    buffer.put(x + w - 1, y + h - 1, "┘", style);
    if !title.is_empty() && w > 4 {
        let title = fit_head(title, (w - 4) as u16);
        buffer.put(x + 1, y, &format!(" {} ", title.trim_end()), CellStyle::default());
    }
}

/// Vertical scrollbar in column `x`.
pub fn paint_scrollbar(buffer: &mut TerminalBuffer, x: i32, geometry: ScrollbarGeometry, palette: &Palette) {
    let height = buffer.height() as i32;
    let track = CellStyle::fg(palette.muted);
    let thumb = CellStyle::fg(palette.accent);
    let first = (geometry.first * height as f32).floor() as i32;
    let last = ((geometry.last * height as f32).ceil() as i32).max(first + 1);
    for row in 0..height {
        if (first..last).contains(&row) {
            buffer.put(x, row, "█", thumb);
        } else {
            buffer.put(x, row, "│", track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{NativeOption, PlaceOptions, Point};

    #[test]
    fn test_fit_keeps_requested_width() {
        assert_eq!(fit_tail("abcdef", 3), "def");
        assert_eq!(fit_tail("ab", 4), "ab  ");
        assert_eq!(fit_head("abcdef", 3), "abc");
    }

    #[test]
    fn test_paint_labelframe_with_child() {
        let mut arena = WidgetArena::new();
        let frame = arena.create(
            WidgetKind::LabelFrame,
            None,
            &[NativeOption::Text("Box".into())],
        );
        arena.resize(frame, Size::new(10, 3));
        arena.place(frame, Point::new(0, 0), &PlaceOptions::default());
        let button = arena.create(WidgetKind::Button, Some(frame), &[NativeOption::Text("Go".into())]);
        arena.place(button, Point::new(1, 1), &PlaceOptions::default());

        let palette = Palette::for_level(crate::color::ColorLevel::None);
        let painter = Painter {
            arena: &arena,
            palette: &palette,
            focus: None,
        };
        let mut buffer = TerminalBuffer::new(12, 4);
        painter.paint(&mut buffer, 0);
        assert_eq!(buffer.row_text(0), "┌ Box ───┐");
        assert_eq!(buffer.row_text(1), "│[ Go ]  │");
        assert_eq!(buffer.row_text(2), "└────────┘");
    }

    #[test]
    fn test_scrolled_rows_are_clipped() {
        let mut arena = WidgetArena::new();
        let label = arena.create(WidgetKind::Label, None, &[NativeOption::Text("a\nb".into())]);
        arena.place(label, Point::new(0, 0), &PlaceOptions::default());
        let palette = Palette::for_level(crate::color::ColorLevel::None);
        let painter = Painter {
            arena: &arena,
            palette: &palette,
            focus: None,
        };
        let mut buffer = TerminalBuffer::new(4, 2);
        painter.paint(&mut buffer, 1);
        assert_eq!(buffer.row_text(0), "b");
        assert_eq!(buffer.row_text(1), "");
    }
}
