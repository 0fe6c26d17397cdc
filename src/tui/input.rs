use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::event::TermEvent;
use crate::native::{NativeFactory, NativeHandle, Rect, Size, Value, WidgetKind};
use crate::scroll::WHEEL_STEP;
use crate::tui::TerminalToolkit;
use crate::tui::draw::measure;

/// What the caller should do after an event was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    /// Only the toolkit's own state changed; repaint.
    Handled,
    /// Scroll the content by this many rows.
    Scroll(i32),
    /// The terminal changed size; refresh the layout.
    Resized,
    Quit,
}

fn is_interactive(kind: WidgetKind) -> bool {
    matches!(
        kind,
        WidgetKind::Button
            | WidgetKind::Checkbutton
            | WidgetKind::Entry
            | WidgetKind::Spinbox
            | WidgetKind::Scale
            | WidgetKind::Combobox
    )
}

impl TerminalToolkit {
    /// Maps one input event onto the retained widgets. Widget callbacks fire
    /// from in here, so deliver events through `Context::dispatch`.
    pub fn handle(&mut self, event: &TermEvent) -> Response {
        match event {
            TermEvent::Key(key) => self.handle_key(key),
            TermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            TermEvent::Paste(text) => match self.focused_kind() {
                Some((handle, WidgetKind::Entry)) => {
                    self.edit_text(handle, |current| current.push_str(text));
                    Response::Handled
                }
                _ => Response::Ignored,
            },
            TermEvent::Resize(width, height) => {
                debug!("terminal resized to {width}x{height}");
                self.set_screen(Size::new(*width, *height));
                Response::Resized
            }
        }
    }

    fn focused_kind(&self) -> Option<(NativeHandle, WidgetKind)> {
        let handle = self.focus()?;
        self.arena().get(handle).map(|w| (handle, w.kind))
    }

    /// Placed interactive widgets with their on-screen rectangles, in reading
    /// order.
    fn interactive(&self) -> Vec<(NativeHandle, Rect)> {
        let mut found: Vec<(NativeHandle, Rect)> = self
            .arena()
            .handles()
            .filter_map(|handle| {
                let widget = self.arena().get(handle)?;
                if !is_interactive(widget.kind) {
                    return None;
                }
                Some((handle, self.screen_rect(handle)?))
            })
            .collect();
        found.sort_by_key(|(handle, rect)| (rect.y, rect.x, *handle));
        found
    }

    fn screen_rect(&self, handle: NativeHandle) -> Option<Rect> {
        let at = self.absolute_position(handle)?;
        let widget = self.arena().get(handle)?;
        let size = measure(widget);
        let y = at.y.checked_sub(self.scroll_offset())?;
        Some(Rect {
            x: at.x,
            y,
            width: size.width,
            height: size.height,
        })
    }

    fn cycle_focus(&mut self, forward: bool) -> Response {
        let order = self.interactive();
        if order.is_empty() {
            return Response::Ignored;
        }
        let current = self
            .focus()
            .and_then(|f| order.iter().position(|(h, _)| *h == f));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        self.set_focus(Some(order[next].0));
        Response::Handled
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Response {
        if key.kind == KeyEventKind::Release {
            return Response::Ignored;
        }
        match key.code {
            KeyCode::Esc => return Response::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Response::Quit;
            }
            KeyCode::Tab => return self.cycle_focus(true),
            KeyCode::BackTab => return self.cycle_focus(false),
            KeyCode::PageUp => return Response::Scroll(-(self.viewport().height as i32)),
            KeyCode::PageDown => return Response::Scroll(self.viewport().height as i32),
            _ => {}
        }

        let Some((handle, kind)) = self.focused_kind() else {
            return Response::Ignored;
        };
        match (kind, key.code) {
            (WidgetKind::Entry, KeyCode::Char(c)) => {
                self.edit_text(handle, |text| text.push(c));
            }
            (WidgetKind::Entry | WidgetKind::Spinbox, KeyCode::Backspace) => {
                self.edit_text(handle, |text| {
                    text.pop();
                });
            }
            (WidgetKind::Spinbox, KeyCode::Char(c))
                if c.is_ascii_digit() || matches!(c, '-' | '.' | ',') =>
            {
                self.edit_text(handle, |text| text.push(c));
            }
            (WidgetKind::Spinbox | WidgetKind::Scale, KeyCode::Up | KeyCode::Right) => {
                self.step(handle, 1.0);
            }
            (WidgetKind::Spinbox | WidgetKind::Scale, KeyCode::Down | KeyCode::Left) => {
                self.step(handle, -1.0);
            }
            (WidgetKind::Combobox, KeyCode::Up) => self.cycle_choice(handle, false),
            (WidgetKind::Combobox, KeyCode::Down) => self.cycle_choice(handle, true),
            (_, KeyCode::Enter | KeyCode::Char(' ')) => self.activate(handle),
            _ => return Response::Ignored,
        }
        Response::Handled
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> Response {
        match mouse.kind {
            MouseEventKind::ScrollUp => Response::Scroll(-WHEEL_STEP),
            MouseEventKind::ScrollDown => Response::Scroll(WHEEL_STEP),
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .interactive()
                    .into_iter()
                    .rev()
                    .find(|(_, rect)| rect.contains(mouse.column, mouse.row));
                let Some((handle, rect)) = hit else {
                    self.set_focus(None);
                    return Response::Handled;
                };
                self.set_focus(Some(handle));
                match self.arena().get(handle).map(|w| w.kind) {
                    Some(WidgetKind::Scale) => self.slide_to(handle, rect, mouse.column),
                    Some(WidgetKind::Entry | WidgetKind::Spinbox) => {}
                    Some(_) => self.activate(handle),
                    None => {}
                }
                Response::Handled
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some((handle, WidgetKind::Scale)) = self.focused_kind() else {
                    return Response::Ignored;
                };
                let Some(rect) = self.screen_rect(handle) else {
                    return Response::Ignored;
                };
                self.slide_to(handle, rect, mouse.column);
                Response::Handled
            }
            _ => Response::Ignored,
        }
    }

    /// Press a button, toggle a checkbox or advance a combo box.
    fn activate(&mut self, handle: NativeHandle) {
        let Some(widget) = self.arena().get(handle) else {
            return;
        };
        match widget.kind {
            WidgetKind::Checkbutton => {
                let checked = widget.value.as_bool().unwrap_or(false);
                self.write_value(handle, Value::Bool(!checked));
            }
            WidgetKind::Combobox => self.cycle_choice(handle, true),
            WidgetKind::Button => self.fire(handle),
            _ => {}
        }
    }

    fn cycle_choice(&mut self, handle: NativeHandle, forward: bool) {
        let Some(widget) = self.arena().get(handle) else {
            return;
        };
        let count = widget.choices.len();
        if count == 0 {
            return;
        }
        let current = widget.value.as_index().unwrap_or(0);
        let next = match forward {
            true => (current + 1) % count,
            false => (current + count - 1) % count,
        };
        self.write_value(handle, Value::Index(next));
    }

    fn edit_text(&mut self, handle: NativeHandle, edit: impl FnOnce(&mut String)) {
        let Some(widget) = self.arena().get(handle) else {
            return;
        };
        let mut text = widget.value.as_text();
        edit(&mut text);
        self.write_value(handle, Value::Text(text));
    }

    /// Moves a spin box or slider by `direction` steps.
    fn step(&mut self, handle: NativeHandle, direction: f64) {
        let Some(widget) = self.arena().get(handle) else {
            return;
        };
        // sliders move in twentieths of their range
        let span = widget.max - widget.min;
        let step = match (widget.kind, &widget.value) {
            (WidgetKind::Scale, Value::Int(_)) => (span / 20.0).round().max(1.0),
            (WidgetKind::Scale, _) => span / 20.0,
            _ => widget.step,
        };
        let current = widget.value.as_f64().unwrap_or(widget.min);
        let next = current + direction * step;
        let value = match widget.value {
            Value::Int(_) => Value::Int(next.round() as i64),
            _ => Value::Float(next),
        };
        self.write_value(handle, value);
    }

    fn slide_to(&mut self, handle: NativeHandle, rect: Rect, column: u16) {
        let Some(widget) = self.arena().get(handle) else {
            return;
        };
        let span = rect.width.saturating_sub(1).max(1) as f64;
        let t = (column.saturating_sub(rect.x) as f64 / span).clamp(0.0, 1.0);
        let next = widget.min + t * (widget.max - widget.min);
        let value = match widget.value {
            Value::Int(_) => Value::Int(next.round() as i64),
            _ => Value::Float(next),
        };
        self.write_value(handle, value);
    }
}
