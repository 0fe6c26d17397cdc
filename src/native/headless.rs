//! An in-memory toolkit.
//!
//! `HeadlessToolkit` keeps retained widgets without drawing them, measures
//! them with fixed pixel metrics, and logs every native call it receives so
//! callers can observe exactly what the reconciliation engine asked for.

use std::collections::HashSet;

use crate::native::{
    InputCallback, NativeFactory, NativeHandle, NativeOption, PlaceOptions, Point,
    ScrollbarGeometry, Size, Value, WidgetArena, WidgetKind,
};

const CHAR_WIDTH: u16 = 7;
const LINE_HEIGHT: u16 = 20;

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    Create { handle: NativeHandle, kind: WidgetKind },
    Destroy(NativeHandle),
    Configure(NativeHandle),
    Place { handle: NativeHandle, at: Point },
    Resize { handle: NativeHandle, size: Size },
    ResizeContent(Size),
    Scrollbar(Option<ScrollbarGeometry>),
    Scroll(u16),
}

pub struct HeadlessToolkit {
    arena: WidgetArena,
    installed: HashSet<WidgetKind>,
    viewport: Size,
    content: Size,
    scrollbar: Option<ScrollbarGeometry>,
    scroll_offset: u16,
    calls: Vec<NativeCall>,
}

impl HeadlessToolkit {
    /// A toolkit with every widget kind installed.
    pub fn new(viewport: Size) -> Self {
        Self::with_kinds(viewport, &WidgetKind::ALL)
    }

    pub fn with_kinds(viewport: Size, kinds: &[WidgetKind]) -> Self {
        Self {
            arena: WidgetArena::new(),
            installed: kinds.iter().copied().collect(),
            viewport,
            content: Size::default(),
            scrollbar: None,
            scroll_offset: 0,
            calls: Vec::new(),
        }
    }

    pub fn arena(&self) -> &WidgetArena {
        &self.arena
    }

    pub fn calls(&self) -> &[NativeCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<NativeCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn scrollbar(&self) -> Option<ScrollbarGeometry> {
        self.scrollbar
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn find(&self, kind: WidgetKind, text: &str) -> Option<NativeHandle> {
        self.arena.find(kind, text)
    }

    pub fn position(&self, handle: NativeHandle) -> Option<Point> {
        self.arena.get(handle).and_then(|w| w.position)
    }

    /// Simulates a mouse click the way the toolkit's own widgets react.
    pub fn click(&mut self, handle: NativeHandle) {
        let Some(widget) = self.arena.get(handle) else {
            return;
        };
        match widget.kind {
            WidgetKind::Checkbutton => {
                let checked = widget.value.as_bool().unwrap_or(false);
                self.arena.write_value(handle, Value::Bool(!checked));
            }
            WidgetKind::Combobox => {
                let count = widget.choices.len().max(1);
                let next = (widget.value.as_index().unwrap_or(0) + 1) % count;
                self.arena.write_value(handle, Value::Index(next));
            }
            _ => self.arena.fire(handle),
        }
    }

    /// Simulates the user editing a stateful widget.
    pub fn user_input(&mut self, handle: NativeHandle, value: Value) {
        self.arena.write_value(handle, value);
    }
}

impl NativeFactory for HeadlessToolkit {
    fn supports(&self, kind: WidgetKind) -> bool {
        self.installed.contains(&kind)
    }

    fn create(
        &mut self,
        kind: WidgetKind,
        parent: Option<NativeHandle>,
        options: &[NativeOption],
    ) -> NativeHandle {
        let handle = self.arena.create(kind, parent, options);
        self.calls.push(NativeCall::Create { handle, kind });
        handle
    }

    fn destroy(&mut self, handle: NativeHandle) {
        self.arena.destroy(handle);
        self.calls.push(NativeCall::Destroy(handle));
    }

    fn configure(&mut self, handle: NativeHandle, options: &[NativeOption]) {
        self.arena.configure(handle, options);
        self.calls.push(NativeCall::Configure(handle));
    }

    fn subscribe(&mut self, handle: NativeHandle, callback: InputCallback) {
        self.arena.subscribe(handle, callback);
    }

    fn place(&mut self, handle: NativeHandle, at: Point, extras: &PlaceOptions) {
        self.arena.place(handle, at, extras);
        self.calls.push(NativeCall::Place { handle, at });
    }

    fn requested_size(&self, handle: NativeHandle) -> Size {
        let Some(widget) = self.arena.get(handle) else {
            return Size::default();
        };
        // `chars` wide plus `extra` pixels, saturating at the largest size
        let text_px = |chars: u16, extra: u16| CHAR_WIDTH.saturating_mul(chars).saturating_add(extra);
        let chars = clamp_u16(
            widget
                .text
                .lines()
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0),
        );
        let width_or = |default: u16| widget.width.unwrap_or(default);
        match widget.kind {
            WidgetKind::Label => {
                let lines = clamp_u16(widget.text.lines().count().max(1));
                Size::new(text_px(chars, 4), LINE_HEIGHT.saturating_mul(lines))
            }
            WidgetKind::Button => Size::new(text_px(chars, 20), 26),
            WidgetKind::Checkbutton => Size::new(text_px(chars, 22), 22),
            WidgetKind::Entry => Size::new(text_px(width_or(20), 6), 24),
            WidgetKind::Spinbox => Size::new(text_px(width_or(10), 20), 24),
            WidgetKind::Combobox => Size::new(text_px(width_or(20), 20), 24),
            WidgetKind::Scale => Size::new(width_or(100), 24),
            WidgetKind::Progressbar => Size::new(width_or(100), 20),
            WidgetKind::Separator => {
                Size::new(widget.place.width.unwrap_or_else(|| width_or(100)), 2)
            }
            WidgetKind::Frame | WidgetKind::LabelFrame => widget.forced_size.unwrap_or_default(),
        }
    }

    fn resize(&mut self, handle: NativeHandle, size: Size) {
        self.arena.resize(handle, size);
        self.calls.push(NativeCall::Resize { handle, size });
    }

    fn value(&self, handle: NativeHandle) -> Option<Value> {
        self.arena.get(handle).map(|w| w.value.clone())
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn resize_content(&mut self, size: Size) {
        self.content = size;
        self.calls.push(NativeCall::ResizeContent(size));
    }

    fn update_scrollbar(&mut self, geometry: Option<ScrollbarGeometry>) {
        self.scrollbar = geometry;
        self.calls.push(NativeCall::Scrollbar(geometry));
    }

    fn scroll_content(&mut self, offset: u16) {
        self.scroll_offset = offset;
        self.calls.push(NativeCall::Scroll(offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninstalled_kinds_are_not_supported() {
        let toolkit =
            HeadlessToolkit::with_kinds(Size::new(100, 100), &[WidgetKind::Button, WidgetKind::Label]);
        assert!(toolkit.supports(WidgetKind::Button));
        assert!(!toolkit.supports(WidgetKind::Combobox));
    }

    #[test]
    fn test_click_toggles_checkbutton() {
        let mut toolkit = HeadlessToolkit::new(Size::new(100, 100));
        let check = toolkit.create(WidgetKind::Checkbutton, None, &[]);
        toolkit.click(check);
        assert_eq!(toolkit.value(check), Some(Value::Bool(true)));
        toolkit.click(check);
        assert_eq!(toolkit.value(check), Some(Value::Bool(false)));
    }

    #[test]
    fn test_huge_label_saturates() {
        let mut toolkit = HeadlessToolkit::new(Size::new(100, 100));
        let label = toolkit.create(
            WidgetKind::Label,
            None,
            &[NativeOption::Text("x".repeat(10_000))],
        );
        assert_eq!(toolkit.requested_size(label), Size::new(u16::MAX, LINE_HEIGHT));
    }

    #[test]
    fn test_label_measures_longest_line() {
        let mut toolkit = HeadlessToolkit::new(Size::new(100, 100));
        let label = toolkit.create(
            WidgetKind::Label,
            None,
            &[NativeOption::Text("ab\nabcd".into())],
        );
        assert_eq!(toolkit.requested_size(label), Size::new(CHAR_WIDTH * 4 + 4, 40));
    }
}
