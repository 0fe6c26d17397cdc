//! Terminal backend.
//!
//! `TerminalToolkit` keeps retained widgets in a [`WidgetArena`], lays them
//! out in terminal cells and paints the whole screen into a
//! [`TerminalBuffer`] that is written out with crossterm. Input events are
//! mapped to the same native callbacks a desktop toolkit would fire.

use std::io::Write;

use anyhow::Result;
use tracing::trace;

use crate::color::Palette;
use crate::native::{
    InputCallback, NativeFactory, NativeHandle, NativeOption, PlaceOptions, Point,
    ScrollbarGeometry, Size, Value, WidgetArena, WidgetKind,
};

pub mod draw;
pub mod input;
pub mod terminal_buffer;

use draw::{Painter, measure, paint_scrollbar};
use terminal_buffer::TerminalBuffer;

pub use input::Response;

/// Column kept free for the scrollbar.
const SCROLLBAR_WIDTH: u16 = 1;

pub struct TerminalToolkit {
    arena: WidgetArena,
    /// Whole terminal
    screen: Size,
    content: Size,
    scrollbar: Option<ScrollbarGeometry>,
    scroll_offset: u16,
    focus: Option<NativeHandle>,
    palette: Palette,
}

impl TerminalToolkit {
    pub fn new(screen: Size, palette: Palette) -> Self {
        Self {
            arena: WidgetArena::new(),
            screen,
            content: Size::default(),
            scrollbar: None,
            scroll_offset: 0,
            focus: None,
            palette,
        }
    }

    /// A toolkit sized to the current terminal, with detected colors.
    pub fn detect() -> Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(Size::new(width, height), Palette::detect()))
    }

    pub fn arena(&self) -> &WidgetArena {
        &self.arena
    }

    pub fn focus(&self) -> Option<NativeHandle> {
        self.focus.filter(|h| self.arena.get(*h).is_some())
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn set_screen(&mut self, screen: Size) {
        self.screen = screen;
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Paints every placed widget and the scrollbar.
    pub fn paint(&self) -> TerminalBuffer {
        let mut buffer = TerminalBuffer::new(self.screen.width, self.screen.height);
        let painter = Painter {
            arena: &self.arena,
            palette: &self.palette,
            focus: self.focus(),
        };
        painter.paint(&mut buffer, self.scroll_offset);
        if let Some(geometry) = self.scrollbar {
            let column = self.screen.width.saturating_sub(SCROLLBAR_WIDTH) as i32;
            paint_scrollbar(&mut buffer, column, geometry, &self.palette);
        }
        buffer
    }

    pub fn render(&self, out: &mut impl Write) -> Result<()> {
        self.paint().composite(out)
    }

    /// Screen position of a placed widget, before scrolling.
    pub fn absolute_position(&self, handle: NativeHandle) -> Option<Point> {
        self.arena.absolute_position(handle)
    }

    pub(crate) fn write_value(&mut self, handle: NativeHandle, value: Value) {
        self.arena.write_value(handle, value);
    }

    pub(crate) fn fire(&mut self, handle: NativeHandle) {
        self.arena.fire(handle);
    }

    pub(crate) fn set_focus(&mut self, handle: Option<NativeHandle>) {
        if self.focus != handle {
            trace!("focus {:?} -> {:?}", self.focus, handle);
            self.focus = handle;
        }
    }

    pub(crate) fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }
}

impl NativeFactory for TerminalToolkit {
    fn supports(&self, _kind: WidgetKind) -> bool {
        true
    }

    fn create(
        &mut self,
        kind: WidgetKind,
        parent: Option<NativeHandle>,
        options: &[NativeOption],
    ) -> NativeHandle {
        self.arena.create(kind, parent, options)
    }

    fn destroy(&mut self, handle: NativeHandle) {
        self.arena.destroy(handle);
        if self.focus.is_some_and(|h| self.arena.get(h).is_none()) {
            self.focus = None;
        }
    }

    fn configure(&mut self, handle: NativeHandle, options: &[NativeOption]) {
        self.arena.configure(handle, options);
    }

    fn subscribe(&mut self, handle: NativeHandle, callback: InputCallback) {
        self.arena.subscribe(handle, callback);
    }

    fn place(&mut self, handle: NativeHandle, at: Point, extras: &PlaceOptions) {
        self.arena.place(handle, at, extras);
    }

    fn requested_size(&self, handle: NativeHandle) -> Size {
        self.arena.get(handle).map(measure).unwrap_or_default()
    }

    fn resize(&mut self, handle: NativeHandle, size: Size) {
        self.arena.resize(handle, size);
    }

    fn value(&self, handle: NativeHandle) -> Option<Value> {
        self.arena.get(handle).map(|w| w.value.clone())
    }

    fn viewport(&self) -> Size {
        Size::new(
            self.screen.width.saturating_sub(SCROLLBAR_WIDTH),
            self.screen.height,
        )
    }

    fn resize_content(&mut self, size: Size) {
        self.content = size;
    }

    fn update_scrollbar(&mut self, geometry: Option<ScrollbarGeometry>) {
        self.scrollbar = geometry;
    }

    fn scroll_content(&mut self, offset: u16) {
        self.scroll_offset = offset;
    }
}
