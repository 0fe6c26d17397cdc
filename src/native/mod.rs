//! The boundary to the retained-mode toolkit.
//!
//! The reconciliation engine only ever talks to a [`NativeFactory`]: it asks
//! it to create, configure, place, measure and destroy widgets, and it hands
//! it callbacks to fire when the user interacts with a widget. Everything
//! toolkit-specific (drawing, hit testing, event loops) lives behind it.

use std::fmt;

pub mod arena;
pub mod headless;

pub use arena::{NativeWidget, WidgetArena};
pub use headless::{HeadlessToolkit, NativeCall};

/// Opaque handle to a widget owned by a [`NativeFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + self.width as u32
            && (y as u32) < self.y as u32 + self.height as u32
    }
}

/// The widget kinds a factory may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    Button,
    Checkbutton,
    Entry,
    Spinbox,
    Scale,
    Combobox,
    Progressbar,
    Separator,
    Frame,
    LabelFrame,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 11] = [
        WidgetKind::Label,
        WidgetKind::Button,
        WidgetKind::Checkbutton,
        WidgetKind::Entry,
        WidgetKind::Spinbox,
        WidgetKind::Scale,
        WidgetKind::Combobox,
        WidgetKind::Progressbar,
        WidgetKind::Separator,
        WidgetKind::Frame,
        WidgetKind::LabelFrame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
            WidgetKind::Checkbutton => "checkbutton",
            WidgetKind::Entry => "entry",
            WidgetKind::Spinbox => "spinbox",
            WidgetKind::Scale => "scale",
            WidgetKind::Combobox => "combobox",
            WidgetKind::Progressbar => "progressbar",
            WidgetKind::Separator => "separator",
            WidgetKind::Frame => "frame",
            WidgetKind::LabelFrame => "labelframe",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, WidgetKind::Frame | WidgetKind::LabelFrame)
    }
}

/// A value held by a stateful native widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Index(usize),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(f.round() as i64),
            Value::Index(i) => Some(*i as i64),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(*b as i64),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Index(i) => Some(*i as f64),
            // Some locales type a comma as decimal separator
            Value::Text(s) => s.trim().replace(',', ".").parse().ok(),
            Value::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Index(i) => i.to_string(),
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Index(i) => Some(*i),
            Value::Int(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }
}

/// Construction and configuration options understood by factories.
/// Factories ignore options that make no sense for a kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeOption {
    Text(String),
    Value(Value),
    Range { min: f64, max: f64 },
    Step(f64),
    Decimals(u8),
    Choices(Vec<String>),
    Width(u16),
    Style(String),
}

/// Extra arguments to a `place` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceOptions {
    /// Overrides the widget's requested width.
    pub width: Option<u16>,
}

/// Where the scrollbar thumb sits, as fractions of the content height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarGeometry {
    pub first: f32,
    pub last: f32,
}

/// Fired by the toolkit when the user interacts with a widget, and when a
/// stateful widget's value is written (the toolkit does not distinguish).
pub type InputCallback = Box<dyn FnMut()>;

/// The capability set the engine needs from a retained-mode toolkit.
pub trait NativeFactory {
    fn supports(&self, kind: WidgetKind) -> bool;

    /// Creates a widget inside `parent`, or inside the content root when
    /// `parent` is `None`.
    fn create(
        &mut self,
        kind: WidgetKind,
        parent: Option<NativeHandle>,
        options: &[NativeOption],
    ) -> NativeHandle;

    /// Destroys a widget and its native children. Unknown handles are ignored.
    fn destroy(&mut self, handle: NativeHandle);

    fn configure(&mut self, handle: NativeHandle, options: &[NativeOption]);

    fn subscribe(&mut self, handle: NativeHandle, callback: InputCallback);

    /// Places a widget at absolute coordinates within its parent.
    fn place(&mut self, handle: NativeHandle, at: Point, extras: &PlaceOptions);

    fn requested_size(&self, handle: NativeHandle) -> Size;

    /// Forces the size of a container.
    fn resize(&mut self, handle: NativeHandle, size: Size);

    fn value(&self, handle: NativeHandle) -> Option<Value>;

    /// Visible area of the content root.
    fn viewport(&self) -> Size;

    fn resize_content(&mut self, size: Size);

    /// `None` hides the scrollbar.
    fn update_scrollbar(&mut self, geometry: Option<ScrollbarGeometry>);

    fn scroll_content(&mut self, offset: u16);
}
