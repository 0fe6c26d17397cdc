use std::collections::HashMap;

use tracing::trace;

use crate::native::{
    InputCallback, NativeHandle, NativeOption, PlaceOptions, Point, Size, Value, WidgetKind,
};

/// Retained state of one native widget.
pub struct NativeWidget {
    pub kind: WidgetKind,
    pub parent: Option<NativeHandle>,
    pub text: String,
    pub value: Value,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub decimals: u8,
    pub choices: Vec<String>,
    pub style: Option<String>,
    /// Requested width set through [`NativeOption::Width`].
    pub width: Option<u16>,
    /// `None` until the widget is placed; unplaced widgets are not shown.
    pub position: Option<Point>,
    pub place: PlaceOptions,
    /// Forced size of containers.
    pub forced_size: Option<Size>,
    callback: Option<InputCallback>,
}

impl NativeWidget {
    fn new(kind: WidgetKind, parent: Option<NativeHandle>) -> Self {
        let value = match kind {
            WidgetKind::Checkbutton => Value::Bool(false),
            WidgetKind::Entry => Value::Text(String::new()),
            WidgetKind::Spinbox | WidgetKind::Progressbar => Value::Int(0),
            WidgetKind::Scale => Value::Float(0.0),
            WidgetKind::Combobox => Value::Index(0),
            _ => Value::Int(0),
        };
        Self {
            kind,
            parent,
            text: String::new(),
            value,
            min: 0.0,
            max: 100.0,
            step: 1.0,
            decimals: 3,
            choices: Vec::new(),
            style: None,
            width: None,
            position: None,
            place: PlaceOptions::default(),
            forced_size: None,
            callback: None,
        }
    }

    /// The value formatted the way the widget displays it.
    pub fn display_value(&self) -> String {
        match (&self.value, self.kind) {
            (Value::Float(f), _) => format!("{:.*}", self.decimals as usize, f),
            (Value::Index(i), WidgetKind::Combobox) => {
                self.choices.get(*i).cloned().unwrap_or_default()
            }
            (value, _) => value.as_text(),
        }
    }

    /// Position of the value inside `[min, max]`, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        let v = self.value.as_f64().unwrap_or(self.min);
        ((v - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Arena of retained widgets shared by the toolkit implementations.
///
/// Handles are never reused, so a stale handle can never alias a newer
/// widget; operations on unknown handles are ignored.
#[derive(Default)]
pub struct WidgetArena {
    widgets: HashMap<NativeHandle, NativeWidget>,
    /// Children in creation order; `None` is the content root
    children: HashMap<Option<NativeHandle>, Vec<NativeHandle>>,
    next_handle: u64,
}

impl WidgetArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn create(
        &mut self,
        kind: WidgetKind,
        parent: Option<NativeHandle>,
        options: &[NativeOption],
    ) -> NativeHandle {
        self.next_handle += 1;
        let handle = NativeHandle(self.next_handle);
        let mut widget = NativeWidget::new(kind, parent);
        apply_options(&mut widget, options);
        self.widgets.insert(handle, widget);
        self.children.entry(parent).or_default().push(handle);
        trace!("native create {} {}", kind.as_str(), handle);
        handle
    }

    /// Destroys `handle` and every descendant. Returns how many widgets were
    /// removed.
    pub fn destroy(&mut self, handle: NativeHandle) -> usize {
        let Some(widget) = self.widgets.remove(&handle) else {
            return 0;
        };
        if let Some(siblings) = self.children.get_mut(&widget.parent) {
            siblings.retain(|h| *h != handle);
        }
        let mut removed = 1;
        for child in self.children.remove(&Some(handle)).unwrap_or_default() {
            removed += self.destroy(child);
        }
        trace!("native destroy {} ({} widgets)", handle, removed);
        removed
    }

    /// Applies options. Writing a value fires the widget's callback, the way
    /// a toolkit variable trace would.
    pub fn configure(&mut self, handle: NativeHandle, options: &[NativeOption]) {
        let Some(widget) = self.widgets.get_mut(&handle) else {
            return;
        };
        let wrote_value = apply_options(widget, options);
        if wrote_value {
            fire(widget);
        }
    }

    /// A value change coming from the user.
    pub fn write_value(&mut self, handle: NativeHandle, value: Value) {
        if let Some(widget) = self.widgets.get_mut(&handle) {
            widget.value = clamp_value(widget, value);
            fire(widget);
        }
    }

    /// A stateless interaction such as a button press.
    pub fn fire(&mut self, handle: NativeHandle) {
        if let Some(widget) = self.widgets.get_mut(&handle) {
            fire(widget);
        }
    }

    pub fn subscribe(&mut self, handle: NativeHandle, callback: InputCallback) {
        if let Some(widget) = self.widgets.get_mut(&handle) {
            widget.callback = Some(callback);
        }
    }

    pub fn place(&mut self, handle: NativeHandle, at: Point, extras: &PlaceOptions) {
        if let Some(widget) = self.widgets.get_mut(&handle) {
            widget.position = Some(at);
            widget.place = *extras;
        }
    }

    pub fn resize(&mut self, handle: NativeHandle, size: Size) {
        if let Some(widget) = self.widgets.get_mut(&handle) {
            widget.forced_size = Some(size);
        }
    }

    pub fn get(&self, handle: NativeHandle) -> Option<&NativeWidget> {
        self.widgets.get(&handle)
    }

    pub fn get_mut(&mut self, handle: NativeHandle) -> Option<&mut NativeWidget> {
        self.widgets.get_mut(&handle)
    }

    pub fn children(&self, parent: Option<NativeHandle>) -> &[NativeHandle] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn handles(&self) -> impl Iterator<Item = NativeHandle> + '_ {
        self.widgets.keys().copied()
    }

    /// First widget of `kind` whose text equals `text`.
    pub fn find(&self, kind: WidgetKind, text: &str) -> Option<NativeHandle> {
        let mut handles: Vec<_> = self
            .widgets
            .iter()
            .filter(|(_, w)| w.kind == kind && w.text == text)
            .map(|(h, _)| *h)
            .collect();
        handles.sort();
        handles.first().copied()
    }

    /// Position of a widget relative to the content root.
    pub fn absolute_position(&self, handle: NativeHandle) -> Option<Point> {
        let widget = self.widgets.get(&handle)?;
        let own = widget.position?;
        match widget.parent {
            None => Some(own),
            Some(parent) => {
                let base = self.absolute_position(parent)?;
                Some(Point::new(
                    base.x.saturating_add(own.x),
                    base.y.saturating_add(own.y),
                ))
            }
        }
    }
}

fn fire(widget: &mut NativeWidget) {
    if let Some(callback) = widget.callback.as_mut() {
        callback();
    }
}

fn clamp_value(widget: &NativeWidget, value: Value) -> Value {
    match (widget.kind, value) {
        (WidgetKind::Spinbox | WidgetKind::Scale, Value::Int(i)) => {
            Value::Int((i as f64).clamp(widget.min, widget.max.max(widget.min)) as i64)
        }
        (WidgetKind::Spinbox | WidgetKind::Scale, Value::Float(f)) => {
            Value::Float(f.clamp(widget.min, widget.max.max(widget.min)))
        }
        (WidgetKind::Combobox, Value::Index(i)) if !widget.choices.is_empty() => {
            Value::Index(i.min(widget.choices.len() - 1))
        }
        (_, value) => value,
    }
}

/// Returns whether a value was written.
fn apply_options(widget: &mut NativeWidget, options: &[NativeOption]) -> bool {
    let mut wrote_value = false;
    for option in options {
        match option {
            NativeOption::Text(text) => widget.text = text.clone(),
            NativeOption::Value(value) => {
                widget.value = clamp_value(widget, value.clone());
                wrote_value = true;
            }
            NativeOption::Range { min, max } => {
                widget.min = *min;
                widget.max = *max;
            }
            NativeOption::Step(step) => widget.step = *step,
            NativeOption::Decimals(decimals) => widget.decimals = *decimals,
            NativeOption::Choices(choices) => widget.choices = choices.clone(),
            NativeOption::Width(width) => widget.width = Some(*width),
            NativeOption::Style(style) => widget.style = Some(style.clone()),
        }
    }
    wrote_value
}
