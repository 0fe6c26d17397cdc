//! Declarative widgets.
//!
//! Each widget is a small builder implementing [`Widget`]; `Ui` has a
//! shorthand method for the common case of every builder. A widget looks up
//! (or creates) its record, syncs the application value into the native
//! widget unless the user is interacting with it, places itself and reports
//! whether it triggered the current pass.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::Result;

use crate::error::ImError;
use crate::native::{NativeFactory, NativeHandle, NativeOption, PlaceOptions, Value, WidgetKind};
use crate::signal::ChangeGuard;
use crate::store::WidgetState;
use crate::ui::{Ui, display_text};

/// Default share of the viewport width taken by a separator.
pub const DEFAULT_RELWIDTH: f32 = 0.95;

pub trait Widget {
    type Output;

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<Self::Output>;
}

/// Side of an input widget its caption goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPosition {
    Left,
    #[default]
    Right,
}

impl LabelPosition {
    fn is_first(self) -> bool {
        self == LabelPosition::Left
    }
}

impl FromStr for LabelPosition {
    type Err = ImError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" | "r" | "east" | "e" => Ok(LabelPosition::Right),
            "left" | "l" | "west" | "w" => Ok(LabelPosition::Left),
            other => Err(ImError::InvalidOption {
                option: "label position",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LabelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelPosition::Left => write!(f, "left"),
            LabelPosition::Right => write!(f, "right"),
        }
    }
}

/// Toolkit options every builder accepts.
#[derive(Debug, Clone, Default)]
struct Common {
    style: Option<String>,
    width: Option<u16>,
}

impl Common {
    fn options(&self) -> Vec<NativeOption> {
        let mut options = Vec::new();
        if let Some(style) = &self.style {
            options.push(NativeOption::Style(style.clone()));
        }
        if let Some(width) = self.width {
            options.push(NativeOption::Width(width));
        }
        options
    }
}

macro_rules! common_setters {
    () => {
        /// Toolkit style tag, e.g. `"outline danger"`.
        pub fn style(mut self, style: impl Into<String>) -> Self {
            self.common.style = Some(style.into());
            self
        }

        pub fn width(mut self, width: u16) -> Self {
            self.common.width = Some(width);
            self
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared steps
// ─────────────────────────────────────────────────────────────────────────────

/// Writes `wanted` into the native widget unless `identifier` is active, with
/// the widget's change guard disarmed. Returns the native value afterwards.
fn sync_value<F: NativeFactory>(
    ui: &mut Ui<'_, F>,
    identifier: &str,
    handle: NativeHandle,
    wanted: Value,
    is_current: impl Fn(&Value) -> bool,
) -> Option<Value> {
    if !ui.is_active(identifier) {
        let current = ui.factory().value(handle);
        if !current.as_ref().is_some_and(&is_current) {
            let guard: Option<ChangeGuard> = ui
                .record(identifier)
                .and_then(|record| record.state().guard().cloned());
            let _quiet = guard.as_ref().map(ChangeGuard::suppress);
            ui.factory_mut()
                .configure(handle, &[NativeOption::Value(wanted)]);
        }
    }
    ui.factory().value(handle)
}

/// A label under an already qualified identifier.
fn show_label<F: NativeFactory>(ui: &mut Ui<'_, F>, identifier: &str, text: &str) -> Result<()> {
    let declared = ui.declare(
        identifier,
        WidgetKind::Label,
        || vec![NativeOption::Text(text.to_string())],
        || WidgetState::Label {
            text: text.to_string(),
        },
    )?;
    if !declared.created {
        if let WidgetState::Label { text: shown } = ui.state_mut(identifier)? {
            if shown != text {
                *shown = text.to_string();
                ui.factory_mut()
                    .configure(declared.handle, &[NativeOption::Text(text.to_string())]);
            }
        }
    }
    ui.place(identifier, PlaceOptions::default())
}

/// Lays out `body` in a row with the caption `"<identifier>#label"` before
/// or after it.
fn labeled<F: NativeFactory, R>(
    ui: &mut Ui<'_, F>,
    identifier: &str,
    caption: &str,
    position: LabelPosition,
    body: impl FnOnce(&mut Ui<'_, F>) -> Result<R>,
) -> Result<R> {
    let companion = format!("{identifier}#label");
    ui.row(|ui| {
        if !caption.is_empty() && position.is_first() {
            show_label(ui, &companion, caption)?;
        }
        let output = body(ui)?;
        if !caption.is_empty() && !position.is_first() {
            show_label(ui, &companion, caption)?;
        }
        Ok(output)
    })
}

/// Reconfigures the range of a spin box or slider when it changed.
fn sync_range<F: NativeFactory>(
    ui: &mut Ui<'_, F>,
    identifier: &str,
    handle: NativeHandle,
    wanted: (f64, f64),
) -> Result<()> {
    let range = match ui.state_mut(identifier)? {
        WidgetState::SpinBox { range, .. } | WidgetState::Slider { range, .. } => range,
        _ => return Ok(()),
    };
    if *range != wanted {
        *range = wanted;
        ui.factory_mut().configure(
            handle,
            &[NativeOption::Range {
                min: wanted.0,
                max: wanted.1,
            }],
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Numbers
// ─────────────────────────────────────────────────────────────────────────────

/// Value types of spin boxes and sliders.
pub trait Numeric: Copy + PartialEq + fmt::Debug {
    const DEFAULT_STEP: f64;
    /// Digits after the decimal point, `None` for integers.
    const DECIMALS: Option<u8>;

    fn to_value(self) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
    fn to_f64(self) -> f64;
}

impl Numeric for i64 {
    const DEFAULT_STEP: f64 = 1.0;
    const DECIMALS: Option<u8> = None;

    fn to_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Numeric for f64 {
    const DEFAULT_STEP: f64 = 0.1;
    const DECIMALS: Option<u8> = Some(3);

    fn to_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn to_f64(self) -> f64 {
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

/// Static text. The text doubles as identifier unless one is given.
#[derive(Debug, Clone)]
pub struct Text {
    text: String,
    identifier: Option<String>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            identifier: None,
        }
    }

    /// Keeps the widget's identity while its text changes.
    pub fn id(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

impl Widget for Text {
    type Output = ();

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<()> {
        let identifier = ui.identifier(self.identifier.as_deref().unwrap_or(&self.text));
        show_label(ui, &identifier, &self.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Button
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    common: Common,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            common: Common::default(),
        }
    }

    common_setters!();
}

impl Widget for Button {
    /// Whether the button was pressed.
    type Output = bool;

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<bool> {
        let identifier = ui.identifier(&self.label);
        let text = display_text(&self.label).to_string();
        let common = self.common;
        ui.declare(
            &identifier,
            WidgetKind::Button,
            || {
                let mut options = vec![NativeOption::Text(text)];
                options.extend(common.options());
                options
            },
            || WidgetState::Button,
        )?;
        ui.place(&identifier, PlaceOptions::default())?;
        Ok(ui.is_active(&identifier))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Checkbox
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Checkbox {
    label: String,
    checked: bool,
    common: Common,
}

impl Checkbox {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
            common: Common::default(),
        }
    }

    common_setters!();
}

impl Widget for Checkbox {
    type Output = (bool, bool);

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<(bool, bool)> {
        let identifier = ui.identifier(&self.label);
        let text = display_text(&self.label).to_string();
        let checked = self.checked;
        let common = self.common;
        let declared = ui.declare(
            &identifier,
            WidgetKind::Checkbutton,
            || {
                let mut options = vec![
                    NativeOption::Text(text),
                    NativeOption::Value(Value::Bool(checked)),
                ];
                options.extend(common.options());
                options
            },
            || WidgetState::Checkbox {
                guard: ChangeGuard::new(),
            },
        )?;
        let value = sync_value(ui, &identifier, declared.handle, Value::Bool(checked), |v| {
            v.as_bool() == Some(checked)
        });
        ui.place(&identifier, PlaceOptions::default())?;

        let checked = value.and_then(|v| v.as_bool()).unwrap_or(checked);
        Ok((ui.is_active(&identifier), checked))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text input
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TextInput {
    label: String,
    text: String,
    position: LabelPosition,
    common: Common,
}

impl TextInput {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            position: LabelPosition::default(),
            common: Common::default(),
        }
    }

    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.position = position;
        self
    }

    common_setters!();
}

impl Widget for TextInput {
    type Output = (bool, String);

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<(bool, String)> {
        let identifier = ui.identifier(&self.label);
        let caption = display_text(&self.label).to_string();
        let TextInput {
            text,
            position,
            common,
            ..
        } = self;

        labeled(ui, &identifier, &caption, position, |ui| {
            let initial = text.clone();
            let declared = ui.declare(
                &identifier,
                WidgetKind::Entry,
                || {
                    let mut options = vec![NativeOption::Value(Value::Text(initial))];
                    options.extend(common.options());
                    options
                },
                || WidgetState::TextInput {
                    guard: ChangeGuard::new(),
                },
            )?;
            let value = sync_value(
                ui,
                &identifier,
                declared.handle,
                Value::Text(text.clone()),
                |v| v.as_text() == text,
            );
            ui.place(&identifier, PlaceOptions::default())?;

            let text = value.map(|v| v.as_text()).unwrap_or(text);
            Ok((ui.is_active(&identifier), text))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spin box and slider
// ─────────────────────────────────────────────────────────────────────────────

/// Numeric entry with step arrows.
#[derive(Debug, Clone)]
pub struct SpinBox<T: Numeric> {
    label: String,
    value: T,
    range: RangeInclusive<T>,
    step: f64,
    decimals: Option<u8>,
    position: LabelPosition,
    common: Common,
}

impl<T: Numeric> SpinBox<T> {
    pub fn new(label: impl Into<String>, value: T, range: RangeInclusive<T>) -> Self {
        Self {
            label: label.into(),
            value,
            range,
            step: T::DEFAULT_STEP,
            decimals: T::DECIMALS,
            position: LabelPosition::default(),
            common: Common::default(),
        }
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Digits shown after the decimal point.
    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.position = position;
        self
    }

    common_setters!();
}

impl<T: Numeric> Widget for SpinBox<T> {
    type Output = (bool, T);

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<(bool, T)> {
        let identifier = ui.identifier(&self.label);
        let caption = display_text(&self.label).to_string();
        let range = (self.range.start().to_f64(), self.range.end().to_f64());
        let SpinBox {
            value,
            step,
            decimals,
            position,
            common,
            ..
        } = self;

        labeled(ui, &identifier, &caption, position, |ui| {
            let declared = ui.declare(
                &identifier,
                WidgetKind::Spinbox,
                || {
                    let mut options = vec![
                        NativeOption::Range {
                            min: range.0,
                            max: range.1,
                        },
                        NativeOption::Step(step),
                    ];
                    options.extend(decimals.map(NativeOption::Decimals));
                    options.push(NativeOption::Value(value.to_value()));
                    options.extend(common.options());
                    options
                },
                || WidgetState::SpinBox {
                    guard: ChangeGuard::new(),
                    range,
                },
            )?;
            sync_range(ui, &identifier, declared.handle, range)?;
            let current = sync_value(ui, &identifier, declared.handle, value.to_value(), |v| {
                T::from_value(v) == Some(value)
            });
            ui.place(&identifier, PlaceOptions::default())?;

            // Text the user typed that does not parse keeps the application value
            let value = current.as_ref().and_then(T::from_value).unwrap_or(value);
            Ok((ui.is_active(&identifier), value))
        })
    }
}

/// Draggable scale between two bounds.
#[derive(Debug, Clone)]
pub struct Slider<T: Numeric> {
    label: String,
    value: T,
    range: RangeInclusive<T>,
    position: LabelPosition,
    common: Common,
}

impl<T: Numeric> Slider<T> {
    pub fn new(label: impl Into<String>, value: T, range: RangeInclusive<T>) -> Self {
        Self {
            label: label.into(),
            value,
            range,
            position: LabelPosition::default(),
            common: Common::default(),
        }
    }

    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.position = position;
        self
    }

    common_setters!();
}

impl<T: Numeric> Widget for Slider<T> {
    type Output = (bool, T);

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<(bool, T)> {
        let identifier = ui.identifier(&self.label);
        let caption = display_text(&self.label).to_string();
        let range = (self.range.start().to_f64(), self.range.end().to_f64());
        let Slider {
            value,
            position,
            common,
            ..
        } = self;

        labeled(ui, &identifier, &caption, position, |ui| {
            let declared = ui.declare(
                &identifier,
                WidgetKind::Scale,
                || {
                    let mut options = vec![
                        NativeOption::Range {
                            min: range.0,
                            max: range.1,
                        },
                        NativeOption::Value(value.to_value()),
                    ];
                    options.extend(common.options());
                    options
                },
                || WidgetState::Slider {
                    guard: ChangeGuard::new(),
                    range,
                },
            )?;
            sync_range(ui, &identifier, declared.handle, range)?;
            let current = sync_value(ui, &identifier, declared.handle, value.to_value(), |v| {
                T::from_value(v) == Some(value)
            });
            ui.place(&identifier, PlaceOptions::default())?;

            let value = current.as_ref().and_then(T::from_value).unwrap_or(value);
            Ok((ui.is_active(&identifier), value))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Combo box
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only choice list.
#[derive(Debug, Clone)]
pub struct ComboBox {
    label: String,
    index: usize,
    choices: Vec<String>,
    position: LabelPosition,
    common: Common,
}

impl ComboBox {
    pub fn new<S: AsRef<str>>(label: impl Into<String>, index: usize, choices: &[S]) -> Self {
        Self {
            label: label.into(),
            index,
            choices: choices.iter().map(|c| c.as_ref().to_string()).collect(),
            position: LabelPosition::default(),
            common: Common::default(),
        }
    }

    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.position = position;
        self
    }

    common_setters!();
}

impl Widget for ComboBox {
    /// Whether the selection changed, and the selected index.
    type Output = (bool, usize);

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<(bool, usize)> {
        let identifier = ui.identifier(&self.label);
        let caption = display_text(&self.label).to_string();
        let ComboBox {
            index,
            choices,
            position,
            common,
            ..
        } = self;

        labeled(ui, &identifier, &caption, position, |ui| {
            let initial = choices.clone();
            let declared = ui.declare(
                &identifier,
                WidgetKind::Combobox,
                || {
                    let mut options = vec![
                        NativeOption::Choices(choices.clone()),
                        NativeOption::Value(Value::Index(index)),
                    ];
                    options.extend(common.options());
                    options
                },
                || WidgetState::ComboBox {
                    guard: ChangeGuard::new(),
                    choices: initial,
                },
            )?;

            if let WidgetState::ComboBox { choices: shown, .. } = ui.state_mut(&identifier)? {
                if *shown != choices {
                    *shown = choices.clone();
                    ui.factory_mut()
                        .configure(declared.handle, &[NativeOption::Choices(choices)]);
                }
            }
            let current = sync_value(ui, &identifier, declared.handle, Value::Index(index), |v| {
                v.as_index() == Some(index)
            });
            ui.place(&identifier, PlaceOptions::default())?;

            let index = current.and_then(|v| v.as_index()).unwrap_or(index);
            Ok((ui.is_active(&identifier), index))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress bar
// ─────────────────────────────────────────────────────────────────────────────

/// Shows `value` as a share of its range. Never reports interaction.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    label: String,
    value: f64,
    range: RangeInclusive<f64>,
    show_progress: bool,
    position: LabelPosition,
    common: Common,
}

impl ProgressBar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            range: 0.0..=1.0,
            show_progress: false,
            position: LabelPosition::default(),
            common: Common::default(),
        }
    }

    pub fn range(mut self, range: RangeInclusive<f64>) -> Self {
        self.range = range;
        self
    }

    /// Adds an `NN%` text next to the bar.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.position = position;
        self
    }

    common_setters!();

    /// Whole percent of the range covered by the value, clamped to `0..=100`.
    pub fn percent(&self) -> u8 {
        let (min, max) = (*self.range.start(), *self.range.end());
        if max == min || !self.value.is_finite() {
            return 0;
        }
        let t = ((self.value - min) / (max - min)).clamp(0.0, 1.0);
        (t * 100.0) as u8
    }
}

impl Widget for ProgressBar {
    type Output = ();

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<()> {
        let identifier = ui.identifier(&self.label);
        let caption = display_text(&self.label).to_string();
        let companion = format!("{identifier}#label");
        let percent = self.percent();
        let ProgressBar {
            show_progress,
            position,
            common,
            ..
        } = self;

        ui.row(|ui| {
            if !caption.is_empty() && position.is_first() {
                show_label(ui, &companion, &caption)?;
            }

            let declared = ui.declare(
                &identifier,
                WidgetKind::Progressbar,
                || {
                    let mut options = vec![
                        NativeOption::Range {
                            min: 0.0,
                            max: 100.0,
                        },
                        NativeOption::Value(Value::Int(percent as i64)),
                    ];
                    options.extend(common.options());
                    options
                },
                || WidgetState::ProgressBar { percent },
            )?;
            if let WidgetState::ProgressBar { percent: shown } = ui.state_mut(&identifier)? {
                if *shown != percent {
                    *shown = percent;
                    ui.factory_mut().configure(
                        declared.handle,
                        &[NativeOption::Value(Value::Int(percent as i64))],
                    );
                }
            }
            ui.place(&identifier, PlaceOptions::default())?;

            if show_progress {
                show_label(ui, &format!("{identifier}#progress"), &format!("{percent}%"))?;
            }
            if !caption.is_empty() && !position.is_first() {
                show_label(ui, &companion, &caption)?;
            }
            Ok(())
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Separator
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Separator {
    identifier: String,
    relwidth: f32,
    common: Common,
}

impl Separator {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            relwidth: DEFAULT_RELWIDTH,
            common: Common::default(),
        }
    }

    /// Share of the viewport width used when no explicit width is set.
    pub fn relwidth(mut self, relwidth: f32) -> Self {
        self.relwidth = relwidth;
        self
    }

    common_setters!();
}

impl Widget for Separator {
    type Output = ();

    fn show<F: NativeFactory>(self, ui: &mut Ui<'_, F>) -> Result<()> {
        if !(0.0..=1.0).contains(&self.relwidth) {
            return Err(ImError::InvalidOption {
                option: "separator relwidth",
                value: self.relwidth.to_string(),
            }
            .into());
        }
        let identifier = ui.identifier(&self.identifier);
        let width = self
            .common
            .width
            .unwrap_or_else(|| (ui.viewport().width as f32 * self.relwidth).round() as u16);
        let style = self.common.style;

        ui.declare(
            &identifier,
            WidgetKind::Separator,
            || style.map(NativeOption::Style).into_iter().collect(),
            || WidgetState::Separator,
        )?;
        ui.place(&identifier, PlaceOptions { width: Some(width) })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shorthands
// ─────────────────────────────────────────────────────────────────────────────

impl<F: NativeFactory> Ui<'_, F> {
    pub fn add<W: Widget>(&mut self, widget: W) -> Result<W::Output> {
        widget.show(self)
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        self.add(Text::new(text))
    }

    pub fn text_with_id(&mut self, text: &str, identifier: &str) -> Result<()> {
        self.add(Text::new(text).id(identifier))
    }

    /// Whether the button was pressed.
    pub fn button(&mut self, label: &str) -> Result<bool> {
        self.add(Button::new(label))
    }

    pub fn checkbox(&mut self, label: &str, checked: bool) -> Result<(bool, bool)> {
        self.add(Checkbox::new(label, checked))
    }

    pub fn input_text(&mut self, label: &str, text: &str) -> Result<(bool, String)> {
        self.add(TextInput::new(label, text))
    }

    pub fn input_int(
        &mut self,
        label: &str,
        value: i64,
        range: RangeInclusive<i64>,
    ) -> Result<(bool, i64)> {
        self.add(SpinBox::new(label, value, range))
    }

    pub fn input_float(
        &mut self,
        label: &str,
        value: f64,
        range: RangeInclusive<f64>,
    ) -> Result<(bool, f64)> {
        self.add(SpinBox::new(label, value, range))
    }

    pub fn int_slider(
        &mut self,
        label: &str,
        value: i64,
        range: RangeInclusive<i64>,
    ) -> Result<(bool, i64)> {
        self.add(Slider::new(label, value, range))
    }

    pub fn float_slider(
        &mut self,
        label: &str,
        value: f64,
        range: RangeInclusive<f64>,
    ) -> Result<(bool, f64)> {
        self.add(Slider::new(label, value, range))
    }

    pub fn combo_box<S: AsRef<str>>(
        &mut self,
        label: &str,
        index: usize,
        choices: &[S],
    ) -> Result<(bool, usize)> {
        self.add(ComboBox::new(label, index, choices))
    }

    pub fn progress_bar(&mut self, label: &str, value: f64, range: RangeInclusive<f64>) -> Result<()> {
        self.add(ProgressBar::new(label, value).range(range))
    }

    pub fn horizontal_separator(&mut self, identifier: &str) -> Result<()> {
        self.add(Separator::new(identifier))
    }
}
