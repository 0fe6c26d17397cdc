//! Immediate-mode widgets on top of a retained-mode toolkit.
//!
//! Application code describes its interface from scratch on every refresh
//! through a [`Ui`] handle. A [`Context`] keeps the toolkit's persistent
//! widgets in step with those declarations: it creates widgets the first time
//! they are declared, reuses them afterwards and destroys them once they stop
//! being declared. A native interaction triggers a refresh in which the
//! widget reports the change through its return value.
//!
//! ```no_run
//! use imtui::{Config, Context, HeadlessToolkit, Size};
//!
//! let mut ctx = Context::new(HeadlessToolkit::new(Size::new(400, 300)), &Config::default());
//! let mut checked = false;
//! ctx.refresh(&mut |ui| {
//!     if ui.button("Reset")? {
//!         checked = false;
//!     }
//!     (_, checked) = ui.checkbox("Enabled", checked)?;
//!     Ok(())
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod color;
pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod event;
pub mod logging;
pub mod namespace;
pub mod native;
pub mod scroll;
pub mod signal;
pub mod store;
pub mod tui;
pub mod ui;
pub mod widgets;

pub use config::{Config, LayoutConfig, LoggingConfig, RefreshPolicy};
pub use context::{Context, MAX_PASSES, RefreshReport};
pub use error::{ImError, im_error};
pub use native::{
    HeadlessToolkit, NativeCall, NativeFactory, NativeHandle, Point, Size, Value, WidgetKind,
};
pub use tui::TerminalToolkit;
pub use ui::{FrameToken, Ui};
pub use widgets::{
    Button, Checkbox, ComboBox, LabelPosition, ProgressBar, Separator, Slider, SpinBox, Text,
    TextInput, Widget,
};
