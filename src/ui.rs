//! The handle a draw callback declares widgets through.

use anyhow::{Result, anyhow};
use tracing::{trace, warn};

use crate::context::Context;
use crate::cursor::Cursor;
use crate::error::ImError;
use crate::native::{NativeFactory, NativeHandle, NativeOption, PlaceOptions, Size, WidgetKind};
use crate::signal::ChangeGuard;
use crate::store::{WidgetRecord, WidgetState};

/// Separates the displayed part of a label from the part that only
/// disambiguates the identifier.
pub const LABEL_SEPARATOR: char = '#';

/// The text shown for `label`: everything before the first `#`.
pub fn display_text(label: &str) -> &str {
    label.split(LABEL_SEPARATOR).next().unwrap_or_default()
}

/// Proof that a frame scope was opened; hand it back to [`Ui::end_frame`].
#[derive(Debug)]
#[must_use = "a frame must be ended with Ui::end_frame"]
pub struct FrameToken {
    identifier: String,
    depth: usize,
}

impl FrameToken {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Result of looking up or creating a record.
pub(crate) struct Declared {
    pub handle: NativeHandle,
    pub created: bool,
}

/// Explicit handle to the context during one refresh pass.
pub struct Ui<'a, F: NativeFactory> {
    ctx: &'a mut Context<F>,
    active: Option<String>,
}

impl<'a, F: NativeFactory> Ui<'a, F> {
    pub(crate) fn new(ctx: &'a mut Context<F>, active: Option<String>) -> Self {
        Self { ctx, active }
    }

    /// Qualifies a raw label with the open namespaces.
    pub fn identifier(&self, label: &str) -> String {
        self.ctx.namespaces.qualify(label)
    }

    /// The identifier whose native event triggered this pass.
    pub fn active_identifier(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, identifier: &str) -> bool {
        self.active.as_deref() == Some(identifier)
    }

    pub fn record(&self, identifier: &str) -> Option<&WidgetRecord> {
        self.ctx.store.get(identifier)
    }

    pub fn factory(&self) -> &F {
        &self.ctx.factory
    }

    pub fn viewport(&self) -> Size {
        self.ctx.factory.viewport()
    }

    /// The refresh pass this handle belongs to.
    pub fn pass(&self) -> u64 {
        self.ctx.pass
    }

    /// Asks for one more pass once this one completes.
    pub fn request_repaint(&mut self) {
        self.ctx.repaint_requested = true;
    }

    pub fn cursor(&self) -> Result<&Cursor> {
        Ok(self.ctx.cursors.last().ok_or(ImError::NoActiveCursor)?)
    }

    fn cursor_mut(&mut self) -> Result<&mut Cursor> {
        Ok(self.ctx.cursors.last_mut().ok_or(ImError::NoActiveCursor)?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    /// Looks up the record for `identifier`, creating its native widget on a
    /// miss, and marks it drawn and active for this pass.
    pub(crate) fn declare(
        &mut self,
        identifier: &str,
        kind: WidgetKind,
        options: impl FnOnce() -> Vec<NativeOption>,
        state: impl FnOnce() -> WidgetState,
    ) -> Result<Declared> {
        let ctx = &mut *self.ctx;
        let mut created = false;
        let parent = match ctx.cursors.last().and_then(Cursor::frame) {
            Some(frame) => ctx.store.get(frame).map(WidgetRecord::handle),
            None => None,
        };

        let stale = match ctx.store.get(identifier) {
            Some(record) if record.kind() != kind => {
                warn!(
                    "{identifier:?} redeclared as {} (was {}), recreating",
                    kind.as_str(),
                    record.kind().as_str()
                );
                true
            }
            Some(record) if record.parent() != parent => {
                warn!("{identifier:?} moved to another container, recreating");
                true
            }
            Some(record) => {
                if record.is_drawn() {
                    warn!("{identifier:?} declared more than once in pass {}", ctx.pass);
                }
                false
            }
            None => false,
        };
        if stale {
            if let Some(old) = ctx.store.evict(identifier) {
                ctx.destroy_records(vec![old]);
            }
        }

        if !ctx.store.contains(identifier) {
            if !ctx.factory.supports(kind) {
                return Err(ImError::UnknownWidgetKind {
                    kind: kind.as_str(),
                }
                .into());
            }
            let handle = ctx.factory.create(kind, parent, &options());
            let state = state();
            let callback = match (&state, kind) {
                (_, WidgetKind::Button) => Some(ChangeGuard::new().callback(&ctx.signal, identifier)),
                (state, _) => state
                    .guard()
                    .map(|guard| guard.callback(&ctx.signal, identifier)),
            };
            if let Some(callback) = callback {
                ctx.factory.subscribe(handle, callback);
            }
            trace!("created {} {identifier:?} as {handle}", kind.as_str());
            ctx.store.insert(WidgetRecord::new(
                identifier.to_string(),
                handle,
                kind,
                parent,
                state,
                ctx.pass,
            ));
            ctx.created += 1;
            created = true;
        }

        let active = self.active.as_deref() == Some(identifier);
        let record = self
            .ctx
            .store
            .get_mut(identifier)
            .ok_or_else(|| anyhow!("record {identifier:?} vanished"))?;
        record.is_drawn = true;
        record.is_active = active;
        Ok(Declared {
            handle: record.handle(),
            created,
        })
    }

    pub(crate) fn state_mut(&mut self, identifier: &str) -> Result<&mut WidgetState> {
        self.ctx
            .store
            .get_mut(identifier)
            .map(|record| &mut record.state)
            .ok_or_else(|| anyhow!("no widget record for {identifier:?}"))
    }

    pub(crate) fn factory_mut(&mut self) -> &mut F {
        &mut self.ctx.factory
    }

    /// Hands a declared widget to the current cursor.
    pub(crate) fn place(&mut self, identifier: &str, extras: PlaceOptions) -> Result<()> {
        let ctx = &mut *self.ctx;
        let record = ctx
            .store
            .get_mut(identifier)
            .ok_or_else(|| anyhow!("no widget record for {identifier:?}"))?;
        let cursor = ctx.cursors.last_mut().ok_or(ImError::NoActiveCursor)?;

        let mut size = ctx.factory.requested_size(record.handle());
        if let Some(width) = extras.width {
            size.width = width;
        }
        let at = cursor.advance(size);

        record.is_new = false;
        if record.placement != Some((at, extras)) {
            trace!("placing {identifier:?} at ({}, {})", at.x, at.y);
            ctx.factory.place(record.handle(), at, &extras);
            record.placement = Some((at, extras));
        }
        record.is_drawn = true;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Scopes
    // ─────────────────────────────────────────────────────────────────────

    pub fn push_namespace(&mut self, name: &str) {
        self.ctx.namespaces.push(name);
    }

    /// Pops the innermost namespace, which must be `name`.
    pub fn pop_namespace(&mut self, name: &str) -> Result<()> {
        Ok(self.ctx.namespaces.pop(name)?)
    }

    /// Runs `body` with `name` prefixed to every identifier. The namespace is
    /// closed again even when `body` fails.
    pub fn namespace<R>(&mut self, name: &str, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let depth = self.ctx.namespaces.depth();
        self.ctx.namespaces.push(name);
        let output = body(self);
        let closed = if self.ctx.namespaces.depth() == depth + 1 {
            self.ctx.namespaces.pop(name)
        } else {
            Err(ImError::NamespaceCorrupted {
                expected: Some(name.to_string()),
                found: None,
            })
        };
        self.ctx.namespaces.truncate(depth);
        let output = output?;
        closed?;
        Ok(output)
    }

    /// The next widget joins the current row.
    pub fn same_row(&mut self) -> Result<()> {
        self.cursor_mut()?.same_row();
        Ok(())
    }

    /// Every widget declared in `body` shares one row.
    pub fn row<R>(&mut self, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let depth = self.ctx.cursors.len();
        let previous = self.cursor_mut()?.enter_row();
        let output = body(self);
        if self.ctx.cursors.len() == depth {
            self.cursor_mut()?.exit_row(previous);
        }
        output
    }

    /// Opens a plain frame: widgets declared until the matching
    /// [`Ui::end_frame`] are laid out inside it.
    pub fn begin_frame(&mut self, identifier: &str) -> Result<FrameToken> {
        self.begin_container(identifier, false)
    }

    /// Like [`Ui::begin_frame`] with a titled border showing `label`.
    pub fn begin_labelframe(&mut self, label: &str) -> Result<FrameToken> {
        self.begin_container(label, true)
    }

    fn begin_container(&mut self, label: &str, titled: bool) -> Result<FrameToken> {
        let identifier = self.identifier(label);
        let (kind, options) = if titled {
            (
                WidgetKind::LabelFrame,
                vec![NativeOption::Text(display_text(label).to_string())],
            )
        } else {
            (WidgetKind::Frame, Vec::new())
        };
        self.declare(&identifier, kind, || options, || WidgetState::Frame {
            titled,
            size: None,
        })?;

        let depth = self.ctx.cursors.len();
        if depth == 0 {
            return Err(ImError::NoActiveCursor.into());
        }
        let extra = if titled {
            self.ctx.layout.labelframe_padding
        } else {
            0
        };
        self.ctx.cursors.push(Cursor::for_frame(
            self.ctx.layout.padding,
            identifier.clone(),
            extra,
        ));
        Ok(FrameToken { identifier, depth })
    }

    /// Closes a frame: sizes it to fit its children and places it in the
    /// enclosing cursor.
    pub fn end_frame(&mut self, token: FrameToken) -> Result<()> {
        let depth = self.ctx.cursors.len();
        let on_top = self
            .ctx
            .cursors
            .last()
            .is_some_and(|c| c.frame() == Some(token.identifier.as_str()));
        if depth != token.depth + 1 || !on_top {
            return Err(ImError::CursorStackCorrupted { depth }.into());
        }
        let cursor = self.ctx.cursors.pop().ok_or(ImError::NoActiveCursor)?;
        let size = cursor.frame_size();

        let ctx = &mut *self.ctx;
        if let Some(record) = ctx.store.get_mut(&token.identifier) {
            let handle = record.handle();
            if let WidgetState::Frame { size: last, .. } = &mut record.state {
                if *last != Some(size) {
                    ctx.factory.resize(handle, size);
                    *last = Some(size);
                }
            }
        }
        self.place(&token.identifier, PlaceOptions::default())
    }

    pub fn frame<R>(&mut self, identifier: &str, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let token = self.begin_frame(identifier)?;
        let output = body(self)?;
        self.end_frame(token)?;
        Ok(output)
    }

    pub fn labelframe<R>(&mut self, label: &str, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let token = self.begin_labelframe(label)?;
        let output = body(self)?;
        self.end_frame(token)?;
        Ok(output)
    }
}
