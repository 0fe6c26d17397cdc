//! The refresh orchestrator.
//!
//! A [`Context`] owns the identity store, the cursor and namespace stacks and
//! a native factory. Every refresh runs the application's draw callback with
//! a [`Ui`] handle, then reconciles: widgets that were not declared again are
//! destroyed and the content area is resized to what was laid out.

use std::time::Instant;

use anyhow::Result;
use tracing::{debug, trace, warn};

use crate::config::{Config, LayoutConfig, RefreshPolicy};
use crate::cursor::Cursor;
use crate::error::ImError;
use crate::namespace::NamespaceStack;
use crate::native::{NativeFactory, NativeHandle, Size};
use crate::scroll::ScrollState;
use crate::signal::{ActivationGuard, ActiveSignal, next_context_id};
use crate::store::{IdentityStore, WidgetRecord};
use crate::ui::Ui;

/// Upper bound of passes per refresh: the initial one plus one corrective.
pub const MAX_PASSES: u32 = 2;

/// What one call to [`Context::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    pub passes: u32,
    pub created: usize,
    pub destroyed: usize,
}

pub struct Context<F: NativeFactory> {
    id: u64,
    pub(crate) factory: F,
    pub(crate) store: IdentityStore,
    pub(crate) cursors: Vec<Cursor>,
    pub(crate) namespaces: NamespaceStack,
    pub(crate) signal: ActiveSignal,
    pub(crate) layout: LayoutConfig,
    pub(crate) repaint_requested: bool,
    pub(crate) pass: u64,
    pub(crate) created: usize,
    policy: RefreshPolicy,
    scroll: ScrollState,
    content: Size,
    /// Next loop-mode refresh
    deadline: Option<Instant>,
    destroyed: usize,
}

impl<F: NativeFactory> Context<F> {
    pub fn new(factory: F, config: &Config) -> Self {
        Self {
            id: next_context_id(),
            factory,
            store: IdentityStore::new(),
            cursors: Vec::new(),
            namespaces: NamespaceStack::new(),
            signal: ActiveSignal::new(),
            layout: config.layout,
            repaint_requested: false,
            pass: 0,
            created: 0,
            policy: config.refresh,
            scroll: ScrollState::new(),
            content: Size::default(),
            deadline: None,
            destroyed: 0,
        }
    }

    /// A context with default layout and the given refresh policy.
    pub fn with_policy(factory: F, policy: RefreshPolicy) -> Self {
        let config = Config {
            refresh: policy,
            ..Config::default()
        };
        Self::new(factory, &config)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Number of passes run so far, corrective passes included.
    pub fn pass_count(&self) -> u64 {
        self.pass
    }

    pub fn record(&self, identifier: &str) -> Option<&WidgetRecord> {
        self.store.get(identifier)
    }

    pub fn records(&self) -> impl Iterator<Item = &WidgetRecord> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Size of the content laid out by the last complete pass.
    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// The activation waiting for the next refresh.
    pub fn pending_activation(&self) -> Option<String> {
        self.signal.current()
    }

    /// Runs the draw callback and reconciles the native widgets with what it
    /// declared, with at most one corrective pass.
    pub fn refresh<D>(&mut self, draw: &mut D) -> Result<RefreshReport>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        self.deadline = None;
        let created_before = self.created;
        let destroyed_before = self.destroyed;

        let mut report = RefreshReport::default();
        loop {
            let rerun = self.run_pass(draw)?;
            report.passes += 1;
            if !rerun || report.passes >= MAX_PASSES {
                break;
            }
            debug!("running corrective pass");
        }
        report.created = self.created - created_before;
        report.destroyed = self.destroyed - destroyed_before;

        if let RefreshPolicy::Loop { interval } = self.policy {
            self.deadline = Some(Instant::now() + interval);
        }
        debug!(
            "refresh done: {} pass(es), {} created, {} destroyed, {} alive",
            report.passes,
            report.created,
            report.destroyed,
            self.store.len()
        );
        Ok(report)
    }

    /// One declare, place and reconcile pass. Returns whether a corrective
    /// pass is wanted.
    fn run_pass<D>(&mut self, draw: &mut D) -> Result<bool>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        if !self.cursors.is_empty() {
            return Err(ImError::CursorStackCorrupted {
                depth: self.cursors.len(),
            }
            .into());
        }
        let _active = ActivationGuard::acquire(self.id)?;

        self.pass += 1;
        self.repaint_requested = false;
        let active = self.signal.current();
        trace!("pass {} starting, active = {:?}", self.pass, active);
        self.cursors.push(Cursor::new(self.layout.padding));

        let drawn = {
            let mut ui = Ui::new(self, active);
            draw(&mut ui)
        };
        let root = match drawn.and_then(|()| self.close_root()) {
            Ok(root) => root,
            Err(err) => {
                self.abort_pass();
                return Err(err);
            }
        };

        self.sweep();
        self.apply_content_size(root.size());
        self.store.reset_drawn();

        let activated = self.signal.take().is_some();
        Ok((activated && self.policy.is_callback()) || self.repaint_requested)
    }

    fn close_root(&mut self) -> Result<Cursor> {
        if self.cursors.len() != 1 {
            return Err(ImError::CursorStackCorrupted {
                depth: self.cursors.len(),
            }
            .into());
        }
        let root = self.cursors.pop().ok_or(ImError::NoActiveCursor)?;
        self.namespaces.ensure_balanced()?;
        Ok(root)
    }

    /// Drops everything the failed pass left behind without committing it.
    fn abort_pass(&mut self) {
        warn!(
            "pass {} aborted with {} cursor(s) and {} namespace(s) open",
            self.pass,
            self.cursors.len(),
            self.namespaces.depth()
        );
        self.cursors.clear();
        self.namespaces.truncate(0);
        self.store.reset_drawn();
        self.signal.take();
        self.repaint_requested = false;
    }

    fn sweep(&mut self) {
        let undrawn = self.store.evict_undrawn();
        self.destroy_records(undrawn);
    }

    /// Destroys the native widgets of records already evicted from the
    /// store. Records nested below one of them lose their native widget along
    /// with the container, so they are evicted as well and a corrective pass
    /// recreates any that are still declared.
    pub(crate) fn destroy_records(&mut self, records: Vec<WidgetRecord>) {
        let gone: Vec<NativeHandle> = records.iter().map(WidgetRecord::handle).collect();
        for record in &records {
            // goes down with its container
            if record.parent().is_some_and(|p| gone.contains(&p)) {
                continue;
            }
            trace!("destroying {:?} ({})", record.identifier(), record.handle());
            self.factory.destroy(record.handle());
        }
        self.destroyed += records.len();

        let orphans = self.store.evict_descendants(&gone);
        if !orphans.is_empty() {
            warn!(
                "{} widget(s) destroyed with their container, scheduling a corrective pass",
                orphans.len()
            );
            self.destroyed += orphans.len();
            self.repaint_requested = true;
        }
    }

    fn apply_content_size(&mut self, size: Size) {
        if size != self.content {
            self.factory.resize_content(size);
            self.content = size;
        }
        let viewport = self.factory.viewport();
        self.scroll.update_dimensions(size.height, viewport.height);
        self.factory.update_scrollbar(self.scroll.geometry());
        self.factory.scroll_content(self.scroll.offset());
    }

    /// Raises an activation as if `identifier`'s native widget fired, and
    /// refreshes right away in callback mode.
    pub fn activate<D>(&mut self, identifier: &str, draw: &mut D) -> Result<Option<RefreshReport>>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        self.signal.raise(identifier);
        self.settle(draw)
    }

    /// Delivers a native event through `deliver`, which may fire widget
    /// callbacks, then refreshes in callback mode if one of them activated.
    pub fn dispatch<D, R>(
        &mut self,
        draw: &mut D,
        deliver: impl FnOnce(&mut F) -> R,
    ) -> Result<(R, Option<RefreshReport>)>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        let output = deliver(&mut self.factory);
        let report = self.settle(draw)?;
        Ok((output, report))
    }

    fn settle<D>(&mut self, draw: &mut D) -> Result<Option<RefreshReport>>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        if self.signal.is_pending() && self.policy.is_callback() {
            return self.refresh(draw).map(Some);
        }
        Ok(None)
    }

    /// Installs a new policy, cancelling any scheduled refresh, and
    /// refreshes.
    pub fn set_refresh_policy<D>(&mut self, policy: RefreshPolicy, draw: &mut D) -> Result<RefreshReport>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        debug!("refresh policy {} -> {}", self.policy, policy);
        self.deadline = None;
        self.policy = policy;
        self.refresh(draw)
    }

    /// When the next loop-mode refresh is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Runs the scheduled refresh if it is due at `now`.
    pub fn on_timer<D>(&mut self, now: Instant, draw: &mut D) -> Result<Option<RefreshReport>>
    where
        D: FnMut(&mut Ui<'_, F>) -> Result<()>,
    {
        match self.deadline {
            Some(deadline) if now >= deadline => self.refresh(draw).map(Some),
            _ => Ok(None),
        }
    }

    /// Scrolls the content vertically, clamped to the content height.
    pub fn scroll_by(&mut self, delta: i32) {
        let viewport = self.factory.viewport();
        self.scroll
            .update_dimensions(self.content.height, viewport.height);
        self.scroll.scroll_by(delta);
        self.factory.update_scrollbar(self.scroll.geometry());
        self.factory.scroll_content(self.scroll.offset());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::im_error;
    use crate::native::HeadlessToolkit;

    fn context() -> Context<HeadlessToolkit> {
        Context::new(HeadlessToolkit::new(Size::new(400, 300)), &Config::default())
    }

    #[test]
    fn test_empty_draw_lays_out_nothing() {
        let mut ctx = context();
        let report = ctx.refresh(&mut |_ui| Ok(())).unwrap();
        assert_eq!(report.passes, 1);
        assert!(ctx.is_empty());
        assert_eq!(ctx.pass_count(), 1);
    }

    #[test]
    fn test_draw_error_aborts_without_sweeping() {
        let mut ctx = context();
        ctx.refresh(&mut |ui| ui.button("Keep").map(|_| ())).unwrap();

        let err = ctx
            .refresh(&mut |ui| {
                ui.push_namespace("left-open");
                anyhow::bail!("draw failed")
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "draw failed");
        assert!(ctx.record("Keep").is_some());

        // stacks were reset, so the next refresh is clean
        let report = ctx.refresh(&mut |ui| ui.button("Keep").map(|_| ())).unwrap();
        assert_eq!(report.created, 0);
        assert_eq!(report.destroyed, 0);
    }

    #[test]
    fn test_unbalanced_namespace_is_fatal() {
        let mut ctx = context();
        let err = ctx
            .refresh(&mut |ui| {
                ui.push_namespace("open");
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(
            im_error(&err),
            Some(ImError::NamespaceCorrupted { .. })
        ));
    }

    #[test]
    fn test_loop_policy_schedules_and_switching_cancels() {
        let mut ctx = context();
        let mut draw = |_ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> { Ok(()) };
        ctx.set_refresh_policy(RefreshPolicy::loop_every(10), &mut draw)
            .unwrap();
        let deadline = ctx.next_deadline().unwrap();

        let early = ctx.on_timer(deadline - Duration::from_millis(5), &mut draw).unwrap();
        assert!(early.is_none());
        let due = ctx.on_timer(deadline, &mut draw).unwrap();
        assert_eq!(due.map(|r| r.passes), Some(1));
        assert!(ctx.next_deadline().unwrap() >= deadline);

        ctx.set_refresh_policy(RefreshPolicy::Callback, &mut draw)
            .unwrap();
        assert!(ctx.next_deadline().is_none());
    }

    #[test]
    fn test_activation_waits_for_timer_in_loop_mode() {
        let mut config = Config::default();
        config.refresh = RefreshPolicy::loop_every(10);
        let mut ctx = Context::new(HeadlessToolkit::new(Size::new(400, 300)), &config);
        let mut clicks = 0;
        let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
            if ui.button("Go")? {
                clicks += 1;
            }
            Ok(())
        };
        ctx.refresh(&mut draw).unwrap();
        assert!(ctx.activate("Go", &mut draw).unwrap().is_none());
        assert_eq!(ctx.pending_activation().as_deref(), Some("Go"));

        let deadline = ctx.next_deadline().unwrap();
        let report = ctx.on_timer(deadline, &mut draw).unwrap().unwrap();
        assert_eq!(report.passes, 1);
        assert!(ctx.pending_activation().is_none());
        drop(draw);
        assert_eq!(clicks, 1);
    }
}
