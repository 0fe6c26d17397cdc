//! Reactivity plumbing between native callbacks and refresh passes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::ImError;
use crate::native::InputCallback;

/// Single-slot record of the widget whose native event triggered the next
/// refresh. Not a queue: a second activation before the refresh replaces the
/// first.
#[derive(Debug, Clone, Default)]
pub struct ActiveSignal {
    slot: Rc<RefCell<Option<String>>>,
}

impl ActiveSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self, identifier: &str) {
        let mut slot = self.slot.borrow_mut();
        if let Some(previous) = slot.as_deref() {
            if previous != identifier {
                debug!("activation of {previous:?} replaced by {identifier:?}");
            }
        }
        *slot = Some(identifier.to_string());
    }

    pub fn current(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.borrow().is_some()
    }

    pub fn take(&self) -> Option<String> {
        self.slot.borrow_mut().take()
    }
}

/// Armed unless a programmatic write is in progress. Shared between a
/// widget's typed state and its native callback.
#[derive(Debug, Clone)]
pub struct ChangeGuard {
    armed: Rc<Cell<bool>>,
}

impl Default for ChangeGuard {
    fn default() -> Self {
        Self {
            armed: Rc::new(Cell::new(true)),
        }
    }
}

impl ChangeGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    /// Disarms the guard until the returned scope is dropped.
    pub fn suppress(&self) -> Suppressed<'_> {
        self.armed.set(false);
        Suppressed { guard: self }
    }

    /// The native callback for a widget: raises `identifier` on `signal`
    /// while the guard is armed.
    pub fn callback(&self, signal: &ActiveSignal, identifier: &str) -> InputCallback {
        let armed = self.armed.clone();
        let signal = signal.clone();
        let identifier = identifier.to_string();
        Box::new(move || {
            if armed.get() {
                signal.raise(&identifier);
            }
        })
    }
}

pub struct Suppressed<'a> {
    guard: &'a ChangeGuard,
}

impl Drop for Suppressed<'_> {
    fn drop(&mut self) {
        self.guard.armed.set(true);
    }
}

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_context_id() -> u64 {
    NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)
}

thread_local! {
    static ACTIVE_CONTEXT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Marks one context as the thread's active context for the lifetime of
/// the guard.
#[derive(Debug)]
pub struct ActivationGuard {
    context: u64,
}

impl ActivationGuard {
    pub fn acquire(context: u64) -> Result<Self, ImError> {
        ACTIVE_CONTEXT.with(|active| match active.get() {
            Some(_) => Err(ImError::ReentrantActivation),
            None => {
                active.set(Some(context));
                Ok(Self { context })
            }
        })
    }

    /// The context currently refreshing on this thread.
    pub fn active() -> Option<u64> {
        ACTIVE_CONTEXT.with(Cell::get)
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        ACTIVE_CONTEXT.with(|active| {
            if active.get() == Some(self.context) {
                active.set(None);
            }
        });
    }
}
