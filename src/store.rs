use std::collections::{HashMap, HashSet};

use crate::native::{NativeHandle, PlaceOptions, Point, Size, WidgetKind};
use crate::signal::ChangeGuard;

/// Kind-specific state of a widget, with the cached configuration used to
/// skip redundant native calls.
#[derive(Debug, Clone)]
pub enum WidgetState {
    Label { text: String },
    Button,
    Checkbox { guard: ChangeGuard },
    TextInput { guard: ChangeGuard },
    SpinBox { guard: ChangeGuard, range: (f64, f64) },
    Slider { guard: ChangeGuard, range: (f64, f64) },
    ComboBox { guard: ChangeGuard, choices: Vec<String> },
    ProgressBar { percent: u8 },
    Separator,
    Frame { titled: bool, size: Option<Size> },
}

impl WidgetState {
    pub fn guard(&self) -> Option<&ChangeGuard> {
        match self {
            WidgetState::Checkbox { guard }
            | WidgetState::TextInput { guard }
            | WidgetState::SpinBox { guard, .. }
            | WidgetState::Slider { guard, .. }
            | WidgetState::ComboBox { guard, .. } => Some(guard),
            _ => None,
        }
    }
}

/// One logical widget, alive across refreshes for as long as it keeps being
/// declared.
#[derive(Debug)]
pub struct WidgetRecord {
    identifier: String,
    handle: NativeHandle,
    kind: WidgetKind,
    /// Native container the handle was created in; `None` is the content root
    parent: Option<NativeHandle>,
    pub(crate) placement: Option<(Point, PlaceOptions)>,
    pub(crate) is_new: bool,
    pub(crate) is_drawn: bool,
    pub(crate) is_active: bool,
    created_pass: u64,
    pub(crate) state: WidgetState,
}

impl WidgetRecord {
    pub fn new(
        identifier: String,
        handle: NativeHandle,
        kind: WidgetKind,
        parent: Option<NativeHandle>,
        state: WidgetState,
        created_pass: u64,
    ) -> Self {
        Self {
            identifier,
            handle,
            kind,
            parent,
            placement: None,
            is_new: true,
            is_drawn: false,
            is_active: false,
            created_pass,
            state,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NativeHandle> {
        self.parent
    }

    pub fn position(&self) -> Option<Point> {
        self.placement.map(|(at, _)| at)
    }

    /// True until the widget is placed for the first time.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_drawn(&self) -> bool {
        self.is_drawn
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Refresh pass during which the record was created.
    pub fn created_pass(&self) -> u64 {
        self.created_pass
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }
}

/// Identifier to record map owned by a context.
#[derive(Debug, Default)]
pub struct IdentityStore {
    records: HashMap<String, WidgetRecord>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&WidgetRecord> {
        self.records.get(identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut WidgetRecord> {
        self.records.get_mut(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.records.contains_key(identifier)
    }

    pub fn insert(&mut self, record: WidgetRecord) -> &mut WidgetRecord {
        let identifier = record.identifier.clone();
        self.records.entry(identifier).insert_entry(record).into_mut()
    }

    pub fn evict(&mut self, identifier: &str) -> Option<WidgetRecord> {
        self.records.remove(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetRecord> {
        self.records.values()
    }

    /// Removes every record that was not drawn this pass. Containers come
    /// last so their children are released before them.
    pub fn evict_undrawn(&mut self) -> Vec<WidgetRecord> {
        let stale: Vec<String> = self
            .records
            .values()
            .filter(|r| !r.is_drawn)
            .map(|r| r.identifier.clone())
            .collect();
        let mut evicted: Vec<WidgetRecord> = stale
            .iter()
            .filter_map(|id| self.records.remove(id))
            .collect();
        evicted.sort_by_key(|r| r.kind.is_container());
        evicted
    }

    /// Removes every record whose native widget lives somewhere below one of
    /// `destroyed`. Destroying a container takes its native descendants with
    /// it, so these records point at dead handles.
    pub fn evict_descendants(&mut self, destroyed: &[NativeHandle]) -> Vec<WidgetRecord> {
        let mut dead: HashSet<NativeHandle> = destroyed.iter().copied().collect();
        let mut evicted = Vec::new();
        loop {
            let below: Vec<String> = self
                .records
                .values()
                .filter(|r| r.parent.is_some_and(|p| dead.contains(&p)))
                .map(|r| r.identifier.clone())
                .collect();
            if below.is_empty() {
                return evicted;
            }
            for id in below {
                if let Some(record) = self.records.remove(&id) {
                    dead.insert(record.handle);
                    evicted.push(record);
                }
            }
        }
    }

    pub fn reset_drawn(&mut self) {
        for record in self.records.values_mut() {
            record.is_drawn = false;
            record.is_active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, handle: u64, kind: WidgetKind) -> WidgetRecord {
        WidgetRecord::new(id.into(), NativeHandle(handle), kind, None, WidgetState::Button, 1)
    }

    fn child(id: &str, handle: u64, parent: u64) -> WidgetRecord {
        WidgetRecord::new(
            id.into(),
            NativeHandle(handle),
            WidgetKind::Frame,
            Some(NativeHandle(parent)),
            WidgetState::Button,
            1,
        )
    }

    #[test]
    fn test_evict_undrawn_keeps_drawn_records() {
        let mut store = IdentityStore::new();
        store.insert(record("a", 1, WidgetKind::Button)).is_drawn = true;
        store.insert(record("frame", 2, WidgetKind::Frame));
        store.insert(record("b", 3, WidgetKind::Button));

        let evicted = store.evict_undrawn();
        let ids: Vec<_> = evicted.iter().map(|r| r.identifier()).collect();
        assert_eq!(ids, vec!["b", "frame"]);
        assert_eq!(store.len(), 1);
        assert!(store.contains("a"));
    }

    #[test]
    fn test_evict_descendants_follows_nesting() {
        let mut store = IdentityStore::new();
        store.insert(record("outer", 1, WidgetKind::Frame));
        store.insert(child("inner", 2, 1));
        store.insert(child("leaf", 3, 2));
        store.insert(record("sibling", 4, WidgetKind::Button));

        let mut ids: Vec<String> = store
            .evict_descendants(&[NativeHandle(1)])
            .iter()
            .map(|r| r.identifier().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["inner", "leaf"]);
        assert!(store.contains("outer"));
        assert!(store.contains("sibling"));
    }

    #[test]
    fn test_reset_drawn_clears_flags() {
        let mut store = IdentityStore::new();
        let r = store.insert(record("a", 1, WidgetKind::Button));
        r.is_drawn = true;
        r.is_active = true;
        store.reset_drawn();
        let r = store.get("a").unwrap();
        assert!(!r.is_drawn() && !r.is_active());
    }
}
