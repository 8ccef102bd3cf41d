//! Per-node local state owned by State scopes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use su_core::{SuValue, ValueMap};
use tracing::{debug, warn};

/// One step of a node's position in the schema tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Child(usize),
    Item(String),
}

pub type ScopePath = Vec<PathSegment>;

#[derive(Debug)]
struct ScopeSlot {
    initial_state: SuValue,
    state: ValueMap,
    last_pass: u64,
}

impl ScopeSlot {
    fn new(initial_state: &SuValue, pass: u64) -> Self {
        Self {
            initial_state: initial_state.clone(),
            state: initial_state_map(initial_state),
            last_pass: pass,
        }
    }

    fn reset(&mut self, initial_state: &SuValue) {
        self.initial_state = initial_state.clone();
        self.state = initial_state_map(initial_state);
    }
}

fn initial_state_map(initial_state: &SuValue) -> ValueMap {
    match initial_state {
        SuValue::Map(entries) => entries.clone(),
        SuValue::Null => ValueMap::new(),
        other => {
            warn!(
                found = other.type_name(),
                "State initialState is not a map; starting from an empty state"
            );
            ValueMap::new()
        }
    }
}

/// A state update: either a partial map, or a function of the current state
/// producing one. Both are shallow-merged into the live state.
pub enum StatePatch {
    Merge(ValueMap),
    Update(Box<dyn FnOnce(&ValueMap) -> ValueMap>),
}

impl From<ValueMap> for StatePatch {
    fn from(entries: ValueMap) -> Self {
        Self::Merge(entries)
    }
}

/// Handle to the live state of one State scope instance.
#[derive(Clone)]
pub struct StateSetter {
    slot: Rc<RefCell<ScopeSlot>>,
}

impl StateSetter {
    pub fn state(&self) -> ValueMap {
        self.slot.borrow().state.clone()
    }

    /// The update closure runs against a snapshot with the slot released, so
    /// it may read this scope through another handle.
    pub fn set_state(&self, patch: impl Into<StatePatch>) {
        let partial = match patch.into() {
            StatePatch::Merge(entries) => entries,
            StatePatch::Update(update) => update(&self.state()),
        };
        let mut slot = self.slot.borrow_mut();
        for (name, value) in partial {
            slot.state.insert(name, value);
        }
    }

    pub fn update(&self, update: impl FnOnce(&ValueMap) -> ValueMap + 'static) {
        self.set_state(StatePatch::Update(Box::new(update)));
    }
}

impl fmt::Debug for StateSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.try_borrow() {
            Ok(slot) => f.debug_struct("StateSetter").field("state", &slot.state).finish(),
            Err(_) => f.write_str("StateSetter(<borrowed>)"),
        }
    }
}

/// Live State scope slots keyed by node position.
///
/// A render pass is bracketed by [`StateStore::begin_pass`] and
/// [`StateStore::end_pass`]; slots not entered during a pass are dropped.
#[derive(Debug, Default)]
pub struct StateStore {
    slots: BTreeMap<ScopePath, Rc<RefCell<ScopeSlot>>>,
    pass: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_pass(&mut self) {
        self.pass += 1;
    }

    /// Returns the setter for the scope at `path`, creating it on first
    /// visit and resetting it when `initial_state` no longer matches the one
    /// it was created from.
    pub fn enter(&mut self, path: &ScopePath, initial_state: &SuValue) -> StateSetter {
        let pass = self.pass;
        let slot = self
            .slots
            .entry(path.clone())
            .or_insert_with(|| {
                debug!(?path, "State scope initialized");
                Rc::new(RefCell::new(ScopeSlot::new(initial_state, pass)))
            })
            .clone();

        {
            let mut slot = slot.borrow_mut();
            if slot.initial_state != *initial_state {
                debug!(?path, "State scope initialState changed; resetting");
                slot.reset(initial_state);
            }
            slot.last_pass = pass;
        }

        StateSetter { slot }
    }

    pub fn end_pass(&mut self) -> usize {
        let pass = self.pass;
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.borrow().last_pass == pass);
        let dropped = before - self.slots.len();
        if dropped > 0 {
            debug!(dropped, "State scopes dropped after render pass");
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn state_at(&self, path: &ScopePath) -> Option<ValueMap> {
        self.slots.get(path).map(|slot| slot.borrow().state.clone())
    }
}

#[cfg(test)]
mod state_scope_tests {
    use super::*;

    fn map(entries: &[(&str, SuValue)]) -> ValueMap {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    fn root() -> ScopePath {
        vec![PathSegment::Child(1)]
    }

    #[test]
    fn set_state_merges_shallowly() {
        let mut store = StateStore::new();
        store.begin_pass();
        let setter = store.enter(
            &root(),
            &SuValue::Map(map(&[("a", 1.0.into()), ("b", 2.0.into())])),
        );

        setter.set_state(map(&[("b", 3.0.into())]));

        assert_eq!(setter.state(), map(&[("a", 1.0.into()), ("b", 3.0.into())]));
    }

    #[test]
    fn set_state_does_not_merge_nested_maps() {
        let mut store = StateStore::new();
        store.begin_pass();
        let setter = store.enter(
            &root(),
            &SuValue::Map(map(&[(
                "form",
                SuValue::map([("name", SuValue::from("a")), ("age", SuValue::from(3.0))]),
            )])),
        );

        setter.set_state(map(&[("form", SuValue::map([("name", SuValue::from("b"))]))]));

        assert_eq!(
            setter.state()["form"],
            SuValue::map([("name", SuValue::from("b"))])
        );
    }

    #[test]
    fn functional_patch_sees_current_state() {
        let mut store = StateStore::new();
        store.begin_pass();
        let setter = store.enter(&root(), &SuValue::Map(map(&[("count", 1.0.into())])));

        setter.update(|state| {
            let count = state["count"].as_number().unwrap_or_default();
            let mut out = ValueMap::new();
            out.insert("count".to_string(), SuValue::from(count + 1.0));
            out
        });
        setter.update(|state| {
            let count = state["count"].as_number().unwrap_or_default();
            let mut out = ValueMap::new();
            out.insert("count".to_string(), SuValue::from(count * 10.0));
            out
        });

        assert_eq!(setter.state()["count"], SuValue::from(20.0));
    }

    #[test]
    fn functional_patch_may_read_its_own_scope() {
        let mut store = StateStore::new();
        store.begin_pass();
        let setter = store.enter(&root(), &SuValue::Map(map(&[("count", 1.0.into())])));
        let reader = setter.clone();

        setter.update(move |_| {
            let count = reader.state()["count"].as_number().unwrap_or_default();
            map(&[("count", SuValue::from(count + 5.0))])
        });

        assert_eq!(setter.state()["count"], SuValue::from(6.0));
    }

    #[test]
    fn same_fingerprint_preserves_state_and_new_one_resets() {
        let mut store = StateStore::new();
        let initial = SuValue::Map(map(&[("display", "0".into())]));

        store.begin_pass();
        store
            .enter(&root(), &initial)
            .set_state(map(&[("display", "7".into())]));
        store.end_pass();

        store.begin_pass();
        let setter = store.enter(&root(), &initial);
        assert_eq!(setter.state()["display"], SuValue::from("7"));
        store.end_pass();

        let switched = SuValue::Map(map(&[
            ("tasks", SuValue::Array(Vec::new())),
            ("inputValue", "".into()),
        ]));
        store.begin_pass();
        let setter = store.enter(&root(), &switched);
        assert_eq!(setter.state(), map(&[("tasks", SuValue::Array(Vec::new())), ("inputValue", "".into())]));
        store.end_pass();
    }

    #[test]
    fn end_pass_drops_slots_not_visited() {
        let mut store = StateStore::new();
        let initial = SuValue::Map(ValueMap::new());

        store.begin_pass();
        store.enter(&root(), &initial);
        store.enter(&vec![PathSegment::Child(2)], &initial);
        assert_eq!(store.end_pass(), 0);
        assert_eq!(store.len(), 2);

        store.begin_pass();
        store.enter(&root(), &initial);
        assert_eq!(store.end_pass(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.state_at(&vec![PathSegment::Child(2)]).is_none());
    }

    #[test]
    fn non_map_initial_state_starts_empty() {
        let mut store = StateStore::new();
        store.begin_pass();
        let setter = store.enter(&root(), &SuValue::from("oops"));
        assert!(setter.state().is_empty());
    }
}
