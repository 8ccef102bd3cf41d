//! Layered name → value mapping visible to a node during interpretation.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use su_core::{SuValue, ValueMap};

use crate::helpers::value_path::{parse_ref_path, read_nested_path};
use crate::state_scope::StateSetter;

/// Reserved context name under which a State scope exposes its mutator.
pub const SET_STATE_KEY: &str = "setState";

/// Immutable, layered context.
///
/// Each extension pushes a new layer on top of the shared ancestor layers;
/// lookups walk from the innermost layer outwards, so the nearest binding
/// wins. The mutator of the nearest State scope travels alongside the
/// values rather than inside them.
#[derive(Clone, Default)]
pub struct Context {
    layers: Vec<Rc<ValueMap>>,
    state_setter: Option<StateSetter>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: ValueMap) -> Self {
        Self::new().extend(entries)
    }

    pub fn get(&self, name: &str) -> Option<&SuValue> {
        self.layers.iter().rev().find_map(|layer| layer.get(name))
    }

    /// Also true for [`SET_STATE_KEY`] inside a State scope, although the
    /// mutator is not a value and [`Context::get`] never returns it.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some() || (name == SET_STATE_KEY && self.state_setter.is_some())
    }

    /// Dot-path lookup: the first segment is a context name, the rest walk
    /// into the bound value.
    pub fn lookup_path(&self, path: &str) -> Option<SuValue> {
        let segments = parse_ref_path(path);
        let (root, rest) = segments.split_first()?;
        let value = self.get(root)?;
        if !rest.is_empty() && value.is_null() {
            return None;
        }
        read_nested_path(value, rest)
    }

    pub fn extend(&self, layer: ValueMap) -> Self {
        if layer.is_empty() {
            return self.clone();
        }
        let mut layers = self.layers.clone();
        layers.push(Rc::new(layer));
        Self {
            layers,
            state_setter: self.state_setter.clone(),
        }
    }

    pub fn with_value(&self, name: impl Into<String>, value: SuValue) -> Self {
        let mut layer = ValueMap::new();
        layer.insert(name.into(), value);
        self.extend(layer)
    }

    pub fn with_state_setter(&self, setter: StateSetter) -> Self {
        Self {
            layers: self.layers.clone(),
            state_setter: Some(setter),
        }
    }

    /// Merges `top` over `self`: every binding of `top` shadows `self`, and
    /// `top`'s mutator is preferred.
    pub fn overlay(&self, top: &Context) -> Self {
        let state_setter = top
            .state_setter
            .clone()
            .or_else(|| self.state_setter.clone());

        let shares_base = top.layers.len() >= self.layers.len()
            && self
                .layers
                .iter()
                .zip(top.layers.iter())
                .all(|(base, candidate)| Rc::ptr_eq(base, candidate));
        let layers = if shares_base {
            top.layers.clone()
        } else {
            self.layers.iter().chain(top.layers.iter()).cloned().collect()
        };

        Self {
            layers,
            state_setter,
        }
    }

    pub fn state_setter(&self) -> Option<&StateSetter> {
        self.state_setter.as_ref()
    }

    pub fn keys(&self) -> BTreeSet<&str> {
        self.layers
            .iter()
            .flat_map(|layer| layer.keys().map(String::as_str))
            .collect()
    }

    /// Collapses the layers into one map, innermost values winning.
    pub fn flatten(&self) -> ValueMap {
        let mut out = ValueMap::new();
        for layer in &self.layers {
            for (name, value) in layer.iter() {
                out.insert(name.clone(), value.clone());
            }
        }
        out
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.flatten())
            .field("state_setter", &self.state_setter)
            .finish()
    }
}
