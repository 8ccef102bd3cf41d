//! Schema interpreter: walks a [`SchemaNode`](su_core::SchemaNode) tree
//! against a layered [`Context`], resolving `{{path}}` templates, owning
//! State scope slots, and wiring interactive nodes to an
//! [`ActionDispatcher`].

mod helpers {
    pub(crate) mod value_path;
}

pub mod context;
pub mod dispatch;
pub mod expr;
pub mod interpreter;
pub mod primitives;
pub mod rendered;
pub mod state_scope;
pub mod template;

pub use context::{Context, SET_STATE_KEY};
pub use dispatch::{ActionDispatcher, SharedDispatcher};
pub use expr::{evaluate, ExprError};
pub use interpreter::{Interpreter, ITEM_INDEX_KEY};
pub use rendered::{
    Binding, Interaction, Primitive, RenderedNode, BUTTON_LABEL_KEY, CHANGE_VALUE_KEY,
};
pub use state_scope::{PathSegment, ScopePath, StatePatch, StateSetter, StateStore};
pub use template::{resolve, resolve_props};
