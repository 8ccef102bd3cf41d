//! Built-in example apps: a schema plus the host handler for its actions.

mod arith;
pub mod calculator;
pub mod todo;

use std::fmt;
use std::rc::Rc;

use su_core::{SchemaNode, SchemaUiError};
use su_runtime::{Context, SharedDispatcher};

pub use arith::{eval_arith, ArithError};

const CALCULATOR_SCHEMA: &str = include_str!("../../schemas/calculator.json");
const TODO_SCHEMA: &str = include_str!("../../schemas/todo.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppKind {
    Calculator,
    Todo,
}

impl AppKind {
    pub const ALL: [AppKind; 2] = [AppKind::Calculator, AppKind::Todo];

    pub fn name(self) -> &'static str {
        match self {
            Self::Calculator => "calculator",
            Self::Todo => "todo",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|app| app.name().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn schema_source(self) -> &'static str {
        match self {
            Self::Calculator => CALCULATOR_SCHEMA,
            Self::Todo => TODO_SCHEMA,
        }
    }

    pub fn schema(self) -> Result<SchemaNode, SchemaUiError> {
        SchemaNode::from_json(self.schema_source()).map_err(|error| {
            SchemaUiError::new(
                error.code,
                format!("built-in {} schema: {}", self.name(), error.message),
            )
        })
    }

    pub fn handle_action(self, action: &str, context: &Context) {
        match self {
            Self::Calculator => calculator::handle_action(action, context),
            Self::Todo => todo::handle_action(action, context),
        }
    }

    pub fn dispatcher(self) -> SharedDispatcher {
        Rc::new(move |action: &str, context: &Context| self.handle_action(action, context))
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
