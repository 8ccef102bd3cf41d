use su_core::{SchemaNode, SchemaUiError};
use su_runtime::{Context, Interpreter, Primitive, RenderedNode, SharedDispatcher};
use tracing::{debug, info};

use crate::apps::AppKind;
use crate::shell::select_app;

/// A live schema: its interpreter (and therefore its State scopes), the
/// host dispatcher, and the latest rendered tree.
///
/// Every interaction re-renders, so [`Session::rendered`] always reflects
/// the state after the last action.
#[derive(Default)]
pub struct Session {
    app: Option<AppKind>,
    schema: Option<SchemaNode>,
    dispatcher: Option<SharedDispatcher>,
    interpreter: Interpreter,
    rendered: Option<RenderedNode>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session over an arbitrary schema, outside the built-in apps.
    pub fn from_schema(schema: SchemaNode, dispatcher: Option<SharedDispatcher>) -> Self {
        let mut session = Self {
            schema: Some(schema),
            dispatcher,
            ..Self::default()
        };
        session.render();
        session
    }

    /// Runs a prompt through the shell. An unmatched prompt clears the
    /// current app and returns `Ok(None)`.
    pub fn submit_prompt(&mut self, prompt: &str) -> Result<Option<AppKind>, SchemaUiError> {
        match select_app(prompt) {
            Some(app) => {
                self.open(app)?;
                Ok(Some(app))
            }
            None => {
                info!(prompt, "prompt matched no app");
                self.close();
                Ok(None)
            }
        }
    }

    /// Shows `app`. The interpreter is kept, so a State scope at the same
    /// position survives only if its initial state is unchanged.
    pub fn open(&mut self, app: AppKind) -> Result<(), SchemaUiError> {
        let schema = app.schema()?;
        info!(app = app.name(), "opening app");
        self.app = Some(app);
        self.schema = Some(schema);
        self.dispatcher = Some(app.dispatcher());
        self.render();
        Ok(())
    }

    pub fn close(&mut self) {
        self.app = None;
        self.schema = None;
        self.dispatcher = None;
        self.render();
    }

    pub fn app(&self) -> Option<AppKind> {
        self.app
    }

    pub fn render(&mut self) -> Option<&RenderedNode> {
        self.rendered = match &self.schema {
            Some(schema) => {
                self.interpreter
                    .interpret(schema, &Context::new(), self.dispatcher.clone())
            }
            None => {
                self.interpreter.clear();
                None
            }
        };
        self.rendered.as_ref()
    }

    pub fn rendered(&self) -> Option<&RenderedNode> {
        self.rendered.as_ref()
    }

    pub fn interactive(&self) -> Vec<&RenderedNode> {
        self.rendered
            .as_ref()
            .map(RenderedNode::interactive)
            .unwrap_or_default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.rendered
            .as_ref()
            .map(RenderedNode::texts)
            .unwrap_or_default()
    }

    /// Clicks the `index`-th interactive node, which must be a button.
    pub fn click(&mut self, index: usize) -> Result<bool, SchemaUiError> {
        let dispatched = {
            let node = self.target(index, Primitive::Button)?;
            node.click()
        };
        self.after_interaction(dispatched);
        Ok(dispatched)
    }

    /// Clicks the first button whose label is `label`.
    pub fn click_label(&mut self, label: &str) -> Result<bool, SchemaUiError> {
        let dispatched = {
            let node = self
                .rendered
                .as_ref()
                .and_then(|root| root.find_button(label))
                .ok_or_else(|| {
                    SchemaUiError::new(
                        "API_TARGET_NOT_FOUND",
                        format!("No button labelled \"{}\".", label),
                    )
                })?;
            node.click()
        };
        self.after_interaction(dispatched);
        Ok(dispatched)
    }

    /// Types `value` into the `index`-th interactive node, which must be an
    /// input.
    pub fn change(&mut self, index: usize, value: &str) -> Result<bool, SchemaUiError> {
        let dispatched = {
            let node = self.target(index, Primitive::Input)?;
            node.change(value)
        };
        self.after_interaction(dispatched);
        Ok(dispatched)
    }

    fn target(&self, index: usize, expected: Primitive) -> Result<&RenderedNode, SchemaUiError> {
        let interactive = self.interactive();
        let node = interactive.get(index).copied().ok_or_else(|| {
            SchemaUiError::new(
                "API_TARGET_NOT_FOUND",
                format!(
                    "Interactive index {} is out of range (count={}).",
                    index,
                    interactive.len()
                ),
            )
        })?;
        if node.primitive != expected {
            return Err(SchemaUiError::new(
                "API_TARGET_KIND",
                format!(
                    "Interactive index {} is a {}, expected a {}.",
                    index,
                    node.primitive.as_str(),
                    expected.as_str()
                ),
            ));
        }
        Ok(node)
    }

    fn after_interaction(&mut self, dispatched: bool) {
        if dispatched {
            self.render();
        } else {
            debug!("interaction dispatched nothing; keeping previous render");
        }
    }
}
