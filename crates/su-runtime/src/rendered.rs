//! Output of one interpretation pass.

use std::fmt;

use su_core::{PropMap, SuValue};
use tracing::{debug, warn};

use crate::context::Context;
use crate::dispatch::SharedDispatcher;

/// Reserved event-context name carrying a clicked button's label.
pub const BUTTON_LABEL_KEY: &str = "buttonLabel";
/// Reserved event-context name carrying an input's new raw value.
pub const CHANGE_VALUE_KEY: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Container,
    Text,
    Button,
    Grid,
    Input,
    List,
    ListItem,
    /// Transparent wrapper produced by a State node.
    Fragment,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Text => "Text",
            Self::Button => "Button",
            Self::Grid => "Grid",
            Self::Input => "Input",
            Self::List => "List",
            Self::ListItem => "ListItem",
            Self::Fragment => "Fragment",
        }
    }

    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Button | Self::Input)
    }
}

/// Everything needed to raise one action later, captured at render time.
#[derive(Clone)]
pub struct Binding {
    action: Option<String>,
    context: Context,
    dispatcher: Option<SharedDispatcher>,
}

impl Binding {
    pub(crate) fn new(
        action: Option<String>,
        context: Context,
        dispatcher: Option<SharedDispatcher>,
    ) -> Self {
        Self {
            action,
            context,
            dispatcher,
        }
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn fire(&self, context: &Context) -> bool {
        let Some(action) = self.action.as_deref() else {
            debug!("interaction has no action bound; ignoring");
            return false;
        };
        let Some(dispatcher) = self.dispatcher.as_ref() else {
            warn!(action, "no action dispatcher available; dropping interaction");
            return false;
        };
        dispatcher.dispatch(action, context);
        true
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("action", &self.action)
            .field("has_dispatcher", &self.dispatcher.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Interaction {
    /// Event context already carries `buttonLabel`.
    Click(Binding),
    Change(Binding),
}

#[derive(Debug, Clone)]
pub struct RenderedNode {
    pub primitive: Primitive,
    pub props: PropMap,
    pub key: Option<String>,
    pub children: Vec<RenderedNode>,
    pub interaction: Option<Interaction>,
}

impl RenderedNode {
    pub fn new(primitive: Primitive, props: PropMap) -> Self {
        Self {
            primitive,
            props,
            key: None,
            children: Vec::new(),
            interaction: None,
        }
    }

    pub fn with_children(mut self, children: Vec<RenderedNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    pub fn prop(&self, name: &str) -> Option<&SuValue> {
        self.props.get(name)
    }

    pub fn is_disabled(&self) -> bool {
        self.prop("disabled").is_some_and(SuValue::is_truthy)
    }

    /// Raises this button's click action. Returns whether an action was
    /// actually dispatched.
    pub fn click(&self) -> bool {
        match &self.interaction {
            Some(Interaction::Click(binding)) if !self.is_disabled() => {
                binding.fire(&binding.context)
            }
            Some(Interaction::Click(_)) => {
                debug!("click on disabled button ignored");
                false
            }
            _ => false,
        }
    }

    /// Raises this input's change action with `value` as the new raw text.
    pub fn change(&self, value: &str) -> bool {
        match &self.interaction {
            Some(Interaction::Change(binding)) => {
                let context = binding
                    .context
                    .with_value(CHANGE_VALUE_KEY, SuValue::from(value));
                binding.fire(&context)
            }
            _ => false,
        }
    }

    /// Buttons and inputs in document order.
    pub fn interactive(&self) -> Vec<&RenderedNode> {
        let mut out = Vec::new();
        self.collect(&mut |node| node.primitive.is_interactive(), &mut out);
        out
    }

    pub fn find_button(&self, label: &str) -> Option<&RenderedNode> {
        let mut out = Vec::new();
        self.collect(
            &mut |node| node.primitive == Primitive::Button && node.label().as_deref() == Some(label),
            &mut out,
        );
        out.into_iter().next()
    }

    fn collect<'a>(
        &'a self,
        keep: &mut dyn FnMut(&RenderedNode) -> bool,
        out: &mut Vec<&'a RenderedNode>,
    ) {
        if keep(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect(keep, out);
        }
    }

    /// The text a Text node shows: its `content` when present, else the
    /// text of its children.
    pub fn own_text(&self) -> Option<String> {
        match self.prop("content") {
            Some(content) if has_text(content) => Some(content.to_text()),
            _ => {
                let joined = self.text_content();
                (!joined.is_empty()).then_some(joined)
            }
        }
    }

    pub fn label(&self) -> Option<String> {
        self.prop("label").filter(|label| has_text(label)).map(SuValue::to_text)
    }

    /// Concatenated text of every Text and Button descendant.
    pub fn text_content(&self) -> String {
        self.texts().concat()
    }

    /// Visible strings in document order: Text contents and button labels.
    pub fn texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.push_texts(&mut out);
        out
    }

    fn push_texts(&self, out: &mut Vec<String>) {
        match self.primitive {
            Primitive::Text => {
                if let Some(content) = self.prop("content").filter(|value| has_text(value)) {
                    out.push(content.to_text());
                    return;
                }
            }
            Primitive::Button => {
                if let Some(label) = self.label() {
                    out.push(label);
                    return;
                }
            }
            _ => {}
        }
        for child in &self.children {
            child.push_texts(out);
        }
    }
}

fn has_text(value: &SuValue) -> bool {
    match value {
        SuValue::Null => false,
        SuValue::String(text) => !text.is_empty(),
        _ => true,
    }
}
