use std::collections::HashMap;

use su_core::{NodeKind, PropMap, SchemaNode, SuValue, ValueMap};
use tracing::{debug, warn};

use crate::context::Context;
use crate::dispatch::{ScopedDispatcher, SharedDispatcher};
use crate::primitives::ListProps;
use crate::rendered::{Binding, Interaction, Primitive, RenderedNode, BUTTON_LABEL_KEY};
use crate::state_scope::{PathSegment, ScopePath, StateStore};
use crate::template::resolve_props;

/// Context name bound to the position of the current List element.
pub const ITEM_INDEX_KEY: &str = "itemIndex";

/// Walks schema trees into [`RenderedNode`] trees.
///
/// The interpreter owns the State scope slots, so the same instance must be
/// reused across re-renders for local state to survive.
#[derive(Debug, Default)]
pub struct Interpreter {
    store: StateStore,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one render pass. Returns `None` when the root renders nothing.
    pub fn interpret(
        &mut self,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<SharedDispatcher>,
    ) -> Option<RenderedNode> {
        self.store.begin_pass();
        let mut path = ScopePath::new();
        let rendered = self.walk(node, context, dispatcher.as_ref(), &mut path);
        self.store.end_pass();
        rendered
    }

    /// Drops every State scope, as when nothing is rendered at all.
    pub fn clear(&mut self) {
        self.store = StateStore::new();
    }

    pub fn state_store(&self) -> &StateStore {
        &self.store
    }

    fn walk(
        &mut self,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<&SharedDispatcher>,
        path: &mut ScopePath,
    ) -> Option<RenderedNode> {
        let Some(kind) = node.kind() else {
            warn!(kind = %node.kind_name, "unknown schema node type; rendering nothing");
            return None;
        };

        let rendered = match kind {
            NodeKind::Container => self.layout(Primitive::Container, node, context, dispatcher, path),
            NodeKind::Text => self.layout(Primitive::Text, node, context, dispatcher, path),
            NodeKind::Grid => self.layout(Primitive::Grid, node, context, dispatcher, path),
            NodeKind::Button => self.button(node, context, dispatcher, path),
            NodeKind::Input => input(node, context, dispatcher),
            NodeKind::List => self.list(node, context, dispatcher, path),
            NodeKind::State => self.state(node, context, dispatcher, path),
        };
        Some(rendered)
    }

    fn walk_children(
        &mut self,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<&SharedDispatcher>,
        path: &mut ScopePath,
    ) -> Vec<RenderedNode> {
        let mut out = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            path.push(PathSegment::Child(index));
            if let Some(rendered) = self.walk(child, context, dispatcher, path) {
                out.push(rendered);
            }
            path.pop();
        }
        out
    }

    fn layout(
        &mut self,
        primitive: Primitive,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<&SharedDispatcher>,
        path: &mut ScopePath,
    ) -> RenderedNode {
        let props = resolve_props(&node.props, context);
        let children = self.walk_children(node, context, dispatcher, path);
        RenderedNode::new(primitive, props).with_children(children)
    }

    fn button(
        &mut self,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<&SharedDispatcher>,
        path: &mut ScopePath,
    ) -> RenderedNode {
        let mut props = resolve_props(&node.props, context);
        let children = self.walk_children(node, context, dispatcher, path);

        let label = button_label(&props, &children);
        let label_value = label.as_deref().map_or(SuValue::Null, SuValue::from);
        let event_context = context.with_value(BUTTON_LABEL_KEY, label_value);
        if let Some(label) = label {
            props.insert("label".to_string(), SuValue::String(label));
        }

        let binding = Binding::new(node.on_click.clone(), event_context, dispatcher.cloned());
        RenderedNode::new(Primitive::Button, props)
            .with_children(children)
            .with_interaction(Interaction::Click(binding))
    }

    fn list(
        &mut self,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<&SharedDispatcher>,
        path: &mut ScopePath,
    ) -> RenderedNode {
        let props = resolve_props(&node.props, context);
        let items_key = ListProps::from_props(&props).items_key;
        let items = context
            .get(&items_key)
            .and_then(SuValue::as_array)
            .map(<[SuValue]>::to_vec)
            .unwrap_or_default();
        debug!(items_key = %items_key, count = items.len(), "List bound");

        let Some(item_schema) = node.item_schema.as_deref() else {
            if !items.is_empty() {
                warn!(items_key = %items_key, "List has items but no itemSchema");
            }
            return RenderedNode::new(Primitive::List, props);
        };

        let mut rendered_items = Vec::with_capacity(items.len());
        let mut seen_keys: HashMap<String, usize> = HashMap::new();
        for (index, item) in items.iter().enumerate() {
            let key = item_key(item, index);
            let item_context = context.extend(item_layer(item, index));

            // Repeated ids still get one state slot per element.
            let occurrence = seen_keys.entry(key.clone()).or_insert(0);
            let slot_key = match *occurrence {
                0 => key.clone(),
                repeat => format!("{key}#{repeat}"),
            };
            *occurrence += 1;

            path.push(PathSegment::Item(slot_key));
            let rendered = self.walk(item_schema, &item_context, dispatcher, path);
            path.pop();

            rendered_items.push(
                RenderedNode::new(Primitive::ListItem, PropMap::new())
                    .with_key(key)
                    .with_children(rendered.into_iter().collect()),
            );
        }

        RenderedNode::new(Primitive::List, props).with_children(rendered_items)
    }

    fn state(
        &mut self,
        node: &SchemaNode,
        context: &Context,
        dispatcher: Option<&SharedDispatcher>,
        path: &mut ScopePath,
    ) -> RenderedNode {
        let initial_state = node
            .props
            .get("initialState")
            .cloned()
            .unwrap_or_else(|| SuValue::Map(ValueMap::new()));
        let setter = self.store.enter(path, &initial_state);

        let child_context = context.extend(setter.state()).with_state_setter(setter);
        let child_dispatcher =
            dispatcher.map(|outer| ScopedDispatcher::wrap(outer.clone(), child_context.clone()));

        let children = self.walk_children(node, &child_context, child_dispatcher.as_ref(), path);
        RenderedNode::new(Primitive::Fragment, PropMap::new()).with_children(children)
    }
}

fn input(node: &SchemaNode, context: &Context, dispatcher: Option<&SharedDispatcher>) -> RenderedNode {
    let props = resolve_props(&node.props, context);
    let binding = Binding::new(node.on_change.clone(), context.clone(), dispatcher.cloned());
    RenderedNode::new(Primitive::Input, props).with_interaction(Interaction::Change(binding))
}

fn button_label(props: &PropMap, children: &[RenderedNode]) -> Option<String> {
    let from_prop = |name: &str| {
        props
            .get(name)
            .filter(|value| value.is_truthy())
            .map(SuValue::to_text)
    };
    from_prop("label").or_else(|| from_prop("children")).or_else(|| {
        let text: String = children.iter().map(RenderedNode::text_content).collect();
        (!text.is_empty()).then_some(text)
    })
}

fn item_key(item: &SuValue, index: usize) -> String {
    item.as_map()
        .and_then(|fields| fields.get("id"))
        .filter(|id| id.is_truthy())
        .map(SuValue::to_text)
        .unwrap_or_else(|| index.to_string())
}

fn item_layer(item: &SuValue, index: usize) -> ValueMap {
    let mut layer = item.as_map().cloned().unwrap_or_default();
    layer.insert(ITEM_INDEX_KEY.to_string(), SuValue::from(index));
    layer
}

#[cfg(test)]
mod interpreter_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn text(content: &str) -> SchemaNode {
        SchemaNode::new(NodeKind::Text).with_prop("content", content)
    }

    #[test]
    fn unknown_kind_renders_nothing_but_siblings_survive() {
        let schema = SchemaNode::new(NodeKind::Container)
            .with_child(SchemaNode::named("Slider"))
            .with_child(text("still here"));

        let rendered = Interpreter::new()
            .interpret(&schema, &Context::new(), None)
            .expect("container renders");
        assert_eq!(rendered.children.len(), 1);
        assert_eq!(rendered.texts(), vec!["still here"]);

        assert!(Interpreter::new()
            .interpret(&SchemaNode::named("Slider"), &Context::new(), None)
            .is_none());
    }

    #[test]
    fn children_share_parent_context() {
        let schema = SchemaNode::new(NodeKind::Grid)
            .with_child(text("{{a}}"))
            .with_child(text("{{b}}"));
        let context = Context::new()
            .with_value("a", "x".into())
            .with_value("b", "y".into());

        let rendered = Interpreter::new()
            .interpret(&schema, &context, None)
            .expect("grid renders");
        assert_eq!(rendered.primitive, Primitive::Grid);
        assert_eq!(rendered.texts(), vec!["x", "y"]);
    }

    #[test]
    fn button_label_falls_back_to_child_text() {
        let schema = SchemaNode::new(NodeKind::Button).with_child(text("Go"));
        let rendered = Interpreter::new()
            .interpret(&schema, &Context::new(), None)
            .expect("button renders");
        assert_eq!(rendered.label().as_deref(), Some("Go"));
    }

    #[test]
    fn list_without_item_schema_renders_empty_list() {
        let schema = SchemaNode::new(NodeKind::List);
        let context = Context::new().with_value("items", SuValue::Array(vec![1.0.into()]));
        let rendered = Interpreter::new()
            .interpret(&schema, &context, None)
            .expect("list renders");
        assert_eq!(rendered.primitive, Primitive::List);
        assert!(rendered.children.is_empty());
    }

    #[test]
    fn list_keys_prefer_item_id() {
        let schema = SchemaNode::new(NodeKind::List).with_item_schema(text("{{itemIndex}}"));
        let items = SuValue::Array(vec![
            SuValue::map([("id", SuValue::from(42.0))]),
            SuValue::from("bare"),
        ]);
        let rendered = Interpreter::new()
            .interpret(&schema, &Context::new().with_value("items", items), None)
            .expect("list renders");

        let keys: Vec<_> = rendered.children.iter().map(|item| item.key.clone()).collect();
        assert_eq!(keys, vec![Some("42".to_string()), Some("1".to_string())]);
        assert_eq!(rendered.texts(), vec!["0", "1"]);
    }

    #[test]
    fn state_without_dispatcher_leaves_children_unbound() {
        let schema = SchemaNode::new(NodeKind::State)
            .with_prop("initialState", SuValue::map([("n", SuValue::from(1.0))]))
            .with_child(
                SchemaNode::new(NodeKind::Button)
                    .with_prop("label", "{{n}}")
                    .with_on_click("inc"),
            );

        let mut interpreter = Interpreter::new();
        let rendered = interpreter
            .interpret(&schema, &Context::new(), None)
            .expect("state renders");
        assert_eq!(rendered.primitive, Primitive::Fragment);
        assert_eq!(rendered.texts(), vec!["1"]);
        assert!(!rendered.interactive()[0].click());
        assert_eq!(interpreter.state_store().len(), 1);
    }

    #[test]
    fn state_scopes_under_list_items_are_independent() {
        let counter = SchemaNode::new(NodeKind::State)
            .with_prop("initialState", SuValue::map([("n", SuValue::from(0.0))]))
            .with_child(
                SchemaNode::new(NodeKind::Button)
                    .with_prop("label", "{{n}}")
                    .with_on_click("inc"),
            );
        let schema = SchemaNode::new(NodeKind::List).with_item_schema(counter);
        let context = Context::new().with_value(
            "items",
            SuValue::Array(vec![
                SuValue::map([("id", SuValue::from(1.0))]),
                SuValue::map([("id", SuValue::from(2.0))]),
            ]),
        );

        let dispatcher: SharedDispatcher = Rc::new(|_: &str, context: &Context| {
            let current = context
                .get("n")
                .and_then(SuValue::as_number)
                .unwrap_or_default();
            if let Some(setter) = context.state_setter() {
                let mut patch = ValueMap::new();
                patch.insert("n".to_string(), SuValue::from(current + 1.0));
                setter.set_state(patch);
            }
        });

        let mut interpreter = Interpreter::new();
        let first = interpreter
            .interpret(&schema, &context, Some(dispatcher.clone()))
            .expect("list renders");
        assert!(first.interactive()[1].click());

        let second = interpreter
            .interpret(&schema, &context, Some(dispatcher))
            .expect("list renders");
        assert_eq!(second.texts(), vec!["0", "1"]);
    }

    #[test]
    fn state_scopes_under_duplicate_item_ids_stay_separate() {
        let counter = SchemaNode::new(NodeKind::State)
            .with_prop("initialState", SuValue::map([("n", SuValue::from(0.0))]))
            .with_child(
                SchemaNode::new(NodeKind::Button)
                    .with_prop("label", "{{n}}")
                    .with_on_click("inc"),
            );
        let schema = SchemaNode::new(NodeKind::List).with_item_schema(counter);
        let same_id = || SuValue::map([("id", SuValue::from(1.0))]);
        let context = Context::new().with_value("items", SuValue::Array(vec![same_id(), same_id()]));

        let dispatcher: SharedDispatcher = Rc::new(|_: &str, context: &Context| {
            let current = context
                .get("n")
                .and_then(SuValue::as_number)
                .unwrap_or_default();
            if let Some(setter) = context.state_setter() {
                let mut patch = ValueMap::new();
                patch.insert("n".to_string(), SuValue::from(current + 1.0));
                setter.set_state(patch);
            }
        });

        let mut interpreter = Interpreter::new();
        let first = interpreter
            .interpret(&schema, &context, Some(dispatcher.clone()))
            .expect("list renders");
        assert_eq!(interpreter.state_store().len(), 2);
        assert!(first.interactive()[0].click());

        let second = interpreter
            .interpret(&schema, &context, Some(dispatcher))
            .expect("list renders");
        assert_eq!(second.texts(), vec!["1", "0"]);
        let keys: Vec<_> = second.children.iter().map(|item| item.key.clone()).collect();
        assert_eq!(keys, vec![Some("1".to_string()), Some("1".to_string())]);
    }

    #[test]
    fn unlabeled_button_still_binds_null_label() {
        let seen = Rc::new(RefCell::new(None::<Context>));
        let sink = seen.clone();
        let dispatcher: SharedDispatcher = Rc::new(move |_: &str, context: &Context| {
            *sink.borrow_mut() = Some(context.clone());
        });
        let schema = SchemaNode::new(NodeKind::Button).with_on_click("tap");

        let rendered = Interpreter::new()
            .interpret(&schema, &Context::new(), Some(dispatcher))
            .expect("button renders");
        assert!(rendered.click());

        let received = seen.borrow().clone().expect("dispatched");
        assert!(received.contains(BUTTON_LABEL_KEY));
        assert_eq!(received.get(BUTTON_LABEL_KEY), Some(&SuValue::Null));
    }

    #[test]
    fn removed_subtree_drops_its_state() {
        let stateful = SchemaNode::new(NodeKind::State)
            .with_prop("initialState", SuValue::map([("n", SuValue::from(0.0))]));
        let with_state = SchemaNode::new(NodeKind::Container).with_child(stateful);
        let without_state = SchemaNode::new(NodeKind::Container);

        let mut interpreter = Interpreter::new();
        interpreter.interpret(&with_state, &Context::new(), None);
        assert_eq!(interpreter.state_store().len(), 1);
        interpreter.interpret(&without_state, &Context::new(), None);
        assert!(interpreter.state_store().is_empty());
    }

    #[test]
    fn nested_state_dispatch_reaches_outer_with_inner_values() {
        let seen = Rc::new(RefCell::new(None::<Context>));
        let sink = seen.clone();
        let dispatcher: SharedDispatcher = Rc::new(move |_: &str, context: &Context| {
            *sink.borrow_mut() = Some(context.clone());
        });

        let inner = SchemaNode::new(NodeKind::State)
            .with_prop("initialState", SuValue::map([("inner", SuValue::from(2.0))]))
            .with_child(
                SchemaNode::new(NodeKind::Button)
                    .with_prop("label", "x")
                    .with_on_click("go"),
            );
        let schema = SchemaNode::new(NodeKind::State)
            .with_prop(
                "initialState",
                SuValue::map([("outer", SuValue::from(1.0)), ("inner", SuValue::from(0.0))]),
            )
            .with_child(inner);

        let rendered = Interpreter::new()
            .interpret(&schema, &Context::new(), Some(dispatcher))
            .expect("renders");
        assert!(rendered.interactive()[0].click());

        let received = seen.borrow().clone().expect("dispatched");
        assert_eq!(received.get("outer"), Some(&SuValue::from(1.0)));
        assert_eq!(received.get("inner"), Some(&SuValue::from(2.0)));
        assert_eq!(received.get(BUTTON_LABEL_KEY), Some(&SuValue::from("x")));
    }
}
