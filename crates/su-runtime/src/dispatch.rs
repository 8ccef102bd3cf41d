use std::rc::Rc;

use crate::context::Context;

/// Receives named actions raised by interactive nodes.
///
/// The interpreter never interprets the action name; the host decides what
/// `"number"` or `"addTask"` means.
pub trait ActionDispatcher {
    fn dispatch(&self, action: &str, context: &Context);
}

impl<F> ActionDispatcher for F
where
    F: Fn(&str, &Context),
{
    fn dispatch(&self, action: &str, context: &Context) {
        self(action, context)
    }
}

pub type SharedDispatcher = Rc<dyn ActionDispatcher>;

/// Dispatcher handed to the children of a State node: the event context of
/// a descendant is laid over the scope's child context before the action is
/// forwarded to the enclosing dispatcher.
pub(crate) struct ScopedDispatcher {
    outer: SharedDispatcher,
    scope_context: Context,
}

impl ScopedDispatcher {
    pub(crate) fn wrap(outer: SharedDispatcher, scope_context: Context) -> SharedDispatcher {
        Rc::new(Self {
            outer,
            scope_context,
        })
    }
}

impl ActionDispatcher for ScopedDispatcher {
    fn dispatch(&self, action: &str, context: &Context) {
        let merged = self.scope_context.overlay(context);
        self.outer.dispatch(action, &merged);
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;
    use std::cell::RefCell;
    use su_core::SuValue;

    #[test]
    fn closures_are_dispatchers() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = seen.clone();
        let dispatcher: SharedDispatcher = Rc::new(move |action: &str, _: &Context| {
            sink.borrow_mut().push(action.to_string());
        });

        dispatcher.dispatch("clear", &Context::new());
        assert_eq!(*seen.borrow(), vec!["clear".to_string()]);
    }

    #[test]
    fn scoped_dispatcher_layers_event_over_scope() {
        let seen = Rc::new(RefCell::new(None::<Context>));
        let sink = seen.clone();
        let outer: SharedDispatcher = Rc::new(move |_: &str, context: &Context| {
            *sink.borrow_mut() = Some(context.clone());
        });

        let scope = Context::new()
            .with_value("display", "0".into())
            .with_value("buttonLabel", "stale".into());
        let scoped = ScopedDispatcher::wrap(outer, scope);
        scoped.dispatch("number", &Context::new().with_value("buttonLabel", "7".into()));

        let received = seen.borrow().clone().expect("dispatch should reach outer");
        assert_eq!(received.get("display"), Some(&SuValue::from("0")));
        assert_eq!(received.get("buttonLabel"), Some(&SuValue::from("7")));
    }
}
