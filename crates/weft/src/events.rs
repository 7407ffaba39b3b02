//! Named handlers for diagram lifecycle events.
//!
//! The only event type is `end`, fired once per completed layout run after
//! the final draw. Handlers are registered under `end` or a namespaced name
//! such as `end.legend`, so independent callers do not replace each other.

use indexmap::IndexMap;
use log::trace;

use crate::error::WeftError;

const END_EVENT: &str = "end";

/// Payload of the `end` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEnd {
    /// Ordinal of the completed run, starting at 1.
    pub run: u64,
    pub ticks: u64,
    pub nodes: usize,
    pub edges: usize,
}

type Handler = Box<dyn FnMut(&LayoutEnd)>;

/// Registry of `end` handlers, invoked in registration order.
#[derive(Default)]
pub struct EventRegistry {
    handlers: IndexMap<String, Handler>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any handler of the same
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`WeftError::UnknownEvent`] unless the type part of `name`
    /// (before the first `.`) is `end`.
    pub fn on(
        &mut self,
        name: &str,
        handler: impl FnMut(&LayoutEnd) + 'static,
    ) -> Result<(), WeftError> {
        validate(name)?;
        self.handlers.insert(name.to_string(), Box::new(handler));
        Ok(())
    }

    /// Removes the handler registered under `name`.
    pub fn off(&mut self, name: &str) -> bool {
        self.handlers.shift_remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn emit(&mut self, event: &LayoutEnd) {
        trace!(handlers = self.handlers.len(), run = event.run; "Emitting end event");
        for handler in self.handlers.values_mut() {
            handler(event);
        }
    }
}

fn validate(name: &str) -> Result<(), WeftError> {
    let event_type = name.split_once('.').map_or(name, |(event_type, _)| event_type);
    if event_type == END_EVENT {
        Ok(())
    } else {
        Err(WeftError::UnknownEvent(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn event() -> LayoutEnd {
        LayoutEnd {
            run: 1,
            ticks: 3,
            nodes: 2,
            edges: 1,
        }
    }

    #[test]
    fn test_namespaced_handlers_coexist() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut registry = EventRegistry::new();

        let first = calls.clone();
        registry.on("end", move |_| first.borrow_mut().push("plain")).unwrap();
        let second = calls.clone();
        registry
            .on("end.legend", move |_| second.borrow_mut().push("legend"))
            .unwrap();

        registry.emit(&event());
        assert_eq!(*calls.borrow(), vec!["plain", "legend"]);
    }

    #[test]
    fn test_same_name_replaces() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = EventRegistry::new();

        registry.on("end", |_| {}).unwrap();
        let counter = count.clone();
        registry.on("end", move |_| *counter.borrow_mut() += 1).unwrap();

        registry.emit(&event());
        assert_eq!(registry.len(), 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unknown_event_type() {
        let mut registry = EventRegistry::new();
        let err = registry.on("tick", |_| {}).unwrap_err();
        assert!(matches!(err, WeftError::UnknownEvent(name) if name == "tick"));
        assert!(registry.on("ending", |_| {}).is_err());
    }

    #[test]
    fn test_off() {
        let mut registry = EventRegistry::new();
        registry.on("end.x", |_| {}).unwrap();
        assert!(registry.off("end.x"));
        assert!(!registry.off("end.x"));
        assert!(registry.is_empty());
    }
}
