//! Registry mapping action types to their handlers

use super::{all_handlers, ActionHandler};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry that manages the available action handlers
///
/// Built once before any document is processed and shared read-only
/// afterwards.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for handler in all_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Registers a handler, replacing any previous one for the same action type
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        let handler: Arc<dyn ActionHandler> = Arc::from(handler);
        let action_type = handler.action_type().to_string();
        debug!("Registering handler for {}", action_type);
        self.handlers.insert(action_type, handler);
    }

    /// Gets the handler for an action type
    pub fn get(&self, action_type: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(action_type)
    }

    /// Lists registered action types, sorted
    pub fn list(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("action_types", &self.list())
            .finish()
    }
}
