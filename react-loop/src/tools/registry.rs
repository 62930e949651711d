//! Name-keyed registry of tools, populated at startup.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Tool, ToolSpec};

/// Maps tool names to tools, remembering registration order.
///
/// Order matters for the prompt catalog and for the list of valid names in
/// "tool not found" notes, so both come out the same way every run.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under [`Tool::name`]. A tool with the same name is
    /// replaced (keeping its original position) and returned.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let previous = self.tools.insert(name.clone(), Arc::from(tool));
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Box<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Tool catalog for the prompt, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.spec())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}
