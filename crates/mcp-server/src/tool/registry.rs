//! Tool registry.
//!
//! The registry is assembled once at startup and is immutable afterwards,
//! so lookups need no locking and can be shared across sessions behind an
//! `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use super::Tool;
use crate::error::RegistryError;
use crate::protocol::ToolDefinition;

/// Immutable, ordered collection of tools keyed by name.
///
/// ```rust
/// use mcp_server::tool::ToolRegistry;
///
/// let registry = ToolRegistry::builder().build().unwrap();
/// assert!(registry.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Starts a registry builder.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// Returns true if a tool is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.descriptor().name())
    }

    /// Wire definitions in registration order; identical on every call.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| tool.descriptor().to_definition())
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Collects tools for a [`ToolRegistry`].
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    /// Adds a tool.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Adds a shared tool.
    pub fn shared(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Adds several shared tools.
    pub fn tools<I>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        self.tools.extend(tools);
        self
    }

    /// Builds the registry, rejecting duplicate names.
    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.tools.len());
        for (position, tool) in self.tools.iter().enumerate() {
            let name = tool.descriptor().name().to_string();
            if index.insert(name.clone(), position).is_some() {
                return Err(RegistryError::DuplicateTool(name));
            }
        }

        Ok(ToolRegistry {
            tools: self.tools,
            index,
        })
    }
}
