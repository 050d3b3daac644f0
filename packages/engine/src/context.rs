//! Application context: one document plus the registry of its components.

use tessera_dom::Document;

use crate::component::{ClassList, Component};
use crate::error::EngineResult;
use crate::registry::{CleanupReport, ComponentRegistry};

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    document: Document,
    registry: ComponentRegistry,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            registry: ComponentRegistry::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Construct a component in this context's document and register it.
    pub fn component(&self, tag: &str, classes: impl Into<ClassList>) -> EngineResult<Component> {
        let component = Component::with_classes(&self.document, tag, classes)?;
        self.registry.register(&component)?;
        Ok(component)
    }

    /// Remove every registered component.
    pub fn teardown(&self) -> CleanupReport {
        self.registry.cleanup()
    }
}
