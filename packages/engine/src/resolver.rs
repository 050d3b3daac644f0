//! # Node resolution
//!
//! Turns a loosely typed render target into a concrete [`NodeId`].
//! Resolution never mutates the document.

use serde_json::Value;
use tessera_dom::{Document, NodeId};

use crate::component::Component;
use crate::error::{EngineError, EngineResult};

/// Where a component is mounted or appended.
#[derive(Debug, Clone)]
pub enum Target {
    /// First element matching a CSS selector.
    Selector(String),
    /// A node that is used as-is.
    Node(NodeId),
    /// The node owned by a component.
    Component(Component),
    /// The document body.
    Body,
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

impl From<Component> for Target {
    fn from(component: Component) -> Self {
        Target::Component(component)
    }
}

impl From<&Component> for Target {
    fn from(component: &Component) -> Self {
        Target::Component(component.clone())
    }
}

/// JSON targets can only name a selector.
impl TryFrom<&Value> for Target {
    type Error = EngineError;

    fn try_from(value: &Value) -> EngineResult<Self> {
        match value {
            Value::String(selector) => Ok(Target::Selector(selector.clone())),
            other => Err(EngineError::type_error(
                "a selector string, node or component",
                other,
            )),
        }
    }
}

/// Resolve `target` against `document`.
///
/// A selector that matches nothing is a [`EngineError::Resolution`] error;
/// nodes and components pass through without lookup.
pub fn resolve(document: &Document, target: &Target) -> EngineResult<NodeId> {
    match target {
        Target::Selector(selector) => document
            .query_selector(selector)?
            .ok_or_else(|| EngineError::Resolution(selector.clone())),
        Target::Node(node) => Ok(*node),
        Target::Component(component) => Ok(component.node()),
        Target::Body => Ok(document.body()),
    }
}
