use thiserror::Error;

use crate::node::NodeId;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Invalid tag name: '{0}'")]
    InvalidTagName(String),

    #[error("Invalid class token: '{0}'")]
    InvalidToken(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Cannot insert {child} into {parent}: {message}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        message: String,
    },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

impl DomError {
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    pub fn hierarchy(parent: NodeId, child: NodeId, message: impl Into<String>) -> Self {
        Self::HierarchyRequest {
            parent,
            child,
            message: message.into(),
        }
    }
}
