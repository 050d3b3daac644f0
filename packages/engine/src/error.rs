//! Error types for the component engine

use tessera_dom::DomError;
use thiserror::Error;

use crate::component::ComponentId;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No element matches selector '{0}'")]
    Resolution(String),

    #[error("Type error: expected {expected}, got {found}")]
    Type { expected: String, found: String },

    #[error("Insertion mode '{0}' requires a reference node")]
    MissingReference(String),

    #[error("Insertion mode '{0}' requires the target to have a parent")]
    NoParent(String),

    #[error("Invalid insertion mode: '{0}'")]
    InvalidMode(String),

    #[error("Missing target: {0}")]
    MissingTarget(String),

    #[error("Construction error: {0}")]
    Construction(String),

    #[error("Component {0} has been removed")]
    Removed(ComponentId),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

impl EngineError {
    pub fn type_error(expected: impl Into<String>, found: &serde_json::Value) -> Self {
        Self::Type {
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }
}

/// Short name of a JSON value's shape, used in type errors.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
