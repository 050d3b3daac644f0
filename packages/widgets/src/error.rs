//! Error types for the widget layer

use tessera_engine::dom::DomError;
use tessera_engine::EngineError;
use thiserror::Error;

pub type WidgetResult<T> = Result<T, WidgetError>;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Row has {found} fields, table has {expected} columns")]
    RowShape { expected: usize, found: usize },

    #[error("No button at index {0}")]
    NoSuchButton(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DomError> for WidgetError {
    fn from(e: DomError) -> Self {
        WidgetError::Engine(EngineError::Dom(e))
    }
}

impl WidgetError {
    /// The engine error underneath, if any.
    pub fn as_engine(&self) -> Option<&EngineError> {
        match self {
            WidgetError::Engine(e) => Some(e),
            _ => None,
        }
    }
}
