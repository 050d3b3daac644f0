//! # Tessera Engine
//!
//! A small component engine over [`tessera_dom`]. A [`Component`] wraps one
//! element and manages its attributes, content, local state, event
//! listeners and lifecycle hooks. Widgets are built by composition: they own
//! a component and install a [`Renderable`] on it.
//!
//! ```rust
//! use tessera_engine::{AppContext, RenderOptions};
//!
//! let app = AppContext::new();
//! let card = app.component("div", "card").unwrap();
//! card.set_text("Hello, world!").unwrap();
//! card.render(RenderOptions::default()).unwrap();
//! assert!(card.is_mounted());
//!
//! app.teardown();
//! assert!(card.is_removed());
//! ```

pub mod benchmarks;
pub mod component;
pub mod context;
pub mod error;
pub mod insertion;
pub mod lifecycle;
pub mod listeners;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod tests_component;

#[cfg(test)]
mod tests_lifecycle;


pub use component::{Children, ClassList, Component, ComponentId, Content, RenderOptions};
pub use context::AppContext;
pub use error::{EngineError, EngineResult};
pub use insertion::{insert, InsertionMode};
pub use lifecycle::{NoHooks, Renderable, Widget};
pub use listeners::{Callback, EventRegistry, Unsubscribe};
pub use registry::{CleanupReport, ComponentRegistry};
pub use resolver::{resolve, Target};

// Re-export the document layer so widgets need a single dependency.
pub use tessera_dom as dom;
