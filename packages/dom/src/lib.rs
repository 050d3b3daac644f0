//! # Tessera DOM
//!
//! In-memory document model consumed by the component engine.
//!
//! Nodes live in an arena owned by a [`Document`] and are addressed by
//! copyable [`NodeId`]s. The model covers what the engine needs from a
//! browser document: element creation, tree mutation, attributes/classes/
//! inline styles, text content, a CSS selector subset, bubbling events with
//! removable listeners, form values and HTML serialization.
//!
//! ```rust
//! use tessera_dom::{Document, Event};
//! use std::rc::Rc;
//! use std::cell::Cell;
//!
//! let doc = Document::new();
//! let button = doc.create_element("button").unwrap();
//! doc.append_child(doc.body(), button).unwrap();
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&clicks);
//! doc.add_event_listener(button, "click", Rc::new(move |_: &mut Event| {
//!     counter.set(counter.get() + 1);
//! })).unwrap();
//!
//! doc.click(button).unwrap();
//! assert_eq!(clicks.get(), 1);
//! ```

mod document;
mod error;
mod events;
mod html;
mod node;
mod selector;

#[cfg(test)]
mod tests_tree;



#[cfg(test)]
mod tests_forms;

pub use document::{Document, WeakDocument};
pub use error::{DomError, DomResult};
pub use events::{Event, Listener, ListenerId};
pub use html::{escape_html, HtmlOptions};
pub use node::{is_valid_tag_name, is_void_element, ElementData, NodeId, NodeKind};
pub use selector::Selector;
