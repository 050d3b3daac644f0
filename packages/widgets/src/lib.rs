//! # Tessera Widgets
//!
//! Application-level widgets built on [`tessera_engine`] by composition:
//! each widget owns a [`Component`](tessera_engine::Component) and, when it
//! needs lifecycle behaviour, installs its own state as the component's
//! [`Renderable`](tessera_engine::Renderable).
//!
//! Network access goes through the [`Transport`] trait and runs on the
//! current thread. Anything that submits or loads data must be driven from a
//! [`tokio::task::LocalSet`].
//!
//! ```rust
//! use tessera_engine::{AppContext, Widget};
//! use tessera_widgets::{ButtonDescriptor, Form};
//!
//! let app = AppContext::new();
//! let form = Form::new(app.document(), "space-y-4").unwrap();
//! form.add_button(&ButtonDescriptor::new("btn", "Save").attribute("type", "submit"))
//!     .unwrap();
//! assert!(form.has_submit_button());
//! ```

pub mod button;
pub mod descriptors;
pub mod error;
pub mod field;
pub mod form;
pub mod modal;
pub mod page;
pub mod panel;
pub mod table;
pub mod text;
pub mod transport;

#[cfg(test)]
mod tests_form;


pub use button::Button;
pub use descriptors::{
    ButtonDescriptor, ClassSpec, FieldDescriptor, OptionDescriptor, PageDescriptor, PageLabels,
};
pub use error::{WidgetError, WidgetResult};
pub use field::{Field, Input, Select};
pub use form::{Form, SubmitOutcome};
pub use modal::Modal;
pub use page::ApplicationPage;
pub use panel::ButtonsPanel;
pub use table::{Row, Table};
pub use text::clean_text;
pub use transport::{LogNotifier, Method, Notifier, Request, Transport};
