//! # Application page
//!
//! The create/view page: a panel with two action buttons, a modal holding
//! the creation form, and a second modal listing rows in a table.
//!
//! ```text
//! <target>
//! └── div.flex.flex-row.justify-center     (panel)
//!     └── div.flex.flex-row
//!         ├── button.btn-primary            opens the form modal
//!         └── button.btn-secondary          opens the list modal
//! body
//! ├── div.fixed.inset-0 ... .hidden         (form modal)
//! │   └── div.absolute ...
//! │       └── form.space-y-4
//! └── div.fixed.inset-0 ... .hidden         (list modal, when columns are set)
//!     └── div.absolute ...
//!         └── table
//! ```

use std::rc::Rc;

use tessera_engine::dom::Document;
use tessera_engine::{
    AppContext, Callback, Component, EngineError, RenderOptions, Target, Widget,
};
use tracing::{info, warn};

use crate::button::Button;
use crate::descriptors::{ButtonDescriptor, FieldDescriptor, PageDescriptor};
use crate::error::WidgetResult;
use crate::form::Form;
use crate::modal::Modal;
use crate::panel::ButtonsPanel;
use crate::table::Table;
use crate::transport::{Notifier, Transport};

pub const PANEL_CLASSES: &str = "flex flex-row justify-center max-w-4xl mx-auto mb-4";
pub const PANEL_ROW_CLASSES: &str = "flex flex-row";
pub const CREATE_BUTTON_CLASSES: &str = "btn btn-primary w-32 mr-5";
pub const VIEW_BUTTON_CLASSES: &str = "btn btn-secondary w-32 ml-5";
pub const FORM_CLASSES: &str = "space-y-4";
pub const FORM_WRAPPER_CLASSES: &str = "absolute top-1/2 -translate-y-1/2 left-1/2 transform \
     -translate-x-1/2 bg-base-100 w-96 p-6 rounded-lg shadow-3xl";
pub const CANCEL_BUTTON_CLASSES: &str = "btn btn-secondary w-32 mr-4";
pub const SUBMIT_BUTTON_CLASSES: &str = "btn btn-primary w-32 ml-4";
pub const TABLE_CLASSES: &str = "table w-full";
pub const CLOSE_FORM_ID: &str = "close-form";

/// Put `content` inside a centred card inside a fresh modal.
fn modal_around(document: &Document, content: &Component) -> WidgetResult<Modal> {
    let card = Component::with_classes(document, "div", FORM_WRAPPER_CLASSES)?;
    card.append(content)?;
    let modal = Modal::new(document)?;
    modal.component().append(&card)?;
    Ok(modal)
}

fn open_on_click(button: &Button, modal: &Modal) -> WidgetResult<Callback> {
    let modal = modal.clone();
    let callback = button.component().on("click", move |_| {
        if let Err(e) = modal.open() {
            warn!(error = %e, "Could not open modal");
        }
    })?;
    Ok(callback)
}

#[derive(Debug, Clone)]
pub struct ApplicationPage {
    app: AppContext,
    panel: ButtonsPanel,
    create_button: Button,
    view_button: Button,
    form: Form,
    form_modal: Modal,
    table: Option<Table>,
    list_modal: Option<Modal>,
}

impl ApplicationPage {
    /// Build every widget of the page, unmounted. Top-level widgets are
    /// registered with `app` so [`AppContext::teardown`] removes the page.
    pub fn new(app: &AppContext, descriptor: &PageDescriptor) -> WidgetResult<Self> {
        let document = app.document();
        let labels = &descriptor.labels;

        let panel = ButtonsPanel::new(document, PANEL_CLASSES, Some(2))?;
        let create_button =
            panel.add_button(&ButtonDescriptor::new(CREATE_BUTTON_CLASSES, &labels.create))?;
        let view_button =
            panel.add_button(&ButtonDescriptor::new(VIEW_BUTTON_CLASSES, &labels.view))?;
        let (Some(create_button), Some(view_button)) = (create_button, view_button) else {
            return Err(EngineError::construction("Something went wrong with buttons creation").into());
        };
        let row = Component::with_classes(document, "div", PANEL_ROW_CLASSES)?;
        row.append(vec![
            create_button.component().clone(),
            view_button.component().clone(),
        ])?;
        panel.component().append(&row)?;

        let form = Form::new(document, FORM_CLASSES)?;
        let cancel_button = form.add_button(
            &ButtonDescriptor::new(CANCEL_BUTTON_CLASSES, &labels.cancel)
                .attribute("type", "button")
                .attribute("id", CLOSE_FORM_ID),
        )?;
        form.add_button(
            &ButtonDescriptor::new(SUBMIT_BUTTON_CLASSES, &labels.create)
                .attribute("type", "submit"),
        )?;
        let inputs: Vec<FieldDescriptor> = descriptor
            .inputs
            .iter()
            .cloned()
            .map(FieldDescriptor::with_derived_identity)
            .collect();
        let selects: Vec<FieldDescriptor> = descriptor
            .selects
            .iter()
            .cloned()
            .map(FieldDescriptor::with_derived_identity)
            .collect();
        form.add_inputs(&inputs)?.add_selects(&selects)?;
        if let Some(token) = &descriptor.csrf_token {
            let hidden = Component::new(document, "input")?;
            hidden.set_attributes([
                ("type", "hidden"),
                ("name", "csrfmiddlewaretoken"),
                ("value", token.as_str()),
            ])?;
            form.component().append(&hidden)?;
        }

        let form_modal = modal_around(document, form.component())?;
        let closing = form_modal.clone();
        cancel_button.component().on("click", move |_| {
            if let Err(e) = closing.close() {
                warn!(error = %e, "Could not close modal");
            }
        })?;
        open_on_click(&create_button, &form_modal)?;

        let (table, list_modal) = if descriptor.columns.is_empty() {
            (None, None)
        } else {
            let table = Table::new(document, &descriptor.columns, TABLE_CLASSES)?;
            let list_modal = modal_around(document, table.component())?;
            open_on_click(&view_button, &list_modal)?;
            (Some(table), Some(list_modal))
        };

        let registry = app.registry();
        registry.register(panel.component())?;
        registry.register(form_modal.component())?;
        if let Some(list_modal) = &list_modal {
            registry.register(list_modal.component())?;
        }

        Ok(Self {
            app: app.clone(),
            panel,
            create_button,
            view_button,
            form,
            form_modal,
            table,
            list_modal,
        })
    }

    /// Place the panel inside `target` and the modals at the end of the body.
    pub fn mount(&self, target: impl Into<Target>) -> WidgetResult<()> {
        self.panel.component().append_to(target)?;
        self.form_modal.render(RenderOptions::default())?;
        if let Some(list_modal) = &self.list_modal {
            list_modal.render(RenderOptions::default())?;
        }
        info!(components = self.app.registry().len(), "Page mounted");
        Ok(())
    }

    /// Post the form to `path` whenever it is submitted.
    pub fn listen<T, N>(&self, path: &str, transport: Rc<T>, notifier: Rc<N>) -> WidgetResult<()>
    where
        T: Transport + 'static,
        N: Notifier + 'static,
    {
        self.form.listen(path, transport, notifier)?;
        Ok(())
    }

    /// Fetch rows for the list table. Does nothing without columns.
    pub async fn load_rows<T: Transport>(&self, transport: &T, path: &str) -> WidgetResult<usize> {
        match &self.table {
            Some(table) => table.load(transport, path).await,
            None => Ok(0),
        }
    }

    pub fn panel(&self) -> &ButtonsPanel {
        &self.panel
    }

    pub fn create_button(&self) -> &Button {
        &self.create_button
    }

    pub fn view_button(&self) -> &Button {
        &self.view_button
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_modal(&self) -> &Modal {
        &self.form_modal
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn list_modal(&self) -> Option<&Modal> {
        self.list_modal.as_ref()
    }
}
