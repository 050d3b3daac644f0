//! # Form
//!
//! A `<form>` that collects labelled fields above a right-aligned row of
//! buttons and posts itself through a [`Transport`] when submitted.
//!
//! ```text
//! form
//! ├── div            (field)
//! ├── div            (field)
//! └── div.flex.justify-end.space-x-2
//!     ├── button[type=button]
//!     └── button[type=submit]
//! ```
//!
//! Submissions run as local tasks. Removing the form aborts any that are
//! still waiting on the transport.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;
use tessera_engine::dom::{Document, NodeId};
use tessera_engine::{
    Callback, ClassList, Component, EngineError, EngineResult, InsertionMode, RenderOptions,
    Renderable, Widget,
};
use tokio::task::AbortHandle;
use tracing::{debug, error, warn};

use crate::button::Button;
use crate::descriptors::{ButtonDescriptor, FieldDescriptor};
use crate::error::WidgetResult;
use crate::field::{Field, Input, Select};
use crate::transport::{Notifier, Request, Transport};

pub const BUTTONS_WRAPPER_CLASSES: &str = "flex justify-end space-x-2";
pub const CSRF_FIELD_SELECTOR: &str = "[name=csrfmiddlewaretoken]";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// How the server answered a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted { message: Option<String> },
    Rejected { errors: Value },
}

impl SubmitOutcome {
    /// The text shown to the user, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            SubmitOutcome::Accepted { message } => message.clone(),
            SubmitOutcome::Rejected { errors } => Some(format!("Error: {errors}")),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Value,
}

impl From<SubmitResponse> for SubmitOutcome {
    fn from(response: SubmitResponse) -> Self {
        if response.status == "success" {
            SubmitOutcome::Accepted {
                message: response.message.filter(|message| !message.is_empty()),
            }
        } else {
            SubmitOutcome::Rejected {
                errors: response.errors,
            }
        }
    }
}

struct FormState {
    buttons_wrapper: Component,
    fields: RefCell<Vec<Field>>,
    buttons: RefCell<Vec<Button>>,
    submissions: RefCell<Vec<AbortHandle>>,
}

impl FormState {
    fn track(&self, handle: AbortHandle) {
        let mut submissions = self.submissions.borrow_mut();
        submissions.retain(|pending| !pending.is_finished());
        submissions.push(handle);
    }

    fn abort_submissions(&self) {
        let pending: Vec<AbortHandle> = self.submissions.borrow_mut().drain(..).collect();
        if !pending.is_empty() {
            debug!(count = pending.len(), "Aborting pending submissions");
        }
        for handle in pending {
            handle.abort();
        }
    }
}

impl Renderable for FormState {
    fn before_unmount(&self, _component: &Component) -> EngineResult<()> {
        self.abort_submissions();
        // Fields are placed next to the wrapper rather than appended, so the
        // form does not own them.
        let fields = self.fields.borrow().clone();
        for field in &fields {
            field.remove()?;
        }
        self.fields.borrow_mut().clear();
        Ok(())
    }
}

#[derive(Clone)]
pub struct Form {
    component: Component,
    state: Rc<FormState>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("component", &self.component)
            .field("fields", &self.state.fields.borrow().len())
            .finish()
    }
}

impl Form {
    pub fn new(document: &Document, classes: impl Into<ClassList>) -> WidgetResult<Self> {
        let component = Component::with_classes(document, "form", classes)?;
        let buttons_wrapper = Component::with_classes(document, "div", BUTTONS_WRAPPER_CLASSES)?;
        component.append(&buttons_wrapper)?;

        let state = Rc::new(FormState {
            buttons_wrapper,
            fields: RefCell::new(Vec::new()),
            buttons: RefCell::new(Vec::new()),
            submissions: RefCell::new(Vec::new()),
        });
        component.set_hooks(state.clone())?;
        Ok(Self { component, state })
    }

    pub fn buttons_wrapper(&self) -> &Component {
        &self.state.buttons_wrapper
    }

    /// Place a field after the existing ones, above the buttons.
    pub fn add_field(&self, field: impl Into<Field>) -> WidgetResult<&Self> {
        let field = field.into();
        field.render(
            RenderOptions::new(&self.state.buttons_wrapper).method(InsertionMode::BeforeSibling),
        )?;
        self.state.fields.borrow_mut().push(field);
        Ok(self)
    }

    pub fn add_input(&self, descriptor: &FieldDescriptor) -> WidgetResult<&Self> {
        let input = Input::new(self.component.document(), descriptor)?;
        self.add_field(input)
    }

    pub fn add_inputs(&self, descriptors: &[FieldDescriptor]) -> WidgetResult<&Self> {
        for descriptor in descriptors {
            self.add_input(descriptor)?;
        }
        Ok(self)
    }

    pub fn add_select(&self, descriptor: &FieldDescriptor) -> WidgetResult<&Self> {
        let select = Select::new(self.component.document(), descriptor)?;
        self.add_field(select)
    }

    pub fn add_selects(&self, descriptors: &[FieldDescriptor]) -> WidgetResult<&Self> {
        for descriptor in descriptors {
            self.add_select(descriptor)?;
        }
        Ok(self)
    }

    pub fn add_button(&self, descriptor: &ButtonDescriptor) -> WidgetResult<Button> {
        let button = Button::new(self.component.document(), descriptor)?;
        self.state.buttons_wrapper.append(button.component())?;
        self.state.buttons.borrow_mut().push(button.clone());
        Ok(button)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.state.fields.borrow().clone()
    }

    /// The field whose control carries `name`.
    pub fn field(&self, name: &str) -> Option<Field> {
        self.state
            .fields
            .borrow()
            .iter()
            .find(|field| field.name().as_deref() == Some(name))
            .cloned()
    }

    pub fn buttons(&self) -> Vec<Button> {
        self.state.buttons.borrow().clone()
    }

    /// Whether the button row currently holds a `type="submit"` button.
    pub fn has_submit_button(&self) -> bool {
        let document = self.component.document();
        document
            .child_elements(self.state.buttons_wrapper.node())
            .into_iter()
            .any(|button| {
                document
                    .attribute(button, "type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("submit"))
            })
    }

    /// Number of submissions still waiting on the transport.
    pub fn pending_submissions(&self) -> usize {
        self.state
            .submissions
            .borrow()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn form_data(&self) -> WidgetResult<Vec<(String, String)>> {
        Ok(self.component.document().form_data(self.component.node())?)
    }

    pub fn reset(&self) -> WidgetResult<()> {
        Ok(self.component.document().reset_form(self.component.node())?)
    }

    /// Handle `submit` events by posting the form to `path`.
    ///
    /// The default submission is always prevented. Each submission runs as a
    /// task on the current [`tokio::task::LocalSet`], so events must be
    /// dispatched from inside one.
    pub fn listen<T, N>(
        &self,
        path: &str,
        transport: Rc<T>,
        notifier: Rc<N>,
    ) -> WidgetResult<Callback>
    where
        T: Transport + 'static,
        N: Notifier + 'static,
    {
        if !self.has_submit_button() {
            return Err(EngineError::construction("Form must have a submit button").into());
        }

        let document = self.component.document().downgrade();
        let state = Rc::downgrade(&self.state);
        let form = self.component.node();
        let target = path.to_string();

        let callback = self.component.on("submit", move |event| {
            event.prevent_default();
            let (Some(document), Some(state)) = (document.upgrade(), state.upgrade()) else {
                return;
            };
            let transport = Rc::clone(&transport);
            let notifier = Rc::clone(&notifier);
            let path = target.clone();
            let task = tokio::task::spawn_local(async move {
                let result =
                    submit(&document, form, &path, transport.as_ref(), notifier.as_ref()).await;
                if let Err(e) = result {
                    error!(%form, path = %path, error = %e, "Form submission failed");
                }
            });
            state.track(task.abort_handle());
        })?;
        debug!(component = %self.component.id(), path, "Form listening");
        Ok(callback)
    }

    /// Submit once without going through an event.
    pub async fn submit<T, N>(
        &self,
        path: &str,
        transport: &T,
        notifier: &N,
    ) -> WidgetResult<SubmitOutcome>
    where
        T: Transport,
        N: Notifier,
    {
        submit(self.component.document(), self.component.node(), path, transport, notifier).await
    }
}

impl Widget for Form {
    fn component(&self) -> &Component {
        &self.component
    }
}

/// Token from a hidden CSRF field, looked up next to the form first and then
/// anywhere in the document.
fn csrf_token(document: &Document, form: NodeId) -> WidgetResult<Option<String>> {
    let scope = document.parent(form).unwrap_or(form);
    let field = match document.query_selector_within(scope, CSRF_FIELD_SELECTOR)? {
        Some(field) => Some(field),
        None => document.query_selector(CSRF_FIELD_SELECTOR)?,
    };
    Ok(field
        .and_then(|field| document.value(field))
        .filter(|token| !token.is_empty()))
}

async fn submit<T, N>(
    document: &Document,
    form: NodeId,
    path: &str,
    transport: &T,
    notifier: &N,
) -> WidgetResult<SubmitOutcome>
where
    T: Transport,
    N: Notifier,
{
    let data = document.form_data(form)?;
    let mut request = Request::post(path).form(data);
    if let Some(token) = csrf_token(document, form)? {
        request = request.header(CSRF_HEADER, token);
    }
    debug!(%form, path, fields = request.form.len(), "Submitting form");

    let response = transport.send(request).await?;
    let outcome = SubmitOutcome::from(serde_json::from_value::<SubmitResponse>(response)?);

    match &outcome {
        SubmitOutcome::Accepted { message } => {
            if let Some(message) = message {
                notifier.notify(message);
            }
            if document.exists(form) {
                document.reset_form(form)?;
            }
        }
        SubmitOutcome::Rejected { errors } => {
            warn!(%form, path, %errors, "Submission rejected");
            if let Some(text) = outcome.message() {
                notifier.notify(&text);
            }
        }
    }
    Ok(outcome)
}
