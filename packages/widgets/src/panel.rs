//! A row of action buttons with an optional upper bound.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use tessera_engine::dom::Document;
use tessera_engine::{ClassList, Component, EngineResult, Renderable, Widget};
use tracing::warn;

use crate::button::Button;
use crate::descriptors::ButtonDescriptor;
use crate::error::{WidgetError, WidgetResult};

#[derive(Default)]
struct PanelState {
    buttons: RefCell<Vec<Button>>,
}

impl Renderable for PanelState {
    fn before_unmount(&self, _component: &Component) -> EngineResult<()> {
        let buttons = self.buttons.borrow().clone();
        for button in &buttons {
            button.remove()?;
        }
        self.buttons.borrow_mut().clear();
        Ok(())
    }
}

/// Creates and tracks buttons without placing them; callers decide where
/// each button goes. The count is mirrored into the `buttonsCount` state
/// entry.
#[derive(Clone)]
pub struct ButtonsPanel {
    component: Component,
    limit: Option<usize>,
    state: Rc<PanelState>,
}

impl std::fmt::Debug for ButtonsPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonsPanel")
            .field("component", &self.component)
            .field("limit", &self.limit)
            .field("buttons", &self.len())
            .finish()
    }
}

impl ButtonsPanel {
    pub fn new(
        document: &Document,
        classes: impl Into<ClassList>,
        limit: Option<usize>,
    ) -> WidgetResult<Self> {
        let component = Component::with_classes(document, "div", classes)?;
        let state = Rc::new(PanelState::default());
        component.set_hooks(state.clone())?;
        let panel = Self {
            component,
            limit,
            state,
        };
        panel.sync_count()?;
        Ok(panel)
    }

    fn sync_count(&self) -> WidgetResult<()> {
        let count = self.len();
        Ok(self.component.set_state(json!({ "buttonsCount": count }))?)
    }

    /// Create a button, or `None` once the limit is reached.
    pub fn add_button(&self, descriptor: &ButtonDescriptor) -> WidgetResult<Option<Button>> {
        if self.limit.is_some_and(|limit| self.len() >= limit) {
            warn!(component = %self.component.id(), limit = ?self.limit, "Maximum number of buttons reached");
            return Ok(None);
        }
        let button = Button::new(self.component.document(), descriptor)?;
        self.state.buttons.borrow_mut().push(button.clone());
        self.sync_count()?;
        Ok(Some(button))
    }

    /// Remove and tear down the button at `index`.
    pub fn remove_button(&self, index: usize) -> WidgetResult<()> {
        let button = {
            let mut buttons = self.state.buttons.borrow_mut();
            if index >= buttons.len() {
                return Err(WidgetError::NoSuchButton(index));
            }
            buttons.remove(index)
        };
        button.remove()?;
        self.sync_count()
    }

    pub fn buttons(&self) -> Vec<Button> {
        self.state.buttons.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.state.buttons.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The `buttonsCount` state entry.
    pub fn buttons_count(&self) -> usize {
        self.component.state_as("buttonsCount").unwrap_or_default()
    }
}

impl Widget for ButtonsPanel {
    fn component(&self) -> &Component {
        &self.component
    }
}
