use tessera_engine::dom::Document;
use tessera_engine::{ClassList, Component, Widget};

use crate::error::WidgetResult;

pub const MODAL_CLASSES: &str =
    "fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center hidden";
const HIDDEN: &str = "hidden";

/// Full-screen overlay, hidden until opened.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    component: Component,
}

impl Modal {
    pub fn new(document: &Document) -> WidgetResult<Self> {
        Self::with_classes(document, MODAL_CLASSES)
    }

    pub fn with_classes(document: &Document, classes: impl Into<ClassList>) -> WidgetResult<Self> {
        let component = Component::with_classes(document, "div", classes)?;
        Ok(Self { component })
    }

    pub fn open(&self) -> WidgetResult<()> {
        Ok(self.component.remove_class(HIDDEN)?)
    }

    pub fn close(&self) -> WidgetResult<()> {
        Ok(self.component.add_class(HIDDEN)?)
    }

    /// Flip visibility; returns whether the modal is now open.
    pub fn toggle(&self) -> WidgetResult<bool> {
        let hidden = self.component.toggle_class(HIDDEN)?;
        Ok(!hidden)
    }

    pub fn is_open(&self) -> bool {
        !self.component.has_class(HIDDEN)
    }
}

impl Widget for Modal {
    fn component(&self) -> &Component {
        &self.component
    }
}
