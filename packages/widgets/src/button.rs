use serde_json::Value;
use tessera_engine::dom::Document;
use tessera_engine::{ClassList, Component, Widget};

use crate::descriptors::ButtonDescriptor;
use crate::error::WidgetResult;

/// A `<button>` with classes, attributes and a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    component: Component,
}

impl Button {
    pub fn new(document: &Document, descriptor: &ButtonDescriptor) -> WidgetResult<Self> {
        let component =
            Component::with_classes(document, "button", ClassList::from(&descriptor.class_list))?;
        if !descriptor.attributes.is_empty() {
            component.set_attributes_json(&Value::Object(descriptor.attributes.clone()))?;
        }
        component.set_text(&descriptor.text)?;
        Ok(Self { component })
    }

    /// Explicitly `type="submit"`.
    pub fn is_submit(&self) -> bool {
        self.component
            .attribute("type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("submit"))
    }

    pub fn text(&self) -> String {
        self.component.text()
    }
}

impl Widget for Button {
    fn component(&self) -> &Component {
        &self.component
    }
}
