//! Labelled form controls.
//!
//! Both controls render as a wrapper `<div>` holding a `<label>` followed by
//! the control itself:
//!
//! ```text
//! div.mb-4
//! ├── label[for=amount]
//! └── input#amount[name=amount]
//! ```

use serde_json::{Map, Value};
use tessera_engine::dom::Document;
use tessera_engine::{ClassList, Component, EngineError, Widget};

use crate::descriptors::{FieldDescriptor, OptionDescriptor};
use crate::error::WidgetResult;

struct Labelled {
    wrapper: Component,
    label: Component,
    control: Component,
}

fn labelled(
    document: &Document,
    kind: &str,
    descriptor: &FieldDescriptor,
    attributes: Map<String, Value>,
) -> WidgetResult<Labelled> {
    let (Some(id), Some(_)) = (descriptor.id(), descriptor.name()) else {
        return Err(EngineError::construction(format!("{kind} must have an id and a name")).into());
    };

    let control = Component::new(document, kind)?;
    if kind == "input" {
        control.set_attribute("type", &descriptor.input_type)?;
    }
    control.set_attributes_json(&Value::Object(attributes))?;

    let label = Component::with_classes(
        document,
        "label",
        ClassList::from(&descriptor.label_class_list),
    )?;
    label.set_text(&descriptor.label_text)?;
    label.set_attribute("for", id)?;

    let wrapper =
        Component::with_classes(document, "div", ClassList::from(&descriptor.class_list))?;
    wrapper.append(vec![label.clone(), control.clone()])?;

    Ok(Labelled {
        wrapper,
        label,
        control,
    })
}

/// A labelled `<input>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    component: Component,
    label: Component,
    input: Component,
}

impl Input {
    /// Build from a descriptor. The descriptor's `type` wins over a `type`
    /// entry in its attributes.
    pub fn new(document: &Document, descriptor: &FieldDescriptor) -> WidgetResult<Self> {
        let mut attributes = descriptor.attributes.clone();
        attributes.remove("type");
        let parts = labelled(document, "input", descriptor, attributes)?;
        Ok(Self {
            component: parts.wrapper,
            label: parts.label,
            input: parts.control,
        })
    }

    pub fn input(&self) -> &Component {
        &self.input
    }

    pub fn label(&self) -> &Component {
        &self.label
    }

    pub fn set_label_text(&self, text: &str) -> WidgetResult<()> {
        Ok(self.label.set_text(text)?)
    }
}

impl Widget for Input {
    fn component(&self) -> &Component {
        &self.component
    }
}

/// A labelled `<select>` with its options.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    component: Component,
    label: Component,
    select: Component,
}

impl Select {
    pub fn new(document: &Document, descriptor: &FieldDescriptor) -> WidgetResult<Self> {
        let parts = labelled(document, "select", descriptor, descriptor.attributes.clone())?;
        let select = Self {
            component: parts.wrapper,
            label: parts.label,
            select: parts.control,
        };
        for option in &descriptor.options {
            select.add_option(option)?;
        }
        Ok(select)
    }

    pub fn add_option(&self, option: &OptionDescriptor) -> WidgetResult<&Self> {
        let document = self.component.document();
        let element = Component::new(document, "option")?;
        element.set_attribute("value", &option.value)?;
        element.set_text(&option.text)?;
        self.select.append(&element)?;
        Ok(self)
    }

    pub fn options(&self) -> Vec<Component> {
        self.select.children()
    }

    pub fn select(&self) -> &Component {
        &self.select
    }

    pub fn label(&self) -> &Component {
        &self.label
    }

    pub fn set_label_text(&self, text: &str) -> WidgetResult<()> {
        Ok(self.label.set_text(text)?)
    }
}

impl Widget for Select {
    fn component(&self) -> &Component {
        &self.component
    }
}

/// Either kind of control, as held by a form.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Input(Input),
    Select(Select),
}

impl Field {
    /// The `<input>` or `<select>` element.
    pub fn control(&self) -> &Component {
        match self {
            Field::Input(input) => input.input(),
            Field::Select(select) => select.select(),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.control().attribute("name")
    }

    pub fn value(&self) -> Option<String> {
        let control = self.control();
        control.document().value(control.node())
    }

    pub fn set_value(&self, value: &str) -> WidgetResult<()> {
        let control = self.control();
        control.document().set_value(control.node(), value)?;
        Ok(())
    }
}

impl Widget for Field {
    fn component(&self) -> &Component {
        match self {
            Field::Input(input) => input.component(),
            Field::Select(select) => select.component(),
        }
    }
}

impl From<Input> for Field {
    fn from(input: Input) -> Self {
        Field::Input(input)
    }
}

impl From<Select> for Field {
    fn from(select: Select) -> Self {
        Field::Select(select)
    }
}
