//! # Descriptors
//!
//! Static configuration consumed by the form-building widgets. These are
//! plain serde types so pages can be described in JSON:
//!
//! ```json
//! {
//!   "type": "number",
//!   "classList": "mb-4",
//!   "attributes": { "id": "amount", "name": "amount", "step": "0.01" },
//!   "labelText": "Amount",
//!   "labelClassList": "block text-sm font-medium text-gray-700"
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tessera_engine::ClassList;

use crate::text::clean_text;

/// Class tokens given either as one space-separated string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassSpec {
    One(String),
    Many(Vec<String>),
}

impl Default for ClassSpec {
    fn default() -> Self {
        ClassSpec::Many(Vec::new())
    }
}

impl From<&ClassSpec> for ClassList {
    fn from(spec: &ClassSpec) -> Self {
        match spec {
            ClassSpec::One(classes) => ClassList::from(classes.as_str()),
            ClassSpec::Many(classes) => ClassList::from(classes.as_slice()),
        }
    }
}

impl From<&str> for ClassSpec {
    fn from(classes: &str) -> Self {
        ClassSpec::One(classes.to_string())
    }
}

fn default_input_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDescriptor {
    pub value: String,
    pub text: String,
}

/// An `<input>` or `<select>` with its label, wrapped in a `<div>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Input type; ignored for selects.
    #[serde(rename = "type", default = "default_input_type")]
    pub input_type: String,
    #[serde(default)]
    pub class_list: ClassSpec,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub label_text: String,
    #[serde(default, alias = "labelCLassList")]
    pub label_class_list: ClassSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDescriptor>,
}

impl FieldDescriptor {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.attribute("name").filter(|name| !name.is_empty())
    }

    /// Fill a missing `id` or `name` with a token derived from the label.
    pub fn with_derived_identity(mut self) -> Self {
        let token = clean_text(&self.label_text);
        if token.is_empty() {
            return self;
        }
        for key in ["id", "name"] {
            let missing = self
                .attributes
                .get(key)
                .and_then(Value::as_str)
                .map_or(true, str::is_empty);
            if missing {
                self.attributes
                    .insert(key.to_string(), Value::String(token.clone()));
            }
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonDescriptor {
    #[serde(default)]
    pub class_list: ClassSpec,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub text: String,
}

impl ButtonDescriptor {
    pub fn new(classes: &str, text: &str) -> Self {
        Self {
            class_list: ClassSpec::from(classes),
            attributes: Map::new(),
            text: text.to_string(),
        }
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_string(), Value::String(value.to_string()));
        self
    }
}

/// Labels for the action buttons of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLabels {
    pub create: String,
    pub view: String,
    pub cancel: String,
}

impl Default for PageLabels {
    fn default() -> Self {
        Self {
            create: "Add".to_string(),
            view: "View".to_string(),
            cancel: "Cancel".to_string(),
        }
    }
}

/// Everything needed to build the create/view page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    #[serde(default)]
    pub inputs: Vec<FieldDescriptor>,
    #[serde(default)]
    pub selects: Vec<FieldDescriptor>,
    #[serde(default)]
    pub labels: PageLabels,
    /// Columns of the list table, in display order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Token written into a hidden `csrfmiddlewaretoken` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}
