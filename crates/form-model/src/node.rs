use serde_json::Value;

use crate::array::FormArrayField;
use crate::field::{FormField, ValidationResult};
use crate::messages::MessageCatalog;
use crate::object::FormObjectField;
use crate::value::FormValue;

/// Any node of a form tree.
#[derive(Debug)]
pub enum FormNode {
    Single(FormField),
    Array(FormArrayField),
    Object(FormObjectField),
}

impl FormNode {
    pub fn id(&self) -> &str {
        match self {
            FormNode::Single(field) => &field.id,
            FormNode::Array(array) => &array.id,
            FormNode::Object(object) => &object.id,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            FormNode::Single(field) => &field.key,
            FormNode::Array(array) => &array.key,
            FormNode::Object(object) => &object.key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FormNode::Single(field) => &field.label,
            FormNode::Array(array) => &array.label,
            FormNode::Object(object) => &object.label,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            FormNode::Single(field) => field.required,
            FormNode::Array(array) => array.required,
            FormNode::Object(object) => object.required,
        }
    }

    pub fn validate(&self) -> ValidationResult {
        self.validate_with(MessageCatalog::shared())
    }

    pub fn validate_with(&self, messages: &MessageCatalog) -> ValidationResult {
        match self {
            FormNode::Single(field) => field.validate_with(messages),
            FormNode::Array(array) => array.validate_values_with(messages),
            FormNode::Object(object) => object.validate_values_with(messages),
        }
    }

    /// Value document of this node; unset leaves read as `Null`.
    pub fn values(&self) -> FormValue {
        match self {
            FormNode::Single(field) => field.value(),
            FormNode::Array(array) => FormValue::List(array.values()),
            FormNode::Object(object) => FormValue::Object(object.values()),
        }
    }

    /// Fills the subtree from a JSON document shaped like [`FormNode::values`].
    ///
    /// Returns the JSON pointers of the parts that could not be applied.
    pub fn apply_json(&mut self, value: &Value) -> Vec<String> {
        let mut ignored = Vec::new();
        self.apply_at("", value, &mut ignored);
        ignored
    }

    pub(crate) fn apply_at(&mut self, path: &str, value: &Value, ignored: &mut Vec<String>) {
        match self {
            FormNode::Single(field) => {
                if !field.set_value(FormValue::from_json(value)) {
                    ignored.push(display_path(path));
                }
            }
            FormNode::Array(array) => array.apply_at(path, value, ignored),
            FormNode::Object(object) => object.apply_at(path, value, ignored),
        }
    }

    pub fn as_single(&self) -> Option<&FormField> {
        match self {
            FormNode::Single(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_single_mut(&mut self) -> Option<&mut FormField> {
        match self {
            FormNode::Single(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&FormArrayField> {
        match self {
            FormNode::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut FormArrayField> {
        match self {
            FormNode::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FormObjectField> {
        match self {
            FormNode::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut FormObjectField> {
        match self {
            FormNode::Object(object) => Some(object),
            _ => None,
        }
    }
}

pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Escapes an object key for use as one JSON pointer segment.
pub(crate) fn pointer_segment(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

impl From<FormField> for FormNode {
    fn from(field: FormField) -> Self {
        FormNode::Single(field)
    }
}

impl From<FormArrayField> for FormNode {
    fn from(array: FormArrayField) -> Self {
        FormNode::Array(array)
    }
}

impl From<FormObjectField> for FormNode {
    fn from(object: FormObjectField) -> Self {
        FormNode::Object(object)
    }
}
