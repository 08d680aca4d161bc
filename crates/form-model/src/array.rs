use std::fmt;

use serde_json::Value;

use crate::field::{ErrorKind, FieldError, ValidationResult};
use crate::messages::MessageCatalog;
use crate::node::{FormNode, display_path};
use crate::value::FormValue;

/// Builds the element node for a given position.
pub type ElementFactory = Box<dyn Fn(usize) -> FormNode>;

/// Repeatable sequence of elements sharing one templated shape.
///
/// Elements are created by the factory with the index they were appended
/// at. Removing an element shifts later elements left; their ids are not
/// regenerated. A later `append` still passes the current length, so after
/// a removal two elements can share an id and errors can carry the same
/// `field_id`; [`ValidationResult::error_for`] then finds only the first.
pub struct FormArrayField {
    pub id: String,
    pub key: String,
    pub label: String,
    pub required: bool,
    factory: ElementFactory,
    elements: Vec<FormNode>,
}

impl fmt::Debug for FormArrayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormArrayField")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl FormArrayField {
    pub fn new<F, N>(
        id: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
        required: bool,
        factory: F,
    ) -> Self
    where
        F: Fn(usize) -> N + 'static,
        N: Into<FormNode>,
    {
        Self {
            id: id.into(),
            key: key.into(),
            label: label.into(),
            required,
            factory: Box::new(move |index| -> FormNode { factory(index).into() }),
            elements: Vec::new(),
        }
    }

    /// Builds a detached element for `index` without adding it.
    pub fn template(&self, index: usize) -> FormNode {
        (self.factory)(index)
    }

    /// Creates the element for the next position and returns it for filling.
    pub fn append(&mut self) -> &mut FormNode {
        let index = self.elements.len();
        let element = (self.factory)(index);
        tracing::debug!(array = %self.id, index, element = element.id(), "appended element");
        self.elements.push(element);
        &mut self.elements[index]
    }

    /// Removes the element at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<FormNode> {
        if index >= self.elements.len() {
            tracing::debug!(array = %self.id, index, len = self.elements.len(), "remove out of range");
            return None;
        }
        let removed = self.elements.remove(index);
        tracing::debug!(array = %self.id, index, element = removed.id(), "removed element");
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FormNode> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FormNode> {
        self.elements.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormNode> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FormNode> {
        self.elements.iter_mut()
    }

    pub fn validate_values(&self) -> ValidationResult {
        self.validate_values_with(MessageCatalog::shared())
    }

    pub fn validate_values_with(&self, messages: &MessageCatalog) -> ValidationResult {
        if self.required && self.elements.is_empty() {
            return ValidationResult::from_errors(vec![FieldError {
                field_id: self.id.clone(),
                message: messages.required(&self.label),
                kind: ErrorKind::Required,
            }]);
        }
        self.elements
            .iter()
            .map(|element| element.validate_with(messages))
            .collect()
    }

    /// Element values in order; unset single elements read as `Null`.
    pub fn values(&self) -> Vec<FormValue> {
        self.elements.iter().map(FormNode::values).collect()
    }

    pub(crate) fn apply_at(&mut self, path: &str, value: &Value, ignored: &mut Vec<String>) {
        let Some(items) = value.as_array() else {
            ignored.push(display_path(path));
            return;
        };
        self.elements.truncate(items.len());
        while self.elements.len() < items.len() {
            self.append();
        }
        for (index, (element, item)) in self.elements.iter_mut().zip(items).enumerate() {
            element.apply_at(&format!("{path}/{index}"), item, ignored);
        }
    }
}
