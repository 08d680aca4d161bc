use std::collections::BTreeMap;

use serde_json::Value;

use crate::array::FormArrayField;
use crate::field::{FormField, ValidationResult};
use crate::messages::MessageCatalog;
use crate::node::{FormNode, display_path, pointer_segment};
use crate::value::FormValue;

/// Named children kept in declaration order.
///
/// `required` is informational here: an object contributes no error of its
/// own, only the errors of its children.
#[derive(Debug)]
pub struct FormObjectField {
    pub id: String,
    pub key: String,
    pub label: String,
    pub required: bool,
    fields: Vec<(String, FormNode)>,
}

impl FormObjectField {
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            label: label.into(),
            required,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, node: impl Into<FormNode>) -> Self {
        self.insert(name, node);
        self
    }

    /// Adds a child; an existing child with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<FormNode>) -> Option<FormNode> {
        let name = name.into();
        let node = node.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, node)),
            None => {
                self.fields.push((name, node));
                None
            }
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormNode> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormNode> {
        self.fields
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    pub fn single(&self, name: &str) -> Option<&FormField> {
        self.field(name).and_then(FormNode::as_single)
    }

    pub fn single_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.field_mut(name).and_then(FormNode::as_single_mut)
    }

    pub fn array(&self, name: &str) -> Option<&FormArrayField> {
        self.field(name).and_then(FormNode::as_array)
    }

    pub fn array_mut(&mut self, name: &str) -> Option<&mut FormArrayField> {
        self.field_mut(name).and_then(FormNode::as_array_mut)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut FormObjectField> {
        self.field_mut(name).and_then(FormNode::as_object_mut)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FormNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn validate_values(&self) -> ValidationResult {
        self.validate_values_with(MessageCatalog::shared())
    }

    /// Validates every child, in declaration order, without stopping early.
    pub fn validate_values_with(&self, messages: &MessageCatalog) -> ValidationResult {
        let result: ValidationResult = self
            .fields
            .iter()
            .map(|(_, node)| node.validate_with(messages))
            .collect();
        tracing::debug!(
            object = %self.id,
            valid = result.is_valid,
            errors = result.errors.len(),
            "validated object"
        );
        result
    }

    /// Values keyed by child name. Unset single fields are omitted.
    pub fn values(&self) -> BTreeMap<String, FormValue> {
        let mut values = BTreeMap::new();
        for (name, node) in &self.fields {
            let value = node.values();
            if matches!(node, FormNode::Single(_)) && value.is_null() {
                continue;
            }
            values.insert(name.clone(), value);
        }
        values
    }

    pub fn apply_json(&mut self, value: &Value) -> Vec<String> {
        let mut ignored = Vec::new();
        self.apply_at("", value, &mut ignored);
        ignored
    }

    pub(crate) fn apply_at(&mut self, path: &str, value: &Value, ignored: &mut Vec<String>) {
        let Some(map) = value.as_object() else {
            ignored.push(display_path(path));
            return;
        };
        for (name, child) in map {
            let child_path = format!("{path}/{}", pointer_segment(name));
            match self.field_mut(name) {
                Some(node) => node.apply_at(&child_path, child, ignored),
                None => ignored.push(child_path),
            }
        }
    }
}
