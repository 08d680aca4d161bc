use std::rc::Rc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::object::FormObjectField;
use crate::schema::build::{Renderer, build_object};
use crate::schema::check::{SchemaError, check_object};
use crate::schema::node::ObjectSchema;

/// Top-level declarative form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root: ObjectSchema,
}

impl FormSchema {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(SchemaError::Parse)
    }

    /// Reports the first structural problem in the tree, if any.
    pub fn check(&self) -> Result<(), SchemaError> {
        check_object(&self.root, "")
    }

    /// Checks the schema and materialises a fresh form tree from it.
    pub fn build(&self) -> Result<FormObjectField, SchemaError> {
        self.check()?;
        let renderer = Rc::new(Renderer::new());
        let root = build_object(&self.root, &[], &renderer);
        tracing::debug!(form = %self.id, fields = root.len(), "built form tree");
        Ok(root)
    }
}
