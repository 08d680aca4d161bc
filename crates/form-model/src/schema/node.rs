use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::SelectOption;

fn default_step() -> f64 {
    1.0
}

/// Kind-specific part of an input declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Boolean,
    Select {
        options: Vec<SelectOption>,
    },
    MultiSelect {
        options: Vec<SelectOption>,
    },
    Slider {
        min: f64,
        max: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
}

impl InputKind {
    pub fn name(&self) -> &'static str {
        match self {
            InputKind::String { .. } => "string",
            InputKind::Number { .. } => "number",
            InputKind::Boolean => "boolean",
            InputKind::Select { .. } => "select",
            InputKind::MultiSelect { .. } => "multi_select",
            InputKind::Slider { .. } => "slider",
        }
    }
}

/// Input declaration of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InputSchema {
    #[serde(flatten)]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Initial value; must match the input type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl From<InputKind> for InputSchema {
    fn from(kind: InputKind) -> Self {
        Self {
            kind,
            placeholder: None,
            disabled: false,
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSchema {
    pub id: String,
    /// Defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub input: InputSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectSchema {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Children in display order. Names must be unique within the object.
    #[serde(default)]
    pub fields: Vec<NamedNodeSchema>,
}

/// Repeatable element declaration.
///
/// String attributes of `element` (and of everything below it) are
/// handlebars templates rendered with `index` and `indices` for every
/// appended element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArraySchema {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub element: Box<NodeSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSchema {
    Single(FieldSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
}

impl NodeSchema {
    pub fn id(&self) -> &str {
        match self {
            NodeSchema::Single(field) => &field.id,
            NodeSchema::Object(object) => &object.id,
            NodeSchema::Array(array) => &array.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeSchema::Single(field) => &field.label,
            NodeSchema::Object(object) => &object.label,
            NodeSchema::Array(array) => &array.label,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            NodeSchema::Single(field) => field.required,
            NodeSchema::Object(object) => object.required,
            NodeSchema::Array(array) => array.required,
        }
    }
}

/// Child entry of an object: the name used in the value document plus the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NamedNodeSchema {
    pub name: String,
    #[serde(flatten)]
    pub node: NodeSchema,
}
