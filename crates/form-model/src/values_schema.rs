use serde_json::{Map, Value, json};

use crate::input::SelectOption;
use crate::schema::{ArraySchema, FieldSchema, FormSchema, InputKind, NodeSchema, ObjectSchema};

/// Generates a JSON Schema for the value document a valid form produces.
pub fn generate(form: &FormSchema) -> Value {
    let mut root = match object_schema(&form.root) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    root.insert(
        "$schema".into(),
        Value::String("https://json-schema.org/draft/2020-12/schema".into()),
    );
    root.insert("title".into(), Value::String(form.title.clone()));
    if let Some(description) = &form.description {
        root.insert("description".into(), Value::String(description.clone()));
    }
    Value::Object(root)
}

fn node_schema(node: &NodeSchema, nullable: bool) -> Value {
    match node {
        NodeSchema::Single(field) => field_schema(field, nullable),
        NodeSchema::Object(object) => object_schema(object),
        NodeSchema::Array(array) => array_schema(array),
    }
}

fn object_schema(object: &ObjectSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for entry in &object.fields {
        properties.insert(entry.name.clone(), node_schema(&entry.node, false));
        // Containers always appear in the values; single fields only when set.
        let always_present = !matches!(entry.node, NodeSchema::Single(_));
        if always_present || entry.node.required() {
            required.push(Value::String(entry.name.clone()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("title".into(), Value::String(object.label.clone()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    Value::Object(schema)
}

fn array_schema(array: &ArraySchema) -> Value {
    let nullable_items = !array.element.required();
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("array".into()));
    schema.insert("title".into(), Value::String(array.label.clone()));
    schema.insert("items".into(), node_schema(&array.element, nullable_items));
    if array.required {
        schema.insert("minItems".into(), json!(1));
    }
    Value::Object(schema)
}

fn field_schema(field: &FieldSchema, nullable: bool) -> Value {
    let mut schema = Map::new();
    let kind = match &field.input.kind {
        InputKind::String { max_length } => {
            if let Some(max_length) = max_length {
                schema.insert("maxLength".into(), json!(max_length));
            }
            "string"
        }
        InputKind::Number { min, max } => {
            if let Some(min) = min {
                schema.insert("minimum".into(), json!(min));
            }
            if let Some(max) = max {
                schema.insert("maximum".into(), json!(max));
            }
            "number"
        }
        InputKind::Boolean => "boolean",
        InputKind::Select { options } => {
            schema.insert("enum".into(), option_values(options, nullable));
            "string"
        }
        InputKind::MultiSelect { options } => {
            schema.insert(
                "items".into(),
                json!({ "type": "string", "enum": option_values(options, false) }),
            );
            "array"
        }
        InputKind::Slider { min, max, .. } => {
            schema.insert("minimum".into(), json!(min));
            schema.insert("maximum".into(), json!(max));
            "number"
        }
    };

    let type_value = if nullable {
        json!([kind, "null"])
    } else {
        json!(kind)
    };
    schema.insert("type".into(), type_value);
    schema.insert("title".into(), Value::String(field.label.clone()));
    if let Some(default) = &field.input.default {
        schema.insert("default".into(), default.clone());
    }
    Value::Object(schema)
}

fn option_values(options: &[SelectOption], nullable: bool) -> Value {
    let mut values: Vec<Value> = options
        .iter()
        .map(|option| Value::String(option.value.clone()))
        .collect();
    if nullable {
        values.push(Value::Null);
    }
    Value::Array(values)
}
