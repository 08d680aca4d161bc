use std::collections::HashSet;

use handlebars::Template;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::schema::node::{
    ArraySchema, FieldSchema, InputKind, InputSchema, NodeSchema, ObjectSchema,
};

/// Structural problems found in a form schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse form schema: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("node at {path} has an empty id")]
    EmptyId { path: String },
    #[error("object '{object}' declares field '{name}' more than once")]
    DuplicateField { object: String, name: String },
    #[error("field '{field}' has min {min} greater than max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },
    #[error("slider '{field}' needs a positive step, got {step}")]
    InvalidStep { field: String, step: f64 },
    #[error("field '{field}' offers no options")]
    NoOptions { field: String },
    #[error("default '{value}' of field '{field}' is not one of its options")]
    UnknownDefaultOption { field: String, value: String },
    #[error("default of field '{field}' is not a valid {expected}: {source}")]
    DefaultType {
        field: String,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("template '{template}' in node '{field}' does not compile: {reason}")]
    Template {
        field: String,
        template: String,
        reason: String,
    },
}

/// Walks a node declaration and returns the first problem found.
pub(crate) fn check_node(node: &NodeSchema, path: &str) -> Result<(), SchemaError> {
    match node {
        NodeSchema::Single(field) => check_field(field, path),
        NodeSchema::Object(object) => check_object(object, path),
        NodeSchema::Array(array) => check_array(array, path),
    }
}

pub(crate) fn check_object(object: &ObjectSchema, path: &str) -> Result<(), SchemaError> {
    check_common(&object.id, object.key.as_deref(), &object.label, path)?;
    let mut seen = HashSet::new();
    for entry in &object.fields {
        if !seen.insert(entry.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                object: object.id.clone(),
                name: entry.name.clone(),
            });
        }
        check_node(&entry.node, &format!("{path}/{}", entry.name))?;
    }
    Ok(())
}

fn check_array(array: &ArraySchema, path: &str) -> Result<(), SchemaError> {
    check_common(&array.id, array.key.as_deref(), &array.label, path)?;
    check_node(&array.element, &format!("{path}/*"))
}

fn check_field(field: &FieldSchema, path: &str) -> Result<(), SchemaError> {
    check_common(&field.id, field.key.as_deref(), &field.label, path)?;
    let input = &field.input;
    if let Some(placeholder) = &input.placeholder {
        check_template(&field.id, placeholder)?;
    }
    match &input.kind {
        InputKind::String { .. } => {
            typed_default::<String>(&field.id, input)?;
        }
        InputKind::Number { min, max } => {
            if let (Some(min), Some(max)) = (min, max) {
                check_range(&field.id, *min, *max)?;
            }
            typed_default::<f64>(&field.id, input)?;
        }
        InputKind::Boolean => {
            typed_default::<bool>(&field.id, input)?;
        }
        InputKind::Select { options } => {
            check_options(&field.id, options.is_empty())?;
            if let Some(value) = typed_default::<String>(&field.id, input)? {
                check_option_value(&field.id, options, &value)?;
            }
        }
        InputKind::MultiSelect { options } => {
            check_options(&field.id, options.is_empty())?;
            for value in typed_default::<Vec<String>>(&field.id, input)?
                .into_iter()
                .flatten()
            {
                check_option_value(&field.id, options, &value)?;
            }
        }
        InputKind::Slider { min, max, step } => {
            check_range(&field.id, *min, *max)?;
            if step.is_nan() || *step <= 0.0 {
                return Err(SchemaError::InvalidStep {
                    field: field.id.clone(),
                    step: *step,
                });
            }
            typed_default::<f64>(&field.id, input)?;
        }
    }
    Ok(())
}

/// Decodes the declared default as the value type of the input.
pub(crate) fn typed_default<T: DeserializeOwned>(
    field: &str,
    input: &InputSchema,
) -> Result<Option<T>, SchemaError> {
    match &input.default {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| SchemaError::DefaultType {
                field: field.to_string(),
                expected: input.kind.name(),
                source,
            }),
    }
}

fn check_common(id: &str, key: Option<&str>, label: &str, path: &str) -> Result<(), SchemaError> {
    if id.trim().is_empty() {
        return Err(SchemaError::EmptyId {
            path: if path.is_empty() { "/".into() } else { path.into() },
        });
    }
    check_template(id, id)?;
    if let Some(key) = key {
        check_template(id, key)?;
    }
    check_template(id, label)
}

fn check_template(field: &str, template: &str) -> Result<(), SchemaError> {
    Template::compile(template)
        .map(|_| ())
        .map_err(|err| SchemaError::Template {
            field: field.to_string(),
            template: template.to_string(),
            reason: err.to_string(),
        })
}

fn check_range(field: &str, min: f64, max: f64) -> Result<(), SchemaError> {
    if min > max {
        return Err(SchemaError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn check_options(field: &str, empty: bool) -> Result<(), SchemaError> {
    if empty {
        return Err(SchemaError::NoOptions {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn check_option_value(
    field: &str,
    options: &[crate::input::SelectOption],
    value: &str,
) -> Result<(), SchemaError> {
    if options.iter().any(|option| option.value == value) {
        Ok(())
    } else {
        Err(SchemaError::UnknownDefaultOption {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
