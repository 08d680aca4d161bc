use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::Input;
use crate::messages::MessageCatalog;
use crate::value::FormValue;

/// Category of a validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field or array has no value.
    Required,
    MaxLength { max: usize },
    BelowMin { min: f64 },
    AboveMax { max: f64 },
    /// A select value that is not one of the declared options.
    InvalidOption { value: String },
}

/// Validation error attributed to a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldError {
    pub field_id: String,
    pub message: String,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

/// Outcome of validating a node or a whole tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
        self.is_valid = false;
    }

    /// Appends the errors of `other`; validity becomes the conjunction of both.
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
    }

    pub fn error_for(&self, field_id: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field_id == field_id)
    }
}

impl FromIterator<ValidationResult> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationResult>>(iter: I) -> Self {
        let mut result = ValidationResult::valid();
        for item in iter {
            result.merge(item);
        }
        result
    }
}

/// Leaf node wrapping exactly one input.
#[derive(Debug)]
pub struct FormField {
    pub id: String,
    pub key: String,
    pub label: String,
    pub required: bool,
    pub input: Input,
}

impl FormField {
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
        required: bool,
        input: impl Into<Input>,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            label: label.into(),
            required,
            input: input.into(),
        }
    }

    /// Current input value, `FormValue::Null` when unset.
    pub fn value(&self) -> FormValue {
        self.input.value()
    }

    pub fn set_value(&mut self, value: impl Into<FormValue>) -> bool {
        self.input.set_value(value)
    }

    pub fn validate(&self) -> ValidationResult {
        self.validate_with(MessageCatalog::shared())
    }

    /// Checks presence, then the constraints of the input kind.
    pub fn validate_with(&self, messages: &MessageCatalog) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let value = self.value();

        if value.is_null() {
            if self.required {
                result.push(self.error(ErrorKind::Required, messages.required(&self.label)));
            }
            return result;
        }

        match &self.input {
            Input::String(input) => {
                if let (Some(max), Some(text)) = (input.max_length, input.value())
                    && text.chars().count() > max
                {
                    result.push(self.error(
                        ErrorKind::MaxLength { max },
                        messages.max_length(&self.label, max),
                    ));
                }
            }
            Input::Number(input) => {
                if let Some(number) = input.value().copied() {
                    self.check_bounds(number, input.min, input.max, messages, &mut result);
                }
            }
            Input::Slider(input) => {
                if let Some(number) = input.value().copied() {
                    self.check_bounds(
                        number,
                        Some(input.min),
                        Some(input.max),
                        messages,
                        &mut result,
                    );
                }
            }
            Input::Select(input) => {
                if let Some(text) = input.value()
                    && !input.has_option(text)
                {
                    result.push(self.invalid_option(text, messages));
                }
            }
            Input::MultiSelect(input) => {
                for text in input.value().into_iter().flatten() {
                    if !input.has_option(text) {
                        result.push(self.invalid_option(text, messages));
                    }
                }
            }
            Input::Boolean(_) => {}
        }

        result
    }

    fn check_bounds(
        &self,
        number: f64,
        min: Option<f64>,
        max: Option<f64>,
        messages: &MessageCatalog,
        result: &mut ValidationResult,
    ) {
        if let Some(min) = min
            && number < min
        {
            result.push(self.error(
                ErrorKind::BelowMin { min },
                messages.below_min(&self.label, min),
            ));
        }
        if let Some(max) = max
            && number > max
        {
            result.push(self.error(
                ErrorKind::AboveMax { max },
                messages.above_max(&self.label, max),
            ));
        }
    }

    fn invalid_option(&self, value: &str, messages: &MessageCatalog) -> FieldError {
        self.error(
            ErrorKind::InvalidOption {
                value: value.to_string(),
            },
            messages.invalid_option(&self.label, value),
        )
    }

    fn error(&self, kind: ErrorKind, message: String) -> FieldError {
        FieldError {
            field_id: self.id.clone(),
            message,
            kind,
        }
    }
}
