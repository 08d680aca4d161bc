use std::fmt;
use std::ops::{Deref, DerefMut};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::value::FormValue;

/// Callback invoked with the new value after every mutation.
pub type ChangeCallback<T> = Box<dyn FnMut(Option<&T>)>;

/// Stateful holder shared by every input kind.
pub struct FormInput<T> {
    id: String,
    placeholder: Option<String>,
    disabled: bool,
    default_value: Option<T>,
    value: Option<T>,
    on_change: Option<ChangeCallback<T>>,
}

impl<T: fmt::Debug> fmt::Debug for FormInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormInput")
            .field("id", &self.id)
            .field("placeholder", &self.placeholder)
            .field("disabled", &self.disabled)
            .field("default_value", &self.default_value)
            .field("value", &self.value)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl<T: Clone> FormInput<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            placeholder: None,
            disabled: false,
            default_value: None,
            value: None,
            on_change: None,
        }
    }

    /// Sets the default, which also becomes the current value.
    pub fn with_default(mut self, value: impl Into<T>) -> Self {
        let value = value.into();
        self.default_value = Some(value.clone());
        self.value = Some(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_on_change(mut self, callback: impl FnMut(Option<&T>) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_value(&mut self, value: impl Into<T>) {
        self.replace(Some(value.into()));
    }

    /// Stores `value` (which may be `None`) and notifies the callback.
    pub fn replace(&mut self, value: Option<T>) {
        self.value = value;
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.value.as_ref());
        }
    }

    pub fn clear(&mut self) {
        self.replace(None);
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }
}

/// One choice offered by select and multi-select inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: value.clone(),
            label: label.into(),
            value,
            description: None,
        }
    }
}

/// Forwards the shared state and builder methods of `FormInput` to a kind.
macro_rules! input_kind {
    ($kind:ident, $value:ty) => {
        impl Deref for $kind {
            type Target = FormInput<$value>;

            fn deref(&self) -> &Self::Target {
                &self.input
            }
        }

        impl DerefMut for $kind {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.input
            }
        }

        impl $kind {
            pub fn with_default(mut self, value: impl Into<$value>) -> Self {
                self.input = self.input.with_default(value);
                self
            }

            pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
                self.input = self.input.with_placeholder(placeholder);
                self
            }

            pub fn with_disabled(mut self, disabled: bool) -> Self {
                self.input = self.input.with_disabled(disabled);
                self
            }

            pub fn with_on_change(
                mut self,
                callback: impl FnMut(Option<&$value>) + 'static,
            ) -> Self {
                self.input = self.input.with_on_change(callback);
                self
            }
        }
    };
}

/// Free text input. `max_length` counts characters and is checked by validation only.
#[derive(Debug)]
pub struct StringInput {
    input: FormInput<String>,
    pub max_length: Option<usize>,
}

impl StringInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            input: FormInput::new(id),
            max_length: None,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

input_kind!(StringInput, String);

#[derive(Debug)]
pub struct NumberInput {
    input: FormInput<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            input: FormInput::new(id),
            min: None,
            max: None,
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

input_kind!(NumberInput, f64);

#[derive(Debug)]
pub struct BooleanInput {
    input: FormInput<bool>,
}

impl BooleanInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            input: FormInput::new(id),
        }
    }
}

input_kind!(BooleanInput, bool);

#[derive(Debug)]
pub struct SelectInput {
    input: FormInput<String>,
    pub options: Vec<SelectOption>,
}

impl SelectInput {
    pub fn new(id: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            input: FormInput::new(id),
            options,
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

input_kind!(SelectInput, String);

#[derive(Debug)]
pub struct MultiSelectInput {
    input: FormInput<Vec<String>>,
    pub options: Vec<SelectOption>,
}

impl MultiSelectInput {
    pub fn new(id: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            input: FormInput::new(id),
            options,
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

input_kind!(MultiSelectInput, Vec<String>);

/// Bounded numeric input; `step` is presentation metadata.
#[derive(Debug)]
pub struct SliderInput {
    input: FormInput<f64>,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderInput {
    pub fn new(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            input: FormInput::new(id),
            min,
            max,
            step: 1.0,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

input_kind!(SliderInput, f64);

/// Input kinds a form field can hold.
#[derive(Debug)]
pub enum Input {
    String(StringInput),
    Number(NumberInput),
    Boolean(BooleanInput),
    Select(SelectInput),
    MultiSelect(MultiSelectInput),
    Slider(SliderInput),
}

impl Input {
    pub fn id(&self) -> &str {
        match self {
            Input::String(input) => input.id(),
            Input::Number(input) => input.id(),
            Input::Boolean(input) => input.id(),
            Input::Select(input) => input.id(),
            Input::MultiSelect(input) => input.id(),
            Input::Slider(input) => input.id(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Input::String(_) => "string",
            Input::Number(_) => "number",
            Input::Boolean(_) => "boolean",
            Input::Select(_) => "select",
            Input::MultiSelect(_) => "multi_select",
            Input::Slider(_) => "slider",
        }
    }

    /// Current value, `FormValue::Null` when unset.
    pub fn value(&self) -> FormValue {
        match self {
            Input::String(input) => input.value().cloned().into(),
            Input::Number(input) => input.value().copied().into(),
            Input::Boolean(input) => input.value().copied().into(),
            Input::Select(input) => input.value().cloned().into(),
            Input::MultiSelect(input) => input.value().cloned().into(),
            Input::Slider(input) => input.value().copied().into(),
        }
    }

    /// Sets a dynamically typed value.
    ///
    /// `Null` clears the input. A value of the wrong type, or a NaN or
    /// infinite number, leaves the input untouched and returns `false`.
    pub fn set_value(&mut self, value: impl Into<FormValue>) -> bool {
        let value = value.into();
        if value.is_null() {
            self.clear();
            return true;
        }
        match (&mut *self, value) {
            (input, FormValue::Number(number)) if !number.is_finite() => {
                tracing::warn!(input = input.id(), %number, "ignoring non-finite number");
                return false;
            }
            (Input::String(input), FormValue::String(text)) => input.set_value(text),
            (Input::Select(input), FormValue::String(text)) => input.set_value(text),
            (Input::Number(input), FormValue::Number(number)) => input.set_value(number),
            (Input::Slider(input), FormValue::Number(number)) => input.set_value(number),
            (Input::Boolean(input), FormValue::Bool(flag)) => input.set_value(flag),
            (Input::MultiSelect(input), FormValue::List(items)) => {
                let Some(values) = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                else {
                    tracing::warn!(
                        input = input.id(),
                        "ignoring list with non-string entries"
                    );
                    return false;
                };
                input.set_value(values);
            }
            (input, other) => {
                tracing::warn!(
                    input = input.id(),
                    kind = input.kind_name(),
                    got = other.type_name(),
                    "ignoring value of mismatched type"
                );
                return false;
            }
        }
        true
    }

    pub fn clear(&mut self) {
        match self {
            Input::String(input) => input.clear(),
            Input::Number(input) => input.clear(),
            Input::Boolean(input) => input.clear(),
            Input::Select(input) => input.clear(),
            Input::MultiSelect(input) => input.clear(),
            Input::Slider(input) => input.clear(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            Input::String(input) => input.is_disabled(),
            Input::Number(input) => input.is_disabled(),
            Input::Boolean(input) => input.is_disabled(),
            Input::Select(input) => input.is_disabled(),
            Input::MultiSelect(input) => input.is_disabled(),
            Input::Slider(input) => input.is_disabled(),
        }
    }

    pub fn disable(&mut self) {
        match self {
            Input::String(input) => input.disable(),
            Input::Number(input) => input.disable(),
            Input::Boolean(input) => input.disable(),
            Input::Select(input) => input.disable(),
            Input::MultiSelect(input) => input.disable(),
            Input::Slider(input) => input.disable(),
        }
    }

    pub fn enable(&mut self) {
        match self {
            Input::String(input) => input.enable(),
            Input::Number(input) => input.enable(),
            Input::Boolean(input) => input.enable(),
            Input::Select(input) => input.enable(),
            Input::MultiSelect(input) => input.enable(),
            Input::Slider(input) => input.enable(),
        }
    }
}

impl From<StringInput> for Input {
    fn from(input: StringInput) -> Self {
        Input::String(input)
    }
}

impl From<NumberInput> for Input {
    fn from(input: NumberInput) -> Self {
        Input::Number(input)
    }
}

impl From<BooleanInput> for Input {
    fn from(input: BooleanInput) -> Self {
        Input::Boolean(input)
    }
}

impl From<SelectInput> for Input {
    fn from(input: SelectInput) -> Self {
        Input::Select(input)
    }
}

impl From<MultiSelectInput> for Input {
    fn from(input: MultiSelectInput) -> Self {
        Input::MultiSelect(input)
    }
}

impl From<SliderInput> for Input {
    fn from(input: SliderInput) -> Self {
        Input::Slider(input)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn string_input_tracks_default_set_and_clear() {
        let mut input = StringInput::new("test")
            .with_placeholder("Enter text")
            .with_default("hello")
            .with_max_length(10);

        assert_eq!(input.value().map(String::as_str), Some("hello"));
        assert_eq!(input.max_length, Some(10));

        input.set_value("world");
        assert_eq!(input.value().map(String::as_str), Some("world"));
        assert_eq!(input.default_value().map(String::as_str), Some("hello"));

        input.clear();
        assert!(input.value().is_none());
    }

    #[test]
    fn set_value_does_not_truncate_past_max_length() {
        let mut input = StringInput::new("code").with_max_length(3);
        input.set_value("abcdef");
        assert_eq!(input.value().map(String::as_str), Some("abcdef"));
    }

    #[test]
    fn change_callback_sees_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut input = NumberInput::new("age")
            .with_on_change(move |value: Option<&f64>| sink.borrow_mut().push(value.copied()));

        input.set_value(25.0);
        input.clear();

        assert_eq!(*seen.borrow(), vec![Some(25.0), None]);
    }

    #[test]
    fn dynamic_set_value_ignores_mismatched_types() {
        let mut input = Input::from(NumberInput::new("price").with_default(3.0));

        assert!(!input.set_value("cheap"));
        assert_eq!(input.value(), FormValue::Number(3.0));

        assert!(input.set_value(1888));
        assert_eq!(input.value(), FormValue::Number(1888.0));

        assert!(input.set_value(FormValue::Null));
        assert!(input.value().is_null());
    }

    #[test]
    fn multi_select_accepts_string_lists_only() {
        let options = vec![SelectOption::new("red", "Red"), SelectOption::new("blue", "Blue")];
        let mut input = Input::from(MultiSelectInput::new("colors", options));

        assert!(!input.set_value(FormValue::List(vec![FormValue::Number(1.0)])));
        assert!(input.value().is_null());

        assert!(input.set_value(vec!["red".to_string()]));
        assert_eq!(input.value(), FormValue::from(vec!["red".to_string()]));
    }

    #[test]
    fn disable_and_enable_toggle_state() {
        let mut input = Input::from(BooleanInput::new("agree"));
        input.disable();
        assert!(input.is_disabled());
        input.enable();
        assert!(!input.is_disabled());
    }
}
