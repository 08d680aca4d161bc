use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Largest magnitude at which every integral `f64` is exactly representable.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Values read out of a form tree.
///
/// Objects use a sorted map so that two value documents compare equal
/// regardless of the order in which their fields were declared.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<FormValue>),
    Object(BTreeMap<String, FormValue>),
}

impl FormValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FormValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FormValue]> {
        match self {
            FormValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, FormValue>> {
        match self {
            FormValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            FormValue::Null => "null",
            FormValue::Bool(_) => "boolean",
            FormValue::Number(_) => "number",
            FormValue::String(_) => "string",
            FormValue::List(_) => "list",
            FormValue::Object(_) => "object",
        }
    }

    /// Converts into a JSON document. Integral numbers become JSON integers.
    pub fn to_json(&self) -> Value {
        match self {
            FormValue::Null => Value::Null,
            FormValue::Bool(flag) => Value::Bool(*flag),
            FormValue::Number(number) => number_to_json(*number),
            FormValue::String(text) => Value::String(text.clone()),
            FormValue::List(items) => Value::Array(items.iter().map(FormValue::to_json).collect()),
            FormValue::Object(map) => {
                let mut object = Map::new();
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json());
                }
                Value::Object(object)
            }
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(flag) => FormValue::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(FormValue::Number)
                .unwrap_or(FormValue::Null),
            Value::String(text) => FormValue::String(text.clone()),
            Value::Array(items) => FormValue::List(items.iter().map(FormValue::from_json).collect()),
            Value::Object(map) => FormValue::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), FormValue::from_json(value)))
                    .collect(),
            ),
        }
    }
}

fn is_exact_integer(number: f64) -> bool {
    number.fract() == 0.0 && number.abs() < EXACT_INTEGER_LIMIT
}

fn number_to_json(number: f64) -> Value {
    if is_exact_integer(number) {
        Value::Number(Number::from(number as i64))
    } else {
        Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormValue::Null => serializer.serialize_unit(),
            FormValue::Bool(flag) => serializer.serialize_bool(*flag),
            FormValue::Number(number) if is_exact_integer(*number) => {
                serializer.serialize_i64(*number as i64)
            }
            FormValue::Number(number) => serializer.serialize_f64(*number),
            FormValue::String(text) => serializer.serialize_str(text),
            FormValue::List(items) => items.serialize(serializer),
            FormValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FormValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(FormValue::from_json(&value))
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Null => Ok(()),
            FormValue::Bool(flag) => write!(f, "{flag}"),
            FormValue::Number(number) => write!(f, "{number}"),
            FormValue::String(text) => f.write_str(text),
            FormValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            FormValue::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::String(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::String(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<i32> for FormValue {
    fn from(value: i32) -> Self {
        FormValue::Number(f64::from(value))
    }
}

impl From<u32> for FormValue {
    fn from(value: u32) -> Self {
        FormValue::Number(f64::from(value))
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Number(value as f64)
    }
}

impl From<usize> for FormValue {
    fn from(value: usize) -> Self {
        FormValue::Number(value as f64)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(values: Vec<String>) -> Self {
        FormValue::List(values.into_iter().map(FormValue::String).collect())
    }
}

impl From<Vec<FormValue>> for FormValue {
    fn from(values: Vec<FormValue>) -> Self {
        FormValue::List(values)
    }
}

impl From<BTreeMap<String, FormValue>> for FormValue {
    fn from(map: BTreeMap<String, FormValue>) -> Self {
        FormValue::Object(map)
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FormValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_numbers_serialize_as_integers() {
        let value = FormValue::Number(10.0);
        assert_eq!(value.to_json(), json!(10));
        assert_eq!(serde_json::to_string(&value).unwrap(), "10");
    }

    #[test]
    fn fractional_numbers_keep_their_fraction() {
        assert_eq!(FormValue::Number(18.5).to_json(), json!(18.5));
    }

    #[test]
    fn json_conversion_preserves_nesting() {
        let json = json!({"name": "512G", "tags": ["a", "b"], "extra": null});
        let value = FormValue::from_json(&json);
        let tags = value.as_object().unwrap()["tags"].as_list().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(value.as_object().unwrap()["extra"].is_null());
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn display_joins_lists() {
        let value = FormValue::from(vec!["red".to_string(), "blue".to_string()]);
        assert_eq!(value.to_string(), "red, blue");
        assert_eq!(FormValue::Number(1888.0).to_string(), "1888");
    }
}
