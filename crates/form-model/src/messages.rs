use std::sync::OnceLock;

use handlebars::{Handlebars, Template};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::value::FormValue;

/// Handlebars templates used to build validation messages.
///
/// Every template receives `label`; the bound templates additionally get
/// `max` or `min`, and `invalid_option` gets the offending `value`.
/// Missing keys in a deserialized document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MessageTemplates {
    pub required: String,
    pub max_length: String,
    pub below_min: String,
    pub above_max: String,
    pub invalid_option: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            required: "{{label}}不能为空".into(),
            max_length: "{{label}}长度不能超过{{max}}".into(),
            below_min: "{{label}}不能小于{{min}}".into(),
            above_max: "{{label}}不能大于{{max}}".into(),
            invalid_option: "{{label}}选项无效".into(),
        }
    }
}

impl MessageTemplates {
    pub fn english() -> Self {
        Self {
            required: "{{label}} must not be empty".into(),
            max_length: "{{label}} must be at most {{max}} characters".into(),
            below_min: "{{label}} must not be less than {{min}}".into(),
            above_max: "{{label}} must not be greater than {{max}}".into(),
            invalid_option: "{{label}} has an invalid option: {{value}}".into(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("required", &self.required),
            ("max_length", &self.max_length),
            ("below_min", &self.below_min),
            ("above_max", &self.above_max),
            ("invalid_option", &self.invalid_option),
        ]
    }
}

/// Errors raised while loading a message catalog.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("failed to parse message catalog: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("message template '{name}' is invalid: {reason}")]
    Template { name: &'static str, reason: String },
}

/// Renders validation messages from a set of templates.
pub struct MessageCatalog {
    templates: MessageTemplates,
    handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for MessageCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCatalog")
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::with_templates(MessageTemplates::default())
    }
}

impl MessageCatalog {
    /// Builds a catalog after checking that every template compiles.
    pub fn new(templates: MessageTemplates) -> Result<Self, MessageError> {
        for (name, source) in templates.entries() {
            Template::compile(source).map_err(|err| MessageError::Template {
                name,
                reason: err.to_string(),
            })?;
        }
        Ok(Self::with_templates(templates))
    }

    pub fn english() -> Self {
        Self::with_templates(MessageTemplates::english())
    }

    /// Parses a JSON catalog document; absent keys keep the default wording.
    pub fn from_json_str(json: &str) -> Result<Self, MessageError> {
        let templates: MessageTemplates = serde_json::from_str(json).map_err(MessageError::Parse)?;
        Self::new(templates)
    }

    /// Process-wide catalog with the default wording.
    pub fn shared() -> &'static MessageCatalog {
        static SHARED: OnceLock<MessageCatalog> = OnceLock::new();
        SHARED.get_or_init(MessageCatalog::default)
    }

    pub fn templates(&self) -> &MessageTemplates {
        &self.templates
    }

    pub fn required(&self, label: &str) -> String {
        self.render(&self.templates.required, &json!({ "label": label }))
    }

    pub fn max_length(&self, label: &str, max: usize) -> String {
        self.render(
            &self.templates.max_length,
            &json!({ "label": label, "max": max }),
        )
    }

    pub fn below_min(&self, label: &str, min: f64) -> String {
        self.render(
            &self.templates.below_min,
            &json!({ "label": label, "min": FormValue::Number(min).to_string() }),
        )
    }

    pub fn above_max(&self, label: &str, max: f64) -> String {
        self.render(
            &self.templates.above_max,
            &json!({ "label": label, "max": FormValue::Number(max).to_string() }),
        )
    }

    pub fn invalid_option(&self, label: &str, value: &str) -> String {
        self.render(
            &self.templates.invalid_option,
            &json!({ "label": label, "value": value }),
        )
    }

    fn with_templates(templates: MessageTemplates) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self {
            templates,
            handlebars,
        }
    }

    fn render(&self, template: &str, ctx: &Value) -> String {
        self.handlebars
            .render_template(template, ctx)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, template, "message template failed to render");
                template.to_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wording_matches_required_message() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.required("名称"), "名称不能为空");
        assert_eq!(catalog.max_length("名称", 10), "名称长度不能超过10");
        assert_eq!(catalog.below_min("价格", 1.0), "价格不能小于1");
        assert_eq!(catalog.above_max("价格", 2.5), "价格不能大于2.5");
    }

    #[test]
    fn labels_are_not_html_escaped() {
        let catalog = MessageCatalog::english();
        assert_eq!(
            catalog.required("Terms & <Conditions>"),
            "Terms & <Conditions> must not be empty"
        );
    }

    #[test]
    fn partial_catalog_falls_back_to_defaults() {
        let catalog =
            MessageCatalog::from_json_str(r#"{"required": "{{label}} is required"}"#).unwrap();
        assert_eq!(catalog.required("Name"), "Name is required");
        assert_eq!(catalog.above_max("Age", 3.0), "Age不能大于3");
    }

    #[test]
    fn broken_template_is_rejected() {
        let err = MessageCatalog::from_json_str(r#"{"required": "{{#if label}}oops"}"#)
            .expect_err("unclosed block");
        assert!(matches!(err, MessageError::Template { name: "required", .. }));
    }
}
