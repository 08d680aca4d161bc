use std::rc::Rc;

use handlebars::Handlebars;
use serde_json::json;

use crate::array::FormArrayField;
use crate::field::FormField;
use crate::input::{
    BooleanInput, Input, MultiSelectInput, NumberInput, SelectInput, SliderInput, StringInput,
};
use crate::node::FormNode;
use crate::object::FormObjectField;
use crate::schema::check::typed_default;
use crate::schema::node::{
    ArraySchema, FieldSchema, InputKind, InputSchema, NodeSchema, ObjectSchema,
};

/// Renders `{{index}}` templates inside array element declarations.
pub(crate) struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Outside of any array the template is returned as written.
    fn render(&self, template: &str, indices: &[usize]) -> String {
        let Some(index) = indices.last() else {
            return template.to_string();
        };
        if !template.contains("{{") {
            return template.to_string();
        }
        let ctx = json!({ "index": index, "indices": indices });
        self.handlebars
            .render_template(template, &ctx)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, template, "element template failed to render");
                template.to_string()
            })
    }
}

pub(crate) fn build_object(
    object: &ObjectSchema,
    indices: &[usize],
    renderer: &Rc<Renderer>,
) -> FormObjectField {
    let id = renderer.render(&object.id, indices);
    let key = object
        .key
        .as_deref()
        .map(|key| renderer.render(key, indices))
        .unwrap_or_else(|| id.clone());
    let mut built = FormObjectField::new(
        id,
        key,
        renderer.render(&object.label, indices),
        object.required,
    );
    for entry in &object.fields {
        built.insert(
            entry.name.clone(),
            build_node(&entry.node, indices, renderer),
        );
    }
    built
}

fn build_node(node: &NodeSchema, indices: &[usize], renderer: &Rc<Renderer>) -> FormNode {
    match node {
        NodeSchema::Single(field) => build_field(field, indices, renderer).into(),
        NodeSchema::Object(object) => build_object(object, indices, renderer).into(),
        NodeSchema::Array(array) => build_array(array, indices, renderer).into(),
    }
}

fn build_array(array: &ArraySchema, indices: &[usize], renderer: &Rc<Renderer>) -> FormArrayField {
    let id = renderer.render(&array.id, indices);
    let key = array
        .key
        .as_deref()
        .map(|key| renderer.render(key, indices))
        .unwrap_or_else(|| id.clone());
    let label = renderer.render(&array.label, indices);

    let element = Rc::new(array.element.as_ref().clone());
    let renderer = Rc::clone(renderer);
    let outer = indices.to_vec();
    FormArrayField::new(id, key, label, array.required, move |index| {
        let mut indices = outer.clone();
        indices.push(index);
        build_node(&element, &indices, &renderer)
    })
}

fn build_field(field: &FieldSchema, indices: &[usize], renderer: &Rc<Renderer>) -> FormField {
    let id = renderer.render(&field.id, indices);
    let key = field
        .key
        .as_deref()
        .map(|key| renderer.render(key, indices))
        .unwrap_or_else(|| id.clone());
    let placeholder = field
        .input
        .placeholder
        .as_deref()
        .map(|placeholder| renderer.render(placeholder, indices));
    let input = build_input(&id, &field.input, placeholder);
    FormField::new(
        id,
        key,
        renderer.render(&field.label, indices),
        field.required,
        input,
    )
}

fn build_input(id: &str, schema: &InputSchema, placeholder: Option<String>) -> Input {
    // Applies the attributes every kind shares, then converts into `Input`.
    macro_rules! finish {
        ($built:expr, $value:ty) => {{
            let mut built = $built.with_disabled(schema.disabled);
            if let Some(placeholder) = placeholder {
                built = built.with_placeholder(placeholder);
            }
            if let Some(default) = default_value::<$value>(id, schema) {
                built = built.with_default(default);
            }
            Input::from(built)
        }};
    }

    match &schema.kind {
        InputKind::String { max_length } => {
            let mut built = StringInput::new(id);
            if let Some(max_length) = max_length {
                built = built.with_max_length(*max_length);
            }
            finish!(built, String)
        }
        InputKind::Number { min, max } => {
            let mut built = NumberInput::new(id);
            built.min = *min;
            built.max = *max;
            finish!(built, f64)
        }
        InputKind::Boolean => finish!(BooleanInput::new(id), bool),
        InputKind::Select { options } => finish!(SelectInput::new(id, options.clone()), String),
        InputKind::MultiSelect { options } => {
            finish!(MultiSelectInput::new(id, options.clone()), Vec<String>)
        }
        InputKind::Slider { min, max, step } => {
            finish!(SliderInput::new(id, *min, *max).with_step(*step), f64)
        }
    }
}

fn default_value<T: serde::de::DeserializeOwned>(id: &str, schema: &InputSchema) -> Option<T> {
    typed_default(id, schema).unwrap_or_else(|err| {
        tracing::warn!(%err, input = id, "ignoring default of the wrong type");
        None
    })
}
