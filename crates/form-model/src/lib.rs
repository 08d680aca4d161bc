#![allow(missing_docs)]

pub mod array;
pub mod field;
pub mod input;
pub mod messages;
pub mod node;
pub mod object;
pub mod schema;
pub mod value;
pub mod values_schema;

pub use array::{ElementFactory, FormArrayField};
pub use field::{ErrorKind, FieldError, FormField, ValidationResult};
pub use input::{
    BooleanInput, ChangeCallback, FormInput, Input, MultiSelectInput, NumberInput, SelectInput,
    SelectOption, SliderInput, StringInput,
};
pub use messages::{MessageCatalog, MessageError, MessageTemplates};
pub use node::FormNode;
pub use object::FormObjectField;
pub use schema::{FormSchema, NodeSchema, SchemaError};
pub use value::FormValue;
pub use values_schema::generate as values_schema;
