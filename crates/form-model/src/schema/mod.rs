mod build;
mod check;
pub mod form;
pub mod node;

pub use check::SchemaError;
pub use form::FormSchema;
pub use node::{
    ArraySchema, FieldSchema, InputKind, InputSchema, NamedNodeSchema, NodeSchema, ObjectSchema,
};
