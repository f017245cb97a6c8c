//! Schema system - page definitions, rendering and validation

pub mod definition;
pub mod loader;
pub mod template;
pub mod validator;

pub use definition::{
    FieldKind, FieldProperties, FieldSchema, OptionProvider, PageDefinition, PageElement,
    SectionSchema,
};
pub use loader::{load_wizard, parse_wizard};
pub use template::{FormRenderer, TemplateError};
pub use validator::{
    validation_id, Fragment, JsonSchemaValidator, PageValidator, ValidatorError,
    ValidatorHandle, ValidatorResponse,
};
