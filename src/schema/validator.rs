//! Validator contract and the JSON Schema validator
//!
//! A page validator judges the current values and answers with annotation
//! fragments sorted into errors, warnings, infos and other. The wizard only
//! merges those fragments into the page; it never decides validity itself.

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::core::values::ValueSnapshot;

/// Id of the element that receives a field's validation messages
pub fn validation_id(field_id: &str) -> String {
    format!("{}Validation", field_id)
}

/// Content placed into an element by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub content: String,
}

impl Fragment {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Empty validation placeholder for a field
    pub fn placeholder(field_id: &str) -> Self {
        Self::new(validation_id(field_id), "&nbsp;")
    }
}

/// Categorised fragments returned by a validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Fragment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<Fragment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infos: Option<Vec<Fragment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<Vec<Fragment>>,
}

impl ValidatorResponse {
    pub fn with_error(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.errors
            .get_or_insert_with(Vec::new)
            .push(Fragment::new(id, content));
        self
    }

    pub fn with_warning(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.warnings
            .get_or_insert_with(Vec::new)
            .push(Fragment::new(id, content));
        self
    }

    pub fn with_info(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.infos
            .get_or_insert_with(Vec::new)
            .push(Fragment::new(id, content));
        self
    }

    pub fn with_other(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.other
            .get_or_insert_with(Vec::new)
            .push(Fragment::new(id, content));
        self
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Errors raised by a validator
#[derive(Debug, Error, Diagnostic)]
pub enum ValidatorError {
    #[error("Validator failed: {message}")]
    #[diagnostic(code(wvw::validator::failed))]
    Failed { message: String },

    #[error("Invalid validation schema: {message}")]
    #[diagnostic(
        code(wvw::validator::invalid_schema),
        help("The `validation` entry of a page must be a valid JSON Schema")
    )]
    InvalidSchema { message: String },
}

impl ValidatorError {
    pub fn failed(message: impl Into<String>) -> Self {
        ValidatorError::Failed {
            message: message.into(),
        }
    }
}

/// Judges a page's current values
pub trait PageValidator {
    /// `Ok(None)` means there is nothing to report
    fn validate(&self, values: &dyn ValueSnapshot)
        -> Result<Option<ValidatorResponse>, ValidatorError>;
}

impl<F> PageValidator for F
where
    F: Fn(&dyn ValueSnapshot) -> Result<Option<ValidatorResponse>, ValidatorError>,
{
    fn validate(
        &self,
        values: &dyn ValueSnapshot,
    ) -> Result<Option<ValidatorResponse>, ValidatorError> {
        self(values)
    }
}

/// Shared handle to a page validator
#[derive(Clone)]
pub struct ValidatorHandle(Rc<dyn PageValidator>);

impl ValidatorHandle {
    pub fn new(validator: impl PageValidator + 'static) -> Self {
        Self(Rc::new(validator))
    }

    pub fn validate(
        &self,
        values: &dyn ValueSnapshot,
    ) -> Result<Option<ValidatorResponse>, ValidatorError> {
        self.0.validate(values)
    }
}

impl fmt::Debug for ValidatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidatorHandle(..)")
    }
}

/// Validator backed by a JSON Schema over the page's field values
pub struct JsonSchemaValidator {
    compiled: JsonValidator,
    /// Field ids, in page order, copied from the snapshot into the instance
    field_ids: Vec<String>,
}

impl JsonSchemaValidator {
    pub fn new(schema: &JsonValue, field_ids: Vec<String>) -> Result<Self, ValidatorError> {
        let compiled = validator_for(schema).map_err(|e| ValidatorError::InvalidSchema {
            message: e.to_string(),
        })?;
        Ok(Self {
            compiled,
            field_ids,
        })
    }

    /// Build the JSON instance the schema is checked against
    ///
    /// Null values and empty strings count as missing, so `required` fires
    /// for untouched inputs.
    fn instance(&self, values: &dyn ValueSnapshot) -> JsonValue {
        let mut object = Map::new();
        for id in &self.field_ids {
            if let Some(value) = values.lookup(id) {
                if value.is_null() || value.as_str() == Some("") {
                    continue;
                }
                object.insert(id.clone(), value.clone());
            }
        }
        JsonValue::Object(object)
    }

    /// Field a violation belongs to
    fn target_field(&self, error: &JsonSchemaError) -> Option<String> {
        if let jsonschema::error::ValidationErrorKind::Required { property } = &error.kind {
            if let Some(name) = property.as_str() {
                return Some(name.to_string());
            }
        }

        let path = error.instance_path.to_string();
        path.split('/')
            .find(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| self.field_ids.first().cloned())
    }
}

impl PageValidator for JsonSchemaValidator {
    fn validate(
        &self,
        values: &dyn ValueSnapshot,
    ) -> Result<Option<ValidatorResponse>, ValidatorError> {
        let instance = self.instance(values);
        let mut response = ValidatorResponse::default();

        for error in self.compiled.iter_errors(&instance) {
            if let Some(target) = self.target_field(&error) {
                let message = tera::escape_html(&format_schema_error(&error));
                response = response.with_error(validation_id(&target), message);
            }
        }

        if response.has_errors() {
            Ok(Some(response))
        } else {
            Ok(None)
        }
    }
}

/// Format a JSON Schema error as a short message for the form
fn format_schema_error(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { .. } => "This field is required".to_string(),
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("Wrong type: expected {:?}", kind)
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            format!("Must be one of: {}", format_enum_options(options))
        }
        jsonschema::error::ValidationErrorKind::Pattern { pattern } => {
            format!("Doesn't match pattern: {}", pattern)
        }
        jsonschema::error::ValidationErrorKind::MinLength { limit } => {
            format!("Too short: minimum {} characters", limit)
        }
        jsonschema::error::ValidationErrorKind::MaxLength { limit } => {
            format!("Too long: maximum {} characters", limit)
        }
        jsonschema::error::ValidationErrorKind::Minimum { limit } => {
            format!("Too small: minimum {}", limit)
        }
        jsonschema::error::ValidationErrorKind::Maximum { limit } => {
            format!("Too large: maximum {}", limit)
        }
        _ => error.to_string(),
    }
}

/// Format enum options as a string
fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}
