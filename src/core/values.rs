//! Value snapshots - the current field values handed to render and validate calls
//!
//! A snapshot is never retained by the wizard. Callers may pass either a
//! key-by-id map or a plain JSON object ("property bag"); both answer the same
//! `lookup` query.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::schema::definition::FieldSchema;

/// Read-only view over the current field values
pub trait ValueSnapshot {
    /// Look up the raw value stored for a field id
    fn lookup(&self, id: &str) -> Option<&Value>;
}

impl ValueSnapshot for HashMap<String, Value> {
    fn lookup(&self, id: &str) -> Option<&Value> {
        self.get(id)
    }
}

impl ValueSnapshot for BTreeMap<String, Value> {
    fn lookup(&self, id: &str) -> Option<&Value> {
        self.get(id)
    }
}

impl ValueSnapshot for Map<String, Value> {
    fn lookup(&self, id: &str) -> Option<&Value> {
        self.get(id)
    }
}

/// Property bag: objects are indexed by field id, anything else holds no values
impl ValueSnapshot for Value {
    fn lookup(&self, id: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(id))
    }
}

/// An empty snapshot, for rendering a page before any input exists
#[derive(Debug, Default, Clone, Copy)]
pub struct NoValues;

impl ValueSnapshot for NoValues {
    fn lookup(&self, _id: &str) -> Option<&Value> {
        None
    }
}

/// Whether a value counts as "present"
///
/// Null, `false`, zero and the empty string are absent; arrays and objects
/// are present even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolve the value a field should display
///
/// A present snapshot value wins; otherwise the field's initial value is used.
pub fn resolve_value(field: &FieldSchema, values: &dyn ValueSnapshot) -> Option<Value> {
    values
        .lookup(&field.id)
        .filter(|v| is_truthy(v))
        .cloned()
        .or_else(|| field.initial_value.clone())
}

/// Text form of a value as it appears in markup
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Errors reading a values document
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid values document: {0}")]
    Syntax(#[from] serde_yml::Error),

    #[error("Values cannot be represented as JSON: {0}")]
    Conversion(#[from] serde_json::Error),
}

/// Parse a YAML or JSON document into a property-bag snapshot
pub fn snapshot_from_str(source: &str) -> Result<Value, SnapshotError> {
    let yaml: serde_yml::Value = serde_yml::from_str(source)?;
    Ok(serde_json::to_value(yaml)?)
}
