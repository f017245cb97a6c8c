//! Wizard definition loading
//!
//! A definition file is YAML (JSON works too) with a title and a list of
//! pages. A page may carry an inline JSON Schema under `validation`, which
//! becomes the page's validator.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::core::form_page::FormPage;
use crate::core::wizard::Wizard;
use crate::schema::definition::{PageDefinition, PageElement};
use crate::schema::validator::JsonSchemaValidator;
use crate::yaml::diagnostics::{DefinitionError, DefinitionSyntaxError, DuplicateIdError};

#[derive(Debug, Deserialize)]
struct WizardDocument {
    #[serde(default)]
    title: String,

    pages: Vec<PageDocument>,
}

#[derive(Debug, Deserialize)]
struct PageDocument {
    id: String,

    title: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    fields: Vec<PageElement>,

    #[serde(default)]
    validation: Option<JsonValue>,
}

/// Load a wizard definition file
pub fn load_wizard(path: &Path) -> Result<Rc<Wizard>, DefinitionError> {
    let source = fs::read_to_string(path)?;
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    parse_wizard(&source, &filename)
}

/// Parse a wizard definition; `filename` only labels diagnostics
pub fn parse_wizard(source: &str, filename: &str) -> Result<Rc<Wizard>, DefinitionError> {
    let document: WizardDocument = serde_yml::from_str(source)
        .map_err(|e| DefinitionSyntaxError::from_serde_error(&e, source, filename))?;

    let mut page_ids = HashSet::new();
    let mut pages = Vec::with_capacity(document.pages.len());

    for page in document.pages {
        if !page_ids.insert(page.id.clone()) {
            return Err(DuplicateIdError::new("page", &page.id, source, filename).into());
        }
        pages.push(FormPage::new(build_page(page, source, filename)?));
    }

    tracing::debug!(file = filename, pages = pages.len(), "wizard definition loaded");
    Ok(Wizard::new(document.title, pages))
}

fn build_page(
    document: PageDocument,
    source: &str,
    filename: &str,
) -> Result<PageDefinition, DefinitionError> {
    let mut definition = PageDefinition::new(document.id, document.title, document.description);
    definition.fields = document.fields;

    let mut field_ids: Vec<String> = Vec::new();
    for field in definition.all_fields() {
        if field_ids.contains(&field.id) {
            return Err(DuplicateIdError::new("field", &field.id, source, filename).into());
        }
        field_ids.push(field.id.clone());
    }

    if let Some(schema) = document.validation {
        let validator = JsonSchemaValidator::new(&schema, field_ids).map_err(|e| {
            DefinitionError::Validation {
                page: definition.id.clone(),
                source: e,
            }
        })?;
        definition = definition.with_validator(validator);
    }

    Ok(definition)
}
