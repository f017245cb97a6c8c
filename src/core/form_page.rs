//! Schema-driven wizard page - rendering plus validation merge

use std::ops::Deref;

use crate::core::page::PageState;
use crate::core::values::ValueSnapshot;
use crate::schema::definition::PageDefinition;
use crate::schema::template::{FormRenderer, TemplateError};
use crate::schema::validator::{Fragment, ValidatorError};

const ERROR_ICON: &str = "<i class=\"icon icon__error\"></i>";
const WARN_ICON: &str = "<i class=\"icon icon__warn\"></i>";
const INFO_ICON: &str = "<i class=\"icon icon__info\"></i>";

/// A wizard page whose content comes from a declarative schema
#[derive(Debug)]
pub struct FormPage {
    state: PageState,
    definition: PageDefinition,
}

impl FormPage {
    pub fn new(definition: PageDefinition) -> Self {
        Self {
            state: PageState::new(&definition.id, &definition.title, &definition.description),
            definition,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn definition(&self) -> &PageDefinition {
        &self.definition
    }

    /// HTML for the page's sections and fields
    pub fn content_as_html(
        &self,
        renderer: &FormRenderer,
        values: &dyn ValueSnapshot,
    ) -> Result<String, TemplateError> {
        renderer.render_content(&self.definition, values)
    }

    /// Validation fragments for the current values
    ///
    /// Starts with one `&nbsp;` placeholder per field and marks the page
    /// complete, then appends the validator's errors, warnings, infos and
    /// other fragments in that order. Any error marks the page incomplete.
    /// A failing validator leaves the page complete.
    pub fn validation_templates(
        &self,
        values: &dyn ValueSnapshot,
    ) -> Result<Vec<Fragment>, ValidatorError> {
        let mut templates: Vec<Fragment> = self
            .definition
            .all_fields()
            .map(|field| Fragment::placeholder(&field.id))
            .collect();
        self.state.set_complete(true);

        let Some(validator) = &self.definition.validator else {
            return Ok(templates);
        };

        let response = match validator.validate(values) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(page = %self.state.id(), error = %e, "validator failed");
                return Err(e);
            }
        };
        let Some(response) = response else {
            return Ok(templates);
        };

        if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
            self.state.set_complete(false);
            templates.extend(with_icon(errors, ERROR_ICON));
        }
        if let Some(warnings) = response.warnings.filter(|w| !w.is_empty()) {
            templates.extend(with_icon(warnings, WARN_ICON));
        }
        if let Some(infos) = response.infos.filter(|i| !i.is_empty()) {
            templates.extend(with_icon(infos, INFO_ICON));
        }
        if let Some(other) = response.other {
            templates.extend(other);
        }

        tracing::info!(
            page = %self.state.id(),
            complete = self.state.is_complete(),
            fragments = templates.len(),
            "page validated"
        );
        Ok(templates)
    }
}

impl Deref for FormPage {
    type Target = PageState;

    fn deref(&self) -> &PageState {
        &self.state
    }
}

/// Prefix each fragment's content with an icon marker
fn with_icon(fragments: Vec<Fragment>, icon: &'static str) -> impl Iterator<Item = Fragment> {
    fragments.into_iter().map(move |mut fragment| {
        fragment.content.insert_str(0, icon);
        fragment
    })
}
