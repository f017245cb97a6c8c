//! Diagnostics for wizard definition files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::schema::validator::ValidatorError;

/// Syntax or shape error in a definition file, with source location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid wizard definition: {message}")]
#[diagnostic(code(wvw::definition::syntax))]
pub struct DefinitionSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl DefinitionSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }
}

/// An id that appears twice where ids must be unique
#[derive(Debug, Error, Diagnostic)]
#[error("Duplicate {kind} id '{id}'")]
#[diagnostic(
    code(wvw::definition::duplicate_id),
    help("Page ids must be unique within a wizard and field ids unique within a page")
)]
pub struct DuplicateIdError {
    #[source_code]
    src: NamedSource<String>,

    #[label("duplicate")]
    span: Option<SourceSpan>,

    kind: &'static str,
    id: String,
}

impl DuplicateIdError {
    pub fn new(kind: &'static str, id: &str, source: &str, filename: &str) -> Self {
        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: find_last_id_span(source, id),
            kind,
            id: id.to_string(),
        }
    }
}

/// Errors raised while loading a wizard definition
#[derive(Debug, Error, Diagnostic)]
pub enum DefinitionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] DefinitionSyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    DuplicateId(#[from] DuplicateIdError),

    #[error("Page '{page}' has an invalid validation schema")]
    #[diagnostic(code(wvw::definition::validation))]
    Validation {
        page: String,
        #[source]
        #[diagnostic_source]
        source: ValidatorError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = source[line_start..].lines().next().unwrap_or("");
    let column_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    (line_start + column_offset).min(source.len())
}

/// Span of the last `id: <id>` entry, which is the duplicate one
fn find_last_id_span(source: &str, id: &str) -> Option<SourceSpan> {
    let mut found = None;
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start().trim_start_matches("- ");
        if let Some(rest) = trimmed.strip_prefix("id:") {
            let value = rest.trim().trim_matches(|c| c == '"' || c == '\'');
            if value == id {
                let start = offset + (line.len() - trimmed.len());
                found = Some(SourceSpan::from(start..start + line.trim_end().len() - (line.len() - trimmed.len())));
            }
        }
        offset += line.len();
    }
    found
}

/// Generate helpful suggestions based on error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("missing field `pages`") {
        return Some("A wizard needs a top-level `pages:` list".to_string());
    }

    if msg_lower.contains("missing field `id`") || msg_lower.contains("missing field `title`") {
        return Some("Every page needs an `id` and a `title`".to_string());
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}
