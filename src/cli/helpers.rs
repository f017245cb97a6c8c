//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::values::snapshot_from_str;
use crate::core::{Config, FormPage, Wizard};

/// Read a values file (YAML or JSON); no file means no values
pub fn load_values(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    snapshot_from_str(&content)
        .map_err(|e| miette::miette!("Failed to parse values file {}: {}", path.display(), e))
}

/// The requested page, or the first page when none is named
pub fn select_page<'a>(wizard: &'a Wizard, page_id: Option<&str>) -> Result<&'a FormPage> {
    match page_id {
        Some(id) => wizard.page_by_id(id).ok_or_else(|| {
            let known: Vec<&str> = wizard.pages().iter().map(|p| p.id()).collect();
            miette::miette!("No page '{}' (pages: {})", id, known.join(", "))
        }),
        None => wizard
            .first_page()
            .ok_or_else(|| miette::miette!("Wizard has no pages")),
    }
}

/// Resolve `auto` against the configured default format
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => match config.format() {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        },
        other => other,
    }
}

/// Print a value as JSON or YAML
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic()?,
        _ => serde_json::to_string_pretty(value).into_diagnostic()? + "\n",
    };
    print!("{}", text);
    Ok(())
}

/// Split a fragment's icon marker from its text
///
/// Returns the category ("error", "warning", "info" or "note") and the rest.
pub fn describe_fragment(content: &str) -> (&'static str, &str) {
    const MARKERS: [(&str, &str); 3] = [
        ("<i class=\"icon icon__error\"></i>", "error"),
        ("<i class=\"icon icon__warn\"></i>", "warning"),
        ("<i class=\"icon icon__info\"></i>", "info"),
    ];
    for (marker, kind) in MARKERS {
        if let Some(rest) = content.strip_prefix(marker) {
            return (kind, rest);
        }
    }
    ("note", content)
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
