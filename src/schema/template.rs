//! Form rendering - page schema plus values to HTML
//!
//! Markup comes from Tera templates embedded from `templates/`. Template names
//! end in `.html`, so Tera escapes every interpolated label, value and id; the
//! element ids and class names the host script and stylesheet rely on live in
//! the templates themselves.

use rust_embed::Embed;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};
use thiserror::Error;

use crate::core::config::Config;
use crate::core::values::{display_value, is_truthy, resolve_value, ValueSnapshot};
use crate::schema::definition::{FieldKind, FieldSchema, PageDefinition, PageElement, SectionSchema};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const SETTING_TEMPLATE: &str = "setting.html";
const SECTION_TEMPLATE: &str = "section.html";
const TEXTBOX_TEMPLATE: &str = "textbox.html";
const CHECKBOX_TEMPLATE: &str = "checkbox.html";
const TEXTAREA_TEMPLATE: &str = "textarea.html";
const RADIO_TEMPLATE: &str = "radio.html";
const SELECT_TEMPLATE: &str = "select.html";
const COMBO_TEMPLATE: &str = "combo.html";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Template context for a single field
#[derive(Debug, Serialize)]
struct FieldView<'a> {
    id: &'a str,
    label: &'a str,
    description: &'a str,
    input_type: &'static str,
    value: Option<String>,
    placeholder: Option<&'a str>,
    checked: bool,
    rows: Option<u32>,
    columns: Option<u32>,
    options: Vec<OptionView>,
}

impl<'a> FieldView<'a> {
    fn new(field: &'a FieldSchema) -> Self {
        Self {
            id: &field.id,
            label: &field.label,
            description: field.description.as_deref().unwrap_or(""),
            input_type: "text",
            value: None,
            placeholder: None,
            checked: false,
            rows: None,
            columns: None,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OptionView {
    value: String,
    selected: bool,
}

/// Mark each option selected when it equals the resolved value
fn option_views(options: &[String], current: Option<&str>) -> Vec<OptionView> {
    options
        .iter()
        .map(|option| OptionView {
            value: option.clone(),
            selected: current == Some(option.as_str()),
        })
        .collect()
}

/// Resolved value as markup text, if it counts as present
fn present_value(field: &FieldSchema, values: &dyn ValueSnapshot) -> Option<String> {
    resolve_value(field, values)
        .filter(is_truthy)
        .map(|v| display_value(&v))
}

/// Renders page schemas to HTML fragments
pub struct FormRenderer {
    tera: Tera,
}

impl FormRenderer {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Create a renderer whose embedded templates are overridden by `*.html` files in `dir`
    pub fn with_template_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut renderer = Self::new()?;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "html") {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let content = fs::read_to_string(&path)?;
                renderer
                    .tera
                    .add_raw_template(name, &content)
                    .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                tracing::debug!(template = name, dir = %dir.display(), "template overridden");
            }
        }

        Ok(renderer)
    }

    /// Create a renderer honouring the configured template directory
    pub fn from_config(config: &Config) -> Result<Self, TemplateError> {
        match &config.template_dir {
            Some(dir) => Self::with_template_dir(dir),
            None => Self::new(),
        }
    }

    /// Render every section and field of a page, in declaration order
    pub fn render_content(
        &self,
        page: &PageDefinition,
        values: &dyn ValueSnapshot,
    ) -> Result<String, TemplateError> {
        let mut html = String::new();
        for element in &page.fields {
            match element {
                PageElement::Section(section) => html.push_str(&self.render_section(section, values)?),
                PageElement::Field(field) => html.push_str(&self.render_field(field, values)?),
                PageElement::Unrecognized(_) => {
                    tracing::debug!(page = %page.id, "skipping schema entry that is neither a field nor a section");
                }
            }
        }
        Ok(html)
    }

    /// Render a collapsible section and its fields
    pub fn render_section(
        &self,
        section: &SectionSchema,
        values: &dyn ValueSnapshot,
    ) -> Result<String, TemplateError> {
        let mut content = String::new();
        for field in &section.child_fields {
            content.push_str(&self.render_field(field, values)?);
        }

        let mut context = Context::new();
        context.insert("id", &section.id);
        context.insert("label", &section.label);
        context.insert("description", &section.description);
        context.insert("content", &content);
        self.render(SECTION_TEMPLATE, &context)
    }

    /// Render one field inside its `setting` wrapper
    pub fn render_field(
        &self,
        field: &FieldSchema,
        values: &dyn ValueSnapshot,
    ) -> Result<String, TemplateError> {
        let body = match field.kind {
            FieldKind::Textbox => self.text_input(field, values, "text")?,
            FieldKind::Number => self.text_input(field, values, "number")?,
            FieldKind::Checkbox => self.checkbox(field, values)?,
            FieldKind::Textarea => self.textarea(field, values)?,
            FieldKind::Radio => self.choice(RADIO_TEMPLATE, field, values)?,
            FieldKind::Select => self.choice(SELECT_TEMPLATE, field, values)?,
            FieldKind::Combo => self.combo(field, values)?,
            FieldKind::Unknown => {
                tracing::debug!(field = %field.id, "unknown field kind, rendering empty setting");
                String::new()
            }
        };

        let mut context = Context::new();
        context.insert("body", &body);
        self.render(SETTING_TEMPLATE, &context)
    }

    /// Textbox and number inputs; the initial value wins over the snapshot
    fn text_input(
        &self,
        field: &FieldSchema,
        values: &dyn ValueSnapshot,
        input_type: &'static str,
    ) -> Result<String, TemplateError> {
        let mut view = FieldView::new(field);
        view.input_type = input_type;
        view.value = field
            .initial_value
            .as_ref()
            .filter(|v| is_truthy(v))
            .map(display_value)
            .or_else(|| present_value(field, values));
        if view.value.is_none() {
            view.placeholder = field.placeholder.as_deref();
        }
        self.render_view(TEXTBOX_TEMPLATE, &view)
    }

    fn checkbox(&self, field: &FieldSchema, values: &dyn ValueSnapshot) -> Result<String, TemplateError> {
        let mut view = FieldView::new(field);
        view.checked = resolve_value(field, values).is_some_and(|v| is_truthy(&v));
        self.render_view(CHECKBOX_TEMPLATE, &view)
    }

    fn textarea(&self, field: &FieldSchema, values: &dyn ValueSnapshot) -> Result<String, TemplateError> {
        let mut view = FieldView::new(field);
        view.value = present_value(field, values);
        view.rows = field.rows();
        view.columns = field.columns();
        if !field.initial_value.as_ref().is_some_and(is_truthy) {
            view.placeholder = field.placeholder.as_deref();
        }
        self.render_view(TEXTAREA_TEMPLATE, &view)
    }

    /// Radio groups and selects over `properties.options`
    fn choice(
        &self,
        template: &str,
        field: &FieldSchema,
        values: &dyn ValueSnapshot,
    ) -> Result<String, TemplateError> {
        let mut view = FieldView::new(field);
        let current = present_value(field, values);
        view.options = option_views(field.options().unwrap_or_default(), current.as_deref());
        self.render_view(template, &view)
    }

    /// Free text with suggestions; plain textbox when there is nothing to suggest
    fn combo(&self, field: &FieldSchema, values: &dyn ValueSnapshot) -> Result<String, TemplateError> {
        let options = match (&field.option_provider, field.options()) {
            (Some(provider), _) => provider.options(values),
            (None, Some(options)) => options.to_vec(),
            (None, None) => {
                tracing::debug!(field = %field.id, "combo without options, rendering as textbox");
                return self.text_input(field, values, "text");
            }
        };

        let mut view = FieldView::new(field);
        view.value = present_value(field, values);
        view.options = option_views(&options, view.value.as_deref());
        self.render_view(COMBO_TEMPLATE, &view)
    }

    fn render_view(&self, template: &str, view: &FieldView<'_>) -> Result<String, TemplateError> {
        let context =
            Context::from_serialize(view).map_err(|e| TemplateError::RenderError(e.to_string()))?;
        self.render(template, &context)
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == template) {
            return Err(TemplateError::NotFound(template.to_string()));
        }
        self.tera
            .render(template, context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::NoValues;
    use serde_json::json;
    use std::collections::HashMap;

    fn renderer() -> FormRenderer {
        FormRenderer::new().unwrap()
    }

    #[test]
    fn test_embedded_templates_load() {
        let renderer = renderer();
        for name in [
            SETTING_TEMPLATE,
            SECTION_TEMPLATE,
            TEXTBOX_TEMPLATE,
            CHECKBOX_TEMPLATE,
            TEXTAREA_TEMPLATE,
            RADIO_TEMPLATE,
            SELECT_TEMPLATE,
            COMBO_TEMPLATE,
        ] {
            assert!(renderer.tera.get_template_names().any(|n| n == name), "missing {}", name);
        }
    }

    #[test]
    fn test_textbox_markup() {
        let field = FieldSchema::new("name", "Name", FieldKind::Textbox)
            .with_description("Your full name");
        let html = renderer().render_field(&field, &json!({ "name": "Ada" })).unwrap();

        assert!(html.starts_with("<div class=\"setting\">\n"));
        assert!(html.contains("<div class=\"setting__input\">"));
        assert!(html.contains("<label for=\"name\">Name</label>"));
        assert!(html.contains("type=\"text\" value=\"Ada\""));
        assert!(html.contains("oninput=\"fieldChanged('name')\""));
        assert!(html.contains("data-setting data-setting-preview"));
        assert!(html.contains("<div id=\"nameValidation\">&nbsp;</div>"));
        assert!(html.contains("<p class=\"setting__hint\">Your full name</p>"));
        assert!(!html.contains("placeholder"));
    }

    #[test]
    fn test_textbox_initial_value_wins() {
        let field = FieldSchema::new("name", "Name", FieldKind::Textbox).with_initial_value("Bob");
        let html = renderer().render_field(&field, &json!({ "name": "Ada" })).unwrap();
        assert!(html.contains("value=\"Bob\""));
        assert!(!html.contains("Ada"));
    }

    #[test]
    fn test_textbox_placeholder_without_value() {
        let field = FieldSchema::new("name", "Name", FieldKind::Textbox).with_placeholder("Jane Doe");
        let html = renderer().render_field(&field, &NoValues).unwrap();
        assert!(html.contains("placeholder=\"Jane Doe\""));
        assert!(!html.contains("value="));

        let html = renderer().render_field(&field, &json!({ "name": "Ada" })).unwrap();
        assert!(!html.contains("placeholder"));
    }

    #[test]
    fn test_number_input() {
        let field = FieldSchema::new("port", "Port", FieldKind::Number);
        let html = renderer().render_field(&field, &json!({ "port": 8080 })).unwrap();
        assert!(html.contains("type=\"number\" value=\"8080\""));
    }

    #[test]
    fn test_checkbox_label_follows_control() {
        let field = FieldSchema::new("agree", "I agree", FieldKind::Checkbox);
        let html = renderer().render_field(&field, &json!({ "agree": true })).unwrap();

        let input = html.find("<input").unwrap();
        let label = html.find("<label").unwrap();
        assert!(input < label);
        assert!(html.contains(" checked>"));
        assert!(html.contains("fieldChangedWithVal('agree', document.getElementById('agree').checked)"));

        let html = renderer().render_field(&field, &json!({ "agree": false })).unwrap();
        assert!(!html.contains(" checked"));
    }

    #[test]
    fn test_textarea_body_and_sizing() {
        let field = FieldSchema::new("notes", "Notes", FieldKind::Textarea)
            .with_rows(4)
            .with_columns(40)
            .with_placeholder("Anything else?");
        let html = renderer().render_field(&field, &json!({ "notes": "a < b" })).unwrap();
        assert!(html.contains("cols=\"40\" rows=\"4\""));
        assert!(html.contains(">a &lt; b</textarea>"));
        assert!(html.contains("placeholder=\"Anything else?\""));

        let with_initial = field.clone().with_initial_value("hello");
        let html = renderer().render_field(&with_initial, &NoValues).unwrap();
        assert!(!html.contains("placeholder"));
        assert!(html.contains(">hello</textarea>"));
    }

    #[test]
    fn test_radio_group() {
        let field = FieldSchema::new("color", "Color", FieldKind::Radio).with_options(["red", "green"]);
        let mut values = HashMap::new();
        values.insert("color".to_string(), json!("green"));
        let html = renderer().render_field(&field, &values).unwrap();

        assert_eq!(html.matches("type=\"radio\" name=\"color\"").count(), 2);
        assert_eq!(html.matches(" checked").count(), 1);
        assert!(html.contains("id=\"green\" oninput=\"fieldChangedWithVal('color', 'green')\" checked>"));
        assert!(html.contains("<label for=\"red\">red</label>"));
        assert!(html.contains("<div class=\"select-container\">"));
    }

    /// Value of the first `name="..."` attribute, with entities decoded the way a browser does
    fn decoded_attr(html: &str, name: &str) -> String {
        let start = html.find(&format!("{}=\"", name)).unwrap() + name.len() + 2;
        let end = start + html[start..].find('"').unwrap();
        html[start..end]
            .replace("&#x27;", "'")
            .replace("&quot;", "\"")
            .replace("&#x2F;", "/")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    /// Single-quoted JS string literals in a handler, unescaped; panics on an unterminated literal
    fn js_string_literals(code: &str) -> Vec<String> {
        let mut literals = Vec::new();
        let mut chars = code.chars();
        while let Some(c) = chars.next() {
            if c != '\'' {
                continue;
            }
            let mut literal = String::new();
            loop {
                match chars.next() {
                    Some('\\') => literal.push(chars.next().unwrap()),
                    Some('\'') => break,
                    Some(other) => literal.push(other),
                    None => panic!("unterminated string literal in {}", code),
                }
            }
            literals.push(literal);
        }
        literals
    }

    #[test]
    fn test_handler_arguments_survive_quotes_and_backslashes() {
        let field = FieldSchema::new("who", "Who", FieldKind::Radio).with_options(["O'Brien\\x"]);
        let html = renderer().render_field(&field, &NoValues).unwrap();
        let handler = decoded_attr(&html, "oninput");
        assert_eq!(handler, "fieldChangedWithVal('who', 'O\\'Brien\\\\x')");
        assert_eq!(js_string_literals(&handler), vec!["who", "O'Brien\\x"]);

        let section = SectionSchema::new("it's\\ok", "Odd", Vec::new());
        let html = renderer().render_section(&section, &NoValues).unwrap();
        let handler = decoded_attr(&html, "onclick");
        assert_eq!(js_string_literals(&handler), vec!["it's\\ok", "collapsed"]);

        let field = FieldSchema::new("a'b", "Odd", FieldKind::Checkbox);
        let html = renderer().render_field(&field, &NoValues).unwrap();
        let handler = decoded_attr(&html, "oninput");
        assert_eq!(js_string_literals(&handler), vec!["a'b", "a'b"]);
    }

    #[test]
    fn test_select_marks_matching_option() {
        let field = FieldSchema::new("size", "Size", FieldKind::Select).with_options(["S", "M", "L"]);
        let html = renderer().render_field(&field, &json!({ "size": "M" })).unwrap();
        assert!(html.contains("<option selected>M</option>"));
        assert!(html.contains("<option>S</option>"));
        assert_eq!(html.matches(" selected").count(), 1);
    }

    #[test]
    fn test_combo_static_options() {
        let field = FieldSchema::new("pick", "Pick", FieldKind::Combo).with_options(["x", "y"]);
        let html = renderer().render_field(&field, &json!({ "pick": "y" })).unwrap();
        assert!(html.contains("list=\"pickInternalList\""));
        assert!(html.contains("<datalist id=\"pickInternalList\">"));
        assert!(html.contains("<option value=\"y\" selected>"));
        assert!(html.contains("<option value=\"x\">"));
        assert_eq!(html.matches(" selected").count(), 1);
    }

    #[test]
    fn test_combo_option_provider_sees_values() {
        let field = FieldSchema::new("city", "City", FieldKind::Combo)
            .with_options(["ignored"])
            .with_option_provider(|values| match values.lookup("country").and_then(|v| v.as_str()) {
                Some("NL") => vec!["Amsterdam".to_string(), "Utrecht".to_string()],
                _ => Vec::new(),
            });
        let html = renderer()
            .render_field(&field, &json!({ "country": "NL", "city": "Utrecht" }))
            .unwrap();
        assert!(html.contains("<option value=\"Amsterdam\">"));
        assert!(html.contains("<option value=\"Utrecht\" selected>"));
        assert!(!html.contains("ignored"));
    }

    #[test]
    fn test_combo_without_options_is_textbox() {
        let combo = FieldSchema::new("free", "Free", FieldKind::Combo).with_placeholder("type here");
        let mut textbox = combo.clone();
        textbox.kind = FieldKind::Textbox;

        let values = json!({ "free": "abc" });
        let renderer = renderer();
        assert_eq!(
            renderer.render_field(&combo, &values).unwrap(),
            renderer.render_field(&textbox, &values).unwrap()
        );
        assert_eq!(
            renderer.render_field(&combo, &NoValues).unwrap(),
            renderer.render_field(&textbox, &NoValues).unwrap()
        );
    }

    #[test]
    fn test_unknown_kind_renders_empty_setting() {
        let field = FieldSchema::new("when", "When", FieldKind::Unknown);
        let html = renderer().render_field(&field, &NoValues).unwrap();
        assert!(html.starts_with("<div class=\"setting\">"));
        assert!(!html.contains("When"));
        assert!(!html.contains("Validation"));
    }

    #[test]
    fn test_section_wraps_children() {
        let section = SectionSchema::new(
            "advanced",
            "Advanced",
            vec![FieldSchema::new("port", "Port", FieldKind::Number)],
        )
        .with_description("Rarely needed");
        let html = renderer().render_section(&section, &NoValues).unwrap();

        assert!(html.starts_with(
            "<section id=\"advanced\" class=\"section--settings section--collapsible\">"
        ));
        assert!(html.contains("<div class=\"section__header\" onclick=\"document.getElementById('advanced').classList.toggle('collapsed');\">"));
        assert!(html.contains("<h2>Advanced</h2>"));
        assert!(html.contains("<p class=\"section__header-hint\">Rarely needed</p>"));
        assert!(html.contains("<div class=\"section__collapsible\">"));
        assert!(html.contains("<div class=\"section__group\">"));
        assert!(html.contains("<div class=\"section__content\">"));
        assert!(html.contains("<div id=\"portValidation\">&nbsp;</div>"));
        assert!(html.trim_end().ends_with("</section>"));
    }

    #[test]
    fn test_section_without_description() {
        let section = SectionSchema::new("s", "S", Vec::new());
        let html = renderer().render_section(&section, &NoValues).unwrap();
        assert!(!html.contains("section__header-hint"));
    }

    #[test]
    fn test_render_content_in_declaration_order() {
        let page = PageDefinition::new("p", "Page", "")
            .with_field(FieldSchema::new("first", "First", FieldKind::Textbox))
            .with_section(SectionSchema::new(
                "group",
                "Group",
                vec![FieldSchema::new("second", "Second", FieldKind::Checkbox)],
            ))
            .with_field(FieldSchema::new("third", "Third", FieldKind::Select).with_options(["a"]));
        let html = renderer().render_content(&page, &NoValues).unwrap();

        let first = html.find("firstValidation").unwrap();
        let second = html.find("secondValidation").unwrap();
        let third = html.find("thirdValidation").unwrap();
        assert!(first < second && second < third);
        assert_eq!(html.matches("<div class=\"setting\">").count(), 3);
    }

    #[test]
    fn test_labels_are_escaped() {
        let field = FieldSchema::new("x", "<b>Bold</b>", FieldKind::Textbox);
        let html = renderer().render_field(&field, &NoValues).unwrap();
        assert!(html.contains("&lt;b&gt;Bold&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn test_template_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("setting.html"),
            "<div class=\"setting custom\">{{ body | safe }}</div>",
        )
        .unwrap();
        let renderer = FormRenderer::with_template_dir(dir.path()).unwrap();
        let field = FieldSchema::new("x", "X", FieldKind::Textbox);
        let html = renderer.render_field(&field, &NoValues).unwrap();
        assert!(html.starts_with("<div class=\"setting custom\">"));
    }
}
