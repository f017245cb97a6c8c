//! Declarative page schema - pages, sections and fields
//!
//! These types are plain data. Everything except option providers and
//! validators deserializes from wizard definition files.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::core::values::ValueSnapshot;
use crate::schema::validator::{PageValidator, ValidatorHandle};

/// Kind of input control a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Textbox,
    Number,
    Checkbox,
    Textarea,
    Radio,
    Select,
    Combo,
    /// Any `type` the renderer does not know; renders an empty wrapper
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Textbox => write!(f, "textbox"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Checkbox => write!(f, "checkbox"),
            FieldKind::Textarea => write!(f, "textarea"),
            FieldKind::Radio => write!(f, "radio"),
            FieldKind::Select => write!(f, "select"),
            FieldKind::Combo => write!(f, "combo"),
            FieldKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Kind-specific field properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProperties {
    /// Choices for radio, select and combo fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Textarea height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    /// Textarea width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

/// Computes combo suggestions from the current values
#[derive(Clone)]
pub struct OptionProvider(Rc<dyn Fn(&dyn ValueSnapshot) -> Vec<String>>);

impl OptionProvider {
    pub fn new(f: impl Fn(&dyn ValueSnapshot) -> Vec<String> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn options(&self, values: &dyn ValueSnapshot) -> Vec<String> {
        (self.0)(values)
    }
}

impl fmt::Debug for OptionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OptionProvider(..)")
    }
}

/// One input control on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub id: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<FieldProperties>,

    #[serde(skip)]
    pub option_provider: Option<OptionProvider>,
}

impl FieldSchema {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            initial_value: None,
            placeholder: None,
            kind,
            properties: None,
            option_provider: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties_mut().options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.properties_mut().rows = Some(rows);
        self
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.properties_mut().columns = Some(columns);
        self
    }

    pub fn with_option_provider(
        mut self,
        provider: impl Fn(&dyn ValueSnapshot) -> Vec<String> + 'static,
    ) -> Self {
        self.option_provider = Some(OptionProvider::new(provider));
        self
    }

    fn properties_mut(&mut self) -> &mut FieldProperties {
        self.properties.get_or_insert_with(FieldProperties::default)
    }

    /// Static options from `properties.options`
    pub fn options(&self) -> Option<&[String]> {
        self.properties
            .as_ref()
            .and_then(|p| p.options.as_deref())
    }

    pub fn rows(&self) -> Option<u32> {
        self.properties.as_ref().and_then(|p| p.rows)
    }

    pub fn columns(&self) -> Option<u32> {
        self.properties.as_ref().and_then(|p| p.columns)
    }
}

/// A collapsible, single-level group of fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSchema {
    pub id: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub child_fields: Vec<FieldSchema>,
}

impl SectionSchema {
    pub fn new(id: impl Into<String>, label: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            child_fields: fields,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One top-level entry of a page schema
///
/// Entries that are neither a section nor a field are kept as
/// `Unrecognized` and render nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageElement {
    Section(SectionSchema),
    Field(FieldSchema),
    Unrecognized(Value),
}

impl From<FieldSchema> for PageElement {
    fn from(field: FieldSchema) -> Self {
        PageElement::Field(field)
    }
}

impl From<SectionSchema> for PageElement {
    fn from(section: SectionSchema) -> Self {
        PageElement::Section(section)
    }
}

/// Schema of a single wizard page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDefinition {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub fields: Vec<PageElement>,

    #[serde(skip)]
    pub validator: Option<ValidatorHandle>,
}

impl PageDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            validator: None,
        }
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn with_section(mut self, section: SectionSchema) -> Self {
        self.fields.push(section.into());
        self
    }

    pub fn with_validator(mut self, validator: impl PageValidator + 'static) -> Self {
        self.validator = Some(ValidatorHandle::new(validator));
        self
    }

    /// Every field on the page, section children flattened, in declaration order
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().flat_map(|element| {
            let fields: &[FieldSchema] = match element {
                PageElement::Section(section) => &section.child_fields,
                PageElement::Field(field) => std::slice::from_ref(field),
                PageElement::Unrecognized(_) => &[],
            };
            fields.iter()
        })
    }

    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.all_fields().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_kind_parsing() {
        let field: FieldSchema = serde_yml::from_str(
            "id: notes\nlabel: Notes\ntype: textarea\nproperties:\n  rows: 4\n  columns: 40\n",
        )
        .unwrap();
        assert_eq!(field.kind, FieldKind::Textarea);
        assert_eq!(field.rows(), Some(4));
        assert_eq!(field.columns(), Some(40));
    }

    #[test]
    fn test_unknown_field_kind() {
        let field: FieldSchema =
            serde_yml::from_str("id: when\nlabel: When\ntype: datepicker\n").unwrap();
        assert_eq!(field.kind, FieldKind::Unknown);
    }

    #[test]
    fn test_initial_value_keeps_json_type() {
        let field: FieldSchema =
            serde_yml::from_str("id: ok\nlabel: OK\ntype: checkbox\ninitialValue: true\n").unwrap();
        assert_eq!(field.initial_value, Some(json!(true)));
    }

    #[test]
    fn test_page_element_variants() {
        let elements: Vec<PageElement> = serde_yml::from_str(
            r#"
- id: name
  label: Name
  type: textbox
- id: advanced
  label: Advanced
  childFields:
    - id: port
      label: Port
      type: number
- just a string
"#,
        )
        .unwrap();
        assert!(matches!(elements[0], PageElement::Field(_)));
        assert!(matches!(elements[1], PageElement::Section(_)));
        assert!(matches!(elements[2], PageElement::Unrecognized(_)));
    }

    #[test]
    fn test_all_fields_flattens_sections() {
        let page = PageDefinition::new("p", "Page", "")
            .with_field(FieldSchema::new("a", "A", FieldKind::Textbox))
            .with_section(SectionSchema::new(
                "s",
                "S",
                vec![
                    FieldSchema::new("b", "B", FieldKind::Number),
                    FieldSchema::new("c", "C", FieldKind::Checkbox),
                ],
            ))
            .with_field(FieldSchema::new("d", "D", FieldKind::Select));

        let ids: Vec<&str> = page.all_fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert!(page.field("c").is_some());
        assert!(page.field("s").is_none());
    }

    #[test]
    fn test_builders_fill_properties() {
        let field = FieldSchema::new("color", "Color", FieldKind::Radio)
            .with_options(["red", "green"])
            .with_description("Pick one");
        assert_eq!(field.options(), Some(&["red".to_string(), "green".to_string()][..]));
        assert_eq!(field.rows(), None);
    }
}
