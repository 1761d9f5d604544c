use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Values picked from a document by a preview `select`.
pub type Selection = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PreviewValue {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub media: Option<Value>,
}

/// How an item is summarized in editor lists.
#[derive(Debug, Clone)]
pub struct Preview {
    pub select: Vec<(&'static str, &'static str)>,
    pub prepare: Option<fn(&Selection) -> PreviewValue>,
}

impl Preview {
    pub fn select(select: &[(&'static str, &'static str)]) -> Self {
        Preview { select: select.to_vec(), prepare: None }
    }

    pub fn prepare(mut self, prepare: fn(&Selection) -> PreviewValue) -> Self {
        self.prepare = Some(prepare);
        self
    }

    /// Picks the selected paths out of `value` (dot separated, e.g. `image.alt`).
    pub fn selection(&self, value: &Value) -> Selection {
        self.select.iter()
            .map(|(key, path)| {
                let picked = path.split('.').try_fold(value, |v, segment| v.get(segment));
                (key.to_string(), picked.cloned().unwrap_or(Value::Null))
            })
            .collect()
    }

    pub fn render(&self, value: &Value) -> PreviewValue {
        let selection = self.selection(value);
        match self.prepare {
            Some(prepare) => prepare(&selection),
            None => PreviewValue {
                title: string_of(&selection, "title"),
                subtitle: string_of(&selection, "subtitle"),
                media: selection.get("media").filter(|m| !m.is_null()).cloned(),
            },
        }
    }
}

impl Serialize for Preview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let select: Map<String, Value> = self.select.iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect();
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("select", &select)?;
        map.end()
    }
}

/// Non-empty string at `key`.
pub fn string_of(selection: &Selection, key: &str) -> Option<String> {
    selection.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    /// Required, but only reported as a warning.
    RequiredWarning(&'static str),
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Rule::Required => json!({"required": true, "level": "error"}),
            Rule::RequiredWarning(message) => json!({"required": true, "level": "warning", "message": message}),
        };
        value.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListOption {
    pub title: &'static str,
    pub value: &'static str,
}

pub const fn option(title: &'static str, value: &'static str) -> ListOption {
    ListOption { title, value }
}

/// Field kinds, one variant per type the studio knows.
#[derive(Debug, Clone)]
pub enum FieldType {
    String { list: Vec<ListOption>, layout: Option<&'static str>, direction: Option<&'static str> },
    Text { rows: Option<u32> },
    Slug { source: &'static str, max_length: u32 },
    Reference { to: Vec<&'static str> },
    Image { hotspot: bool, fields: Vec<FieldDef> },
    Array { of: Vec<ArrayMember> },
    Datetime,
    Boolean,
    Block { styles: Vec<ListOption>, lists: Vec<ListOption>, decorators: Vec<ListOption>, annotations: Vec<FieldDef> },
    Object { fields: Vec<FieldDef> },
    /// A type registered elsewhere in the schema (`figure`, `blockContent`, ...).
    Named(&'static str),
}

impl FieldType {
    pub fn string() -> Self {
        FieldType::String { list: vec![], layout: None, direction: None }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Text { .. } => "text",
            FieldType::Slug { .. } => "slug",
            FieldType::Reference { .. } => "reference",
            FieldType::Image { .. } => "image",
            FieldType::Array { .. } => "array",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Block { .. } => "block",
            FieldType::Object { .. } => "object",
            FieldType::Named(name) => *name,
        }
    }

    /// Sub-fields of object-like types.
    pub fn fields(&self) -> &[FieldDef] {
        match self {
            FieldType::Image { fields, .. } | FieldType::Object { fields } => fields.as_slice(),
            _ => &[],
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        match self {
            FieldType::String { list, layout, direction } if !list.is_empty() => {
                map.serialize_entry("options", &json!({
                    "list": list,
                    "layout": layout,
                    "direction": direction,
                }))?;
            }
            FieldType::Text { rows: Some(rows) } => map.serialize_entry("rows", rows)?,
            FieldType::Slug { source, max_length } => {
                map.serialize_entry("options", &json!({"source": source, "maxLength": max_length}))?;
            }
            FieldType::Reference { to } => {
                let to: Vec<Value> = to.iter().map(|t| json!({"type": t})).collect();
                map.serialize_entry("to", &to)?;
            }
            FieldType::Image { hotspot, fields } => {
                map.serialize_entry("options", &json!({"hotspot": hotspot}))?;
                if !fields.is_empty() {
                    map.serialize_entry("fields", fields)?;
                }
            }
            FieldType::Array { of } => map.serialize_entry("of", of)?,
            FieldType::Block { styles, lists, decorators, annotations } => {
                map.serialize_entry("styles", styles)?;
                map.serialize_entry("lists", lists)?;
                map.serialize_entry("marks", &json!({
                    "decorators": decorators,
                    "annotations": annotations,
                }))?;
            }
            FieldType::Object { fields } => map.serialize_entry("fields", fields)?,
            _ => {}
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Rule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,
}

impl FieldDef {
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        FieldDef { name, title: None, description: None, field_type, validation: None, initial_value: None }
    }

    pub fn title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn required(mut self) -> Self {
        self.validation = Some(Rule::Required);
        self
    }

    pub fn required_warning(mut self, message: &'static str) -> Self {
        self.validation = Some(Rule::RequiredWarning(message));
        self
    }

    pub fn initial_value(mut self, value: Value) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn is_required(&self) -> bool {
        matches!(self.validation, Some(Rule::Required))
    }
}

/// Allowed item of an array field.
#[derive(Debug, Clone, Serialize)]
pub struct ArrayMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    #[serde(flatten)]
    pub member_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

impl ArrayMember {
    pub fn of(member_type: FieldType) -> Self {
        ArrayMember { name: None, title: None, member_type, preview: None }
    }

    pub fn named(name: &'static str, member_type: FieldType) -> Self {
        ArrayMember { name: Some(name), title: None, member_type, preview: None }
    }

    pub fn title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn preview(mut self, preview: Preview) -> Self {
        self.preview = Some(preview);
        self
    }

    /// `_type` of array items built from this member.
    pub fn item_type(&self) -> &'static str {
        self.name.unwrap_or_else(|| self.member_type.type_name())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeKind {
    Document { fields: Vec<FieldDef> },
    Object { fields: Vec<FieldDef> },
    Array { of: Vec<ArrayMember> },
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaType {
    pub name: &'static str,
    pub title: &'static str,
    #[serde(flatten)]
    pub kind: TypeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

impl SchemaType {
    pub fn fields(&self) -> &[FieldDef] {
        match self.kind {
            TypeKind::Document { ref fields } | TypeKind::Object { ref fields } => fields.as_slice(),
            TypeKind::Array { .. } => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, TypeKind::Document { .. })
    }
}
