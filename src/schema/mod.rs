//! Content model handed to the studio.
//!
//! Everything here is plain data. The studio reads [`schema()`] once at
//! startup; [`Schema::validate`] repeats the declared rules so exports can be
//! checked outside the studio.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::content::published_id;
use crate::schema::types::{ArrayMember, FieldDef, FieldType, Rule, SchemaType, TypeKind};

pub mod author;
pub mod block_content;
pub mod category;
pub mod figure;
pub mod post;
pub mod table;
pub mod types;

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub types: Vec<SchemaType>,
}

/// The registered types, in the order the studio lists them.
pub fn schema() -> Schema {
    Schema {
        types: vec![
            author::author_type(),
            block_content::block_content_type(),
            category::category_type(),
            post::post_type(),
            figure::figure_type(),
            table::table_type(),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub level: MarkerLevel,
    pub path: String,
    pub message: String,
}

/// A marker raised on one document of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMarker {
    pub id: String,
    #[serde(flatten)]
    pub marker: Marker,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn document_types(&self) -> impl Iterator<Item=&SchemaType> {
        self.types.iter().filter(|t| t.is_document())
    }

    pub fn required_fields(&self, name: &str) -> Vec<&'static str> {
        self.get(name)
            .map(|t| t.fields().iter().filter(|f| f.is_required()).map(|f| f.name).collect())
            .unwrap_or_default()
    }

    pub fn to_studio_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Checks a document against the declared rules of its type.
    ///
    /// Unknown types yield no markers.
    pub fn validate(&self, type_name: &str, document: &Value) -> Vec<Marker> {
        let mut markers = vec![];
        if let Some(schema_type) = self.get(type_name) {
            self.validate_type(schema_type, document, "", &mut markers);
        }
        markers
    }

    /// Validates every document of a dataset and checks that slugs are unique
    /// per type. A draft shares its slug with its published version.
    ///
    /// Documents of unknown or non-document types are skipped.
    pub fn validate_dataset(&self, documents: &[Value]) -> Vec<DocumentMarker> {
        let mut slugs: HashMap<(&str, &str, &str), &str> = HashMap::new();
        let mut res = vec![];

        for document in documents {
            let Some(type_name) = document.get("_type").and_then(|t| t.as_str()) else {
                continue;
            };
            let Some(schema_type) = self.get(type_name).filter(|t| t.is_document()) else {
                continue;
            };
            let id = document.get("_id").and_then(|i| i.as_str()).unwrap_or_default();
            let mut markers = self.validate(type_name, document);

            let slug_fields = schema_type.fields().iter()
                .filter(|f| matches!(f.field_type, FieldType::Slug { .. }));
            for field in slug_fields {
                let slug = document.get(field.name)
                    .and_then(|s| s.get("current"))
                    .and_then(|c| c.as_str())
                    .filter(|c| !c.is_empty());
                let Some(slug) = slug else {
                    continue;
                };

                match slugs.entry((type_name, field.name, slug)) {
                    Entry::Vacant(e) => {
                        e.insert(published_id(id));
                    }
                    Entry::Occupied(e) if *e.get() != published_id(id) => markers.push(Marker {
                        level: MarkerLevel::Error,
                        path: field.name.to_string(),
                        message: format!("Slug \"{}\" is already used by {}", slug, e.get()),
                    }),
                    Entry::Occupied(_) => {}
                }
            }

            res.extend(markers.into_iter().map(|marker| DocumentMarker { id: id.to_string(), marker }));
        }

        res
    }

    fn validate_type(&self, schema_type: &SchemaType, value: &Value, path: &str, markers: &mut Vec<Marker>) {
        match schema_type.kind {
            TypeKind::Document { ref fields } | TypeKind::Object { ref fields } => {
                self.validate_fields(fields, value, path, markers)
            }
            TypeKind::Array { ref of } => self.validate_array(of, value, path, markers),
        }
    }

    fn validate_fields(&self, fields: &[FieldDef], value: &Value, prefix: &str, markers: &mut Vec<Marker>) {
        for field in fields {
            let path = if prefix.is_empty() {
                field.name.to_string()
            } else {
                format!("{}.{}", prefix, field.name)
            };
            let field_value = value.get(field.name);

            if let Some(ref rule) = field.validation {
                if is_missing(field_value, &field.field_type) {
                    markers.push(match rule {
                        Rule::Required => Marker { level: MarkerLevel::Error, path: path.clone(), message: "Required".to_string() },
                        Rule::RequiredWarning(message) => Marker { level: MarkerLevel::Warning, path: path.clone(), message: message.to_string() },
                    });
                }
            }

            if let Some(field_value) = field_value {
                self.validate_value(&field.field_type, field_value, &path, markers);
            }
        }
    }

    fn validate_value(&self, field_type: &FieldType, value: &Value, path: &str, markers: &mut Vec<Marker>) {
        match field_type {
            FieldType::Image { fields, .. } | FieldType::Object { fields } => {
                self.validate_fields(fields, value, path, markers)
            }
            FieldType::Array { of } => self.validate_array(of, value, path, markers),
            FieldType::Named(name) => {
                if let Some(schema_type) = self.get(name) {
                    self.validate_type(schema_type, value, path, markers);
                }
            }
            _ => {}
        }
    }

    fn validate_array(&self, of: &[ArrayMember], value: &Value, path: &str, markers: &mut Vec<Marker>) {
        let Some(items) = value.as_array() else {
            return;
        };

        for (idx, item) in items.iter().enumerate() {
            let item_path = match item.get("_key").and_then(|k| k.as_str()) {
                Some(key) => format!("{}[_key==\"{}\"]", path, key),
                None => format!("{}[{}]", path, idx),
            };

            let item_type = item.get("_type").and_then(|t| t.as_str());
            let member = of.iter()
                .find(|m| Some(m.item_type()) == item_type)
                .or(if of.len() == 1 { of.first() } else { None });

            if let Some(member) = member {
                self.validate_value(&member.member_type, item, &item_path, markers);
            }
        }
    }
}

fn is_missing(value: Option<&Value>, field_type: &FieldType) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(v) => match field_type {
            FieldType::Slug { .. } => v.get("current")
                .and_then(|c| c.as_str())
                .map(|c| c.is_empty())
                .unwrap_or(true),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_data::POST_DOCUMENT;

    use super::*;

    #[test]
    fn test_registry() {
        let schema = schema();
        let names: Vec<&str> = schema.types.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["author", "blockContent", "category", "post", "figure", "table"]);

        let documents: Vec<&str> = schema.document_types().map(|t| t.name).collect();
        assert_eq!(documents, vec!["author", "category", "post"]);
        assert_eq!(schema.required_fields("post"), vec!["title", "slug", "pubDate"]);
        assert!(schema.required_fields("missing").is_empty());
    }

    #[test]
    fn test_studio_json() {
        let json: Value = serde_json::from_str(&schema().to_studio_json().unwrap()).unwrap();
        let post = json["types"].as_array().unwrap().iter().find(|t| t["name"] == "post").unwrap();
        assert_eq!(post["type"], "document");
        assert_eq!(post["title"], "Blog Post");
        assert_eq!(post["fields"][1]["options"], json!({"source": "title", "maxLength": 96}));
        assert_eq!(post["fields"][6], json!({"name": "body", "title": "Body", "type": "blockContent"}));
        assert_eq!(post["preview"]["select"]["author"], "author.name");

        let block_content = json["types"].as_array().unwrap().iter().find(|t| t["name"] == "blockContent").unwrap();
        assert_eq!(block_content["type"], "array");
        let members: Vec<&str> = block_content["of"].as_array().unwrap().iter()
            .map(|m| m["type"].as_str().unwrap())
            .collect();
        assert_eq!(members, vec!["block", "image", "figure", "table"]);
    }

    #[test]
    fn test_valid_post() {
        let doc: Value = serde_json::from_str(POST_DOCUMENT).unwrap();
        let markers = schema().validate("post", &doc);
        // the figure in the body has alt text, nothing to report
        assert!(markers.is_empty(), "{:?}", markers);
    }

    #[test]
    fn test_missing_required_fields() {
        let doc = json!({"_id": "p", "_type": "post", "title": "", "slug": {"current": ""}});
        let markers = schema().validate("post", &doc);
        let paths: Vec<(&str, MarkerLevel)> = markers.iter().map(|m| (m.path.as_str(), m.level)).collect();
        assert_eq!(paths, vec![
            ("title", MarkerLevel::Error),
            ("slug", MarkerLevel::Error),
            ("pubDate", MarkerLevel::Error),
        ]);
    }

    #[test]
    fn test_missing_alt_is_a_warning() {
        let doc = json!({
            "title": "t", "slug": {"current": "t"}, "pubDate": "2024-01-01T00:00:00Z",
            "body": [
                {"_type": "figure", "_key": "f1", "image": {"asset": {"_ref": "image-a-1x1-png"}}},
                {"_type": "image", "asset": {"_ref": "image-a-1x1-png"}, "alt": ""}
            ]
        });
        let markers = schema().validate("post", &doc);
        assert_eq!(markers, vec![
            Marker {
                level: MarkerLevel::Warning,
                path: "body[_key==\"f1\"].image.alt".to_string(),
                message: "Add alt text (or explain why empty)".to_string(),
            },
            Marker {
                level: MarkerLevel::Warning,
                path: "body[1].alt".to_string(),
                message: "Add alt text (or explain why empty)".to_string(),
            },
        ]);
    }

    #[test]
    fn test_duplicate_slugs() {
        let post = |id: &str, slug: &str| json!({
            "_id": id, "_type": "post", "title": "t", "slug": {"current": slug}, "pubDate": "2024-01-01T00:00:00Z"
        });
        let documents = vec![
            post("post-a", "same"),
            post("drafts.post-a", "same"),
            json!({"_id": "author-a", "_type": "author", "name": "A", "slug": {"current": "same"}}),
            post("post-b", "same"),
            post("post-c", "other"),
        ];

        let markers = schema().validate_dataset(&documents);
        assert_eq!(markers, vec![DocumentMarker {
            id: "post-b".to_string(),
            marker: Marker {
                level: MarkerLevel::Error,
                path: "slug".to_string(),
                message: "Slug \"same\" is already used by post-a".to_string(),
            },
        }]);
    }

    #[test]
    fn test_dataset_keeps_document_markers() {
        let documents = vec![
            json!({"_id": "post-x", "_type": "post", "slug": {"current": "x"}, "pubDate": "2024-01-01T00:00:00Z"}),
            json!({"_id": "image-a", "_type": "sanity.imageAsset"}),
        ];
        let markers = schema().validate_dataset(&documents);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "post-x");
        assert_eq!(markers[0].marker.path, "title");
    }

    #[test]
    fn test_uneven_table_rows_are_fine() {
        let doc = json!({"rows": [{"cells": ["a", "b", "c"]}, {"cells": ["d"]}], "hasHeader": false});
        assert!(schema().validate("table", &doc).is_empty());
    }
}
