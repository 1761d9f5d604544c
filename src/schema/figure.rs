use serde_json::json;

use crate::schema::types::{option, FieldDef, FieldType, Preview, SchemaType, TypeKind};

pub const FIGURE_TYPE: &str = "figure";

pub fn alignment_field_type() -> FieldType {
    FieldType::String {
        list: vec![
            option("Left", "left"),
            option("Center", "center"),
            option("Right", "right"),
            option("Wide", "wide"),
            option("Full", "full"),
        ],
        layout: Some("radio"),
        direction: Some("horizontal"),
    }
}

/// Image with alt text, caption, attribution and alignment.
pub fn figure_type() -> SchemaType {
    SchemaType {
        name: FIGURE_TYPE,
        title: "Figure (Image + Meta)",
        kind: TypeKind::Object {
            fields: vec![
                FieldDef::new("image", FieldType::Image {
                    hotspot: true,
                    fields: vec![
                        FieldDef::new("alt", FieldType::string())
                            .title("Alt text")
                            .required_warning("Add alt text (or explain why empty)"),
                    ],
                }).title("Image"),
                FieldDef::new("caption", FieldType::string()).title("Caption"),
                FieldDef::new("attribution", FieldType::string()).title("Attribution"),
                FieldDef::new("alignment", alignment_field_type())
                    .title("Alignment")
                    .initial_value(json!("center")),
            ],
        },
        preview: Some(Preview::select(&[("title", "caption"), ("media", "image.asset"), ("subtitle", "image.alt")])),
    }
}
