use crate::schema::types::{option, ArrayMember, FieldDef, FieldType, ListOption, SchemaType, TypeKind};

pub const BLOCK_CONTENT_TYPE: &str = "blockContent";

const STYLES: [ListOption; 6] = [
    option("Normal", "normal"),
    option("H1", "h1"),
    option("H2", "h2"),
    option("H3", "h3"),
    option("H4", "h4"),
    option("Quote", "blockquote"),
];

const LISTS: [ListOption; 2] = [
    option("Bullet", "bullet"),
    option("Numbered", "number"),
];

const DECORATORS: [ListOption; 3] = [
    option("Strong", "strong"),
    option("Emphasis", "em"),
    option("Code", "code"),
];

/// Rich text block with the styles, lists and marks the site renders.
pub fn text_block() -> ArrayMember {
    ArrayMember::of(FieldType::Block {
        styles: STYLES.to_vec(),
        lists: LISTS.to_vec(),
        decorators: DECORATORS.to_vec(),
        annotations: vec![
            FieldDef::new("link", FieldType::Object {
                fields: vec![FieldDef::new("href", FieldType::string()).title("URL")],
            }).title("URL"),
        ],
    }).title("Block")
}

pub fn block_content_type() -> SchemaType {
    SchemaType {
        name: BLOCK_CONTENT_TYPE,
        title: "Block Content",
        kind: TypeKind::Array {
            of: vec![
                text_block(),
                ArrayMember::of(FieldType::Image {
                    hotspot: true,
                    fields: vec![
                        FieldDef::new("alt", FieldType::string())
                            .title("Alternative Text")
                            .required_warning("Add alt text (or explain why empty)"),
                        FieldDef::new("caption", FieldType::string()).title("Caption"),
                        FieldDef::new("alignment", super::figure::alignment_field_type())
                            .title("Alignment")
                            .initial_value(serde_json::json!("center")),
                    ],
                }),
                ArrayMember::of(FieldType::Named(super::figure::FIGURE_TYPE)),
                ArrayMember::of(FieldType::Named(super::table::TABLE_TYPE)),
            ],
        },
        preview: None,
    }
}
