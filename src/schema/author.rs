use crate::schema::types::{FieldDef, FieldType, Preview, SchemaType, TypeKind};

pub const AUTHOR_TYPE: &str = "author";

pub fn author_type() -> SchemaType {
    SchemaType {
        name: AUTHOR_TYPE,
        title: "Author",
        kind: TypeKind::Document {
            fields: vec![
                FieldDef::new("name", FieldType::string()).title("Name"),
                FieldDef::new("slug", FieldType::Slug { source: "name", max_length: 96 }).title("Slug"),
                FieldDef::new("image", FieldType::Image { hotspot: true, fields: vec![] }).title("Image"),
                FieldDef::new("bio", FieldType::Array {
                    of: vec![crate::schema::block_content::text_block()],
                }).title("Bio"),
            ],
        },
        preview: Some(Preview::select(&[("title", "name"), ("media", "image")])),
    }
}
