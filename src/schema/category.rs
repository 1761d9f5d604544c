use crate::schema::types::{FieldDef, FieldType, SchemaType, TypeKind};

pub const CATEGORY_TYPE: &str = "category";

pub fn category_type() -> SchemaType {
    SchemaType {
        name: CATEGORY_TYPE,
        title: "Category",
        kind: TypeKind::Document {
            fields: vec![
                FieldDef::new("title", FieldType::string()).title("Title"),
                FieldDef::new("description", FieldType::Text { rows: None }).title("Description"),
            ],
        },
        preview: None,
    }
}
