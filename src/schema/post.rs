use crate::schema::types::{
    string_of, ArrayMember, FieldDef, FieldType, Preview, PreviewValue, SchemaType, Selection, TypeKind,
};

pub const POST_TYPE: &str = "post";

fn prepare(selection: &Selection) -> PreviewValue {
    let subtitle = string_of(selection, "author").map(|author| format!("by {}", author));
    PreviewValue {
        title: string_of(selection, "title"),
        subtitle,
        media: selection.get("media").filter(|m| !m.is_null()).cloned(),
    }
}

pub fn post_type() -> SchemaType {
    SchemaType {
        name: POST_TYPE,
        title: "Blog Post",
        kind: TypeKind::Document {
            fields: vec![
                FieldDef::new("title", FieldType::string()).title("Title").required(),
                FieldDef::new("slug", FieldType::Slug { source: "title", max_length: 96 })
                    .title("Slug")
                    .required(),
                FieldDef::new("author", FieldType::Reference { to: vec!["author"] }),
                FieldDef::new("heroImage", FieldType::Image { hotspot: false, fields: vec![] })
                    .title("Hero Image"),
                FieldDef::new("categories", FieldType::Array {
                    of: vec![ArrayMember::of(FieldType::Reference { to: vec!["category"] })],
                }),
                FieldDef::new("pubDate", FieldType::Datetime).title("Publish Date").required(),
                FieldDef::new("body", FieldType::Named("blockContent")).title("Body"),
            ],
        },
        preview: Some(
            Preview::select(&[("title", "title"), ("author", "author.name"), ("media", "heroImage")])
                .prepare(prepare),
        ),
    }
}
