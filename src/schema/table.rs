use serde_json::{json, Value};

use crate::schema::types::{
    string_of, ArrayMember, FieldDef, FieldType, Preview, PreviewValue, SchemaType, Selection, TypeKind,
};

pub const TABLE_TYPE: &str = "table";
pub const ROW_TYPE: &str = "row";

fn prepare_row(selection: &Selection) -> PreviewValue {
    let title = match selection.get("cells") {
        Some(Value::Array(cells)) => cells.iter()
            .map(|c| c.as_str().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" | "),
        _ => "Empty row".to_string(),
    };
    PreviewValue { title: Some(title), subtitle: None, media: None }
}

fn prepare_table(selection: &Selection) -> PreviewValue {
    let row_count = selection.get("rows")
        .and_then(|r| r.as_array())
        .map(|r| r.len())
        .unwrap_or(0);
    PreviewValue {
        title: Some(string_of(selection, "caption").unwrap_or_else(|| "Table".to_string())),
        subtitle: Some(format!("{} rows", row_count)),
        media: None,
    }
}

pub fn table_type() -> SchemaType {
    let row = ArrayMember::named(ROW_TYPE, FieldType::Object {
        fields: vec![
            FieldDef::new("cells", FieldType::Array { of: vec![ArrayMember::of(FieldType::string())] })
                .title("Row Cells"),
        ],
    }).preview(Preview::select(&[("cells", "cells")]).prepare(prepare_row));

    SchemaType {
        name: TABLE_TYPE,
        title: "Table",
        kind: TypeKind::Object {
            fields: vec![
                FieldDef::new("rows", FieldType::Array { of: vec![row] }).title("Table Rows"),
                FieldDef::new("caption", FieldType::string())
                    .title("Table Caption")
                    .description("Optional caption for the table"),
                FieldDef::new("hasHeader", FieldType::Boolean)
                    .title("First Row is Header")
                    .description("If checked, the first row will be styled as a header")
                    .initial_value(json!(true)),
            ],
        },
        preview: Some(Preview::select(&[("caption", "caption"), ("rows", "rows")]).prepare(prepare_table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_preview() -> Preview {
        let table = table_type();
        let FieldType::Array { ref of } = table.field("rows").unwrap().field_type else {
            panic!("rows is an array");
        };
        of[0].preview.clone().unwrap()
    }

    #[test]
    fn test_row_preview() {
        let preview = row_preview();
        assert_eq!(preview.render(&json!({"cells": ["a", "b"]})).title.as_deref(), Some("a | b"));
        assert_eq!(preview.render(&json!({})).title.as_deref(), Some("Empty row"));
    }

    #[test]
    fn test_table_preview() {
        let preview = table_type().preview.unwrap();
        let res = preview.render(&json!({"rows": [{"cells": ["a"]}, {"cells": ["b"]}]}));
        assert_eq!(res.title.as_deref(), Some("Table"));
        assert_eq!(res.subtitle.as_deref(), Some("2 rows"));

        let res = preview.render(&json!({"caption": "Prices"}));
        assert_eq!(res.title.as_deref(), Some("Prices"));
        assert_eq!(res.subtitle.as_deref(), Some("0 rows"));
    }

    #[test]
    fn test_has_header_initial_value() {
        let table = table_type();
        assert_eq!(table.field("hasHeader").unwrap().initial_value, Some(json!(true)));
    }
}
