use serde_json::json;

use crate::content::{Block, BodyNode, Span};

pub const POST_DOCUMENT: &str = r##"{
  "_id": "post-hello",
  "_type": "post",
  "_rev": "v1",
  "title": "Hello World",
  "slug": {"_type": "slug", "current": "hello-world"},
  "author": {"_type": "reference", "_ref": "author-jr"},
  "categories": [{"_type": "reference", "_ref": "category-food", "_key": "c1"}],
  "pubDate": "2024-05-01T10:00:00Z",
  "body": [
    {"_type": "block", "_key": "b1", "style": "normal", "markDefs": [],
     "children": [{"_type": "span", "text": "Peanut butter first.", "marks": []}]},
    {"_type": "figure", "_key": "f1",
     "image": {"_type": "image", "asset": {"_type": "reference", "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"}, "alt": "A jar"},
     "caption": "The jar", "alignment": "wide"},
    {"_type": "table", "_key": "t1", "rows": [{"cells": ["a", "b"]}, {"cells": ["c", "d"]}], "hasHeader": true},
    {"_type": "code", "_key": "x1", "code": "fn main() {}"}
  ]
}"##;

pub const FIGURE_WITHOUT_ALIGNMENT: &str = r##"{
  "_type": "figure",
  "image": {
    "_type": "image",
    "asset": {"_type": "reference", "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"},
    "alt": "A jar of peanut butter"
  },
  "caption": "Crunchy"
}"##;

pub fn text_block(text: &str) -> BodyNode {
    BodyNode::Block(Block {
        key: None,
        style: Some("normal".to_string()),
        children: vec![Span { text: text.to_string(), marks: vec![] }],
        list_item: None,
        level: None,
    })
}

fn block_json(text: &str) -> serde_json::Value {
    json!({
        "_type": "block",
        "style": "normal",
        "markDefs": [],
        "children": [{"_type": "span", "text": text, "marks": []}]
    })
}

/// A small dataset export: one author, one category, one published post with
/// a pending draft edit, and one post that only exists as a draft.
pub fn export_ndjson() -> String {
    let docs = vec![
        json!({"_id": "author-jr", "_type": "author", "name": "J. Romo", "slug": {"current": "j-romo"}}),
        json!({"_id": "category-food", "_type": "category", "title": "Food"}),
        json!({
            "_id": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg",
            "_type": "sanity.imageAsset",
            "url": "https://cdn.sanity.io/images/69ah3koy/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg"
        }),
        json!({
            "_id": "post-hello",
            "_type": "post",
            "title": "Hello World",
            "slug": {"current": "hello-world"},
            "author": {"_type": "reference", "_ref": "author-jr"},
            "pubDate": "2024-05-01T10:00:00Z",
            "heroImage": {"asset": {"_type": "reference", "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"}},
            "body": [
                block_json(&"a".repeat(1000)),
                {
                    "_type": "image",
                    "asset": {"_type": "reference", "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"},
                    "alt": "Jar",
                    "alignment": "left"
                }
            ]
        }),
        json!({
            "_id": "drafts.post-hello",
            "_type": "post",
            "title": "Hello World (edited)",
            "slug": {"current": "hello-world"},
            "pubDate": "2024-05-01T10:00:00Z",
            "body": [block_json("Rewritten")]
        }),
        json!({
            "_id": "drafts.post-next",
            "_type": "post",
            "title": "Coming soon",
            "slug": {"current": "coming-soon"},
            "pubDate": "2024-06-01T10:00:00Z",
            "body": [block_json("Not yet")]
        }),
    ];

    docs.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
