use crate::content::BodyNode;

/// Characters kept by the post list excerpt.
pub const EXCERPT_LENGTH: usize = 255;
pub const EXCERPT_SUFFIX: &str = "...";

/// Plain text of block content, the way `pt::text()` computes it in GROQ:
/// span texts of a block are concatenated and blocks are separated by an
/// empty line. Images, figures and tables carry no text.
pub fn to_plain_text(body: &[BodyNode]) -> String {
    let blocks: Vec<String> = body.iter()
        .filter_map(|node| match node {
            BodyNode::Block(block) => Some(block.text()),
            _ => None,
        })
        .collect();

    blocks.join("\n\n")
}

/// First [`EXCERPT_LENGTH`] characters of the body text followed by `...`.
///
/// The suffix is appended even when the text is shorter, matching
/// `array::join(string::split(pt::text(body), "")[0..255], "") + "..."`.
pub fn excerpt(body: &[BodyNode]) -> String {
    let mut text: String = to_plain_text(body).chars().take(EXCERPT_LENGTH).collect();
    text.push_str(EXCERPT_SUFFIX);
    text
}

#[cfg(test)]
mod tests {
    use crate::content::{Block, Figure, Image, Span, Table};
    use crate::test_data::text_block;

    use super::*;

    #[test]
    fn test_plain_text_joins_blocks() {
        let body = vec![
            BodyNode::Block(Block {
                key: None,
                style: Some("h2".to_string()),
                children: vec![
                    Span { text: "Hello ".to_string(), marks: vec![] },
                    Span { text: "World".to_string(), marks: vec!["strong".to_string()] },
                ],
                list_item: None,
                level: None,
            }),
            BodyNode::Figure(Figure {
                image: Image::default(),
                caption: Some("not text".to_string()),
                attribution: None,
                alignment: Default::default(),
            }),
            BodyNode::Table(Table { rows: vec![], caption: None, has_header: true }),
            text_block("Second paragraph"),
        ];

        assert_eq!(to_plain_text(&body), "Hello World\n\nSecond paragraph");
    }

    #[test]
    fn test_excerpt_truncates_long_body() {
        let body = vec![text_block(&"x".repeat(1000))];
        let res = excerpt(&body);
        assert_eq!(res.chars().count(), 255 + 3);
        assert!(res.ends_with("..."));
        assert_eq!(&res[..255], "x".repeat(255));
    }

    #[test]
    fn test_excerpt_short_body() {
        let body = vec![text_block("short")];
        assert_eq!(excerpt(&body), "short...");
        assert_eq!(excerpt(&[]), "...");
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let body = vec![text_block(&"é".repeat(300))];
        let res = excerpt(&body);
        assert_eq!(res, format!("{}...", "é".repeat(255)));
    }
}
