use ramhorns::Template;
use spdlog::{debug, warn};

use crate::content::{Block, BodyNode, Figure, Image, Table};
use crate::image_url::ImageUrls;

const BLOCK_TPL: &str = "<{{tag}}>{{#spans}}\
{{#strong}}<strong>{{/strong}}{{#em}}<em>{{/em}}{{#code}}<code>{{/code}}\
{{text}}\
{{#code}}</code>{{/code}}{{#em}}</em>{{/em}}{{#strong}}</strong>{{/strong}}\
{{/spans}}</{{tag}}>";

const FIGURE_TPL: &str = "<figure class=\"figure figure--{{alignment}}\">\
<img src=\"{{src}}\" alt=\"{{alt}}\">\
{{#figcaption}}<figcaption>{{#caption}}{{text}}{{/caption}}\
{{#attribution}} <span class=\"attribution\">{{text}}</span>{{/attribution}}</figcaption>{{/figcaption}}\
</figure>";

const TABLE_TPL: &str = "<table class=\"table\">\
{{#caption}}<caption>{{text}}</caption>{{/caption}}\
{{#header}}<thead><tr>{{#cells}}<th>{{text}}</th>{{/cells}}</tr></thead>{{/header}}\
<tbody>{{#rows}}<tr>{{#cells}}<td>{{text}}</td>{{/cells}}</tr>{{/rows}}</tbody>\
</table>";

#[derive(ramhorns::Content)]
struct ViewText<'a> {
    text: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewSpan<'a> {
    text: &'a str,
    strong: bool,
    em: bool,
    code: bool,
}

#[derive(ramhorns::Content)]
struct ViewBlock<'a> {
    tag: &'a str,
    spans: Vec<ViewSpan<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewFigcaption<'a> {
    caption: Option<ViewText<'a>>,
    attribution: Option<ViewText<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewFigure<'a> {
    alignment: &'a str,
    src: &'a str,
    alt: &'a str,
    figcaption: Option<ViewFigcaption<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewRow<'a> {
    cells: Vec<ViewText<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewTable<'a> {
    caption: Option<ViewText<'a>>,
    header: Option<ViewRow<'a>>,
    rows: Vec<ViewRow<'a>>,
}

/// Renders block content to HTML.
pub struct BodyRenderer<'a> {
    images: &'a ImageUrls,
    block_tpl: Template<'static>,
    figure_tpl: Template<'static>,
    table_tpl: Template<'static>,
}

fn text_of(value: &Option<String>) -> Option<ViewText<'_>> {
    value.as_deref()
        .filter(|s| !s.is_empty())
        .map(|text| ViewText { text })
}

fn row_of(cells: &[String]) -> ViewRow<'_> {
    ViewRow { cells: cells.iter().map(|c| ViewText { text: c.as_str() }).collect() }
}

impl<'a> BodyRenderer<'a> {
    pub fn new(images: &'a ImageUrls) -> Result<Self, ramhorns::Error> {
        Ok(BodyRenderer {
            images,
            block_tpl: Template::new(BLOCK_TPL)?,
            figure_tpl: Template::new(FIGURE_TPL)?,
            table_tpl: Template::new(TABLE_TPL)?,
        })
    }

    pub fn render(&self, body: &[BodyNode]) -> String {
        let mut html = String::new();
        let mut open_list: Option<&str> = None;

        for node in body {
            let list_tag = match node {
                BodyNode::Block(Block { list_item: Some(kind), .. }) if kind == "number" => Some("ol"),
                BodyNode::Block(Block { list_item: Some(_), .. }) => Some("ul"),
                _ => None,
            };
            if open_list != list_tag {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = list_tag {
                    html.push_str(&format!("<{}>", tag));
                }
                open_list = list_tag;
            }

            match node {
                BodyNode::Block(block) => html.push_str(&self.render_block(block)),
                BodyNode::Image(image) => html.push_str(&self.render_image(image)),
                BodyNode::Figure(figure) => html.push_str(&self.render_figure(figure)),
                BodyNode::Table(table) => html.push_str(&self.render_table(table)),
                BodyNode::Unknown => debug!("Skipping body node of unknown type"),
            }
        }

        if let Some(tag) = open_list {
            html.push_str(&format!("</{}>", tag));
        }

        html
    }

    fn render_block(&self, block: &Block) -> String {
        let tag = if block.list_item.is_some() {
            "li"
        } else {
            match block.style.as_deref() {
                Some(style @ ("h1" | "h2" | "h3" | "h4" | "blockquote")) => style,
                _ => "p",
            }
        };

        let spans = block.children.iter()
            .map(|span| {
                let has = |mark: &str| span.marks.iter().any(|m| m == mark);
                ViewSpan { text: &span.text, strong: has("strong"), em: has("em"), code: has("code") }
            })
            .collect();

        self.block_tpl.render(&ViewBlock { tag, spans })
    }

    fn image_src(&self, image: &Image) -> Option<String> {
        match self.images.image(image).auto_format().url() {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Skipping image: {}", e);
                None
            }
        }
    }

    fn render_image(&self, image: &Image) -> String {
        let Some(src) = self.image_src(image) else {
            return String::new();
        };
        let caption = text_of(&image.caption);
        self.figure_tpl.render(&ViewFigure {
            alignment: image.alignment.unwrap_or_default().as_str(),
            src: &src,
            alt: image.alt.as_deref().unwrap_or_default(),
            figcaption: caption.map(|caption| ViewFigcaption { caption: Some(caption), attribution: None }),
        })
    }

    fn render_figure(&self, figure: &Figure) -> String {
        let Some(src) = self.image_src(&figure.image) else {
            return String::new();
        };
        let caption = text_of(&figure.caption);
        let attribution = text_of(&figure.attribution);
        let figcaption = if caption.is_some() || attribution.is_some() {
            Some(ViewFigcaption { caption, attribution })
        } else {
            None
        };

        self.figure_tpl.render(&ViewFigure {
            alignment: figure.alignment.as_str(),
            src: &src,
            alt: figure.image.alt.as_deref().unwrap_or_default(),
            figcaption,
        })
    }

    fn render_table(&self, table: &Table) -> String {
        let (header, rows) = match table.rows.split_first() {
            Some((first, rest)) if table.has_header => (Some(row_of(&first.cells)), rest),
            _ => (None, table.rows.as_slice()),
        };

        self.table_tpl.render(&ViewTable {
            caption: text_of(&table.caption),
            header,
            rows: rows.iter().map(|r| row_of(&r.cells)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SanityConfig;
    use crate::content::{Alignment, AssetSource, Reference, Span, TableRow};
    use crate::test_data::text_block;

    use super::*;

    const ASSET: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg";
    const SRC: &str = "https://cdn.sanity.io/images/69ah3koy/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?auto=format";

    fn image(alt: &str) -> Image {
        Image {
            asset: Some(AssetSource::Reference(Reference { reference: ASSET.to_string(), key: None })),
            alt: Some(alt.to_string()),
            ..Image::default()
        }
    }

    fn table(rows: &[&[&str]], has_header: bool) -> Table {
        Table {
            rows: rows.iter()
                .map(|r| TableRow { cells: r.iter().map(|c| c.to_string()).collect() })
                .collect(),
            caption: None,
            has_header,
        }
    }

    #[test]
    fn test_table_with_header() {
        let images = ImageUrls::new(&SanityConfig::default());
        let renderer = BodyRenderer::new(&images).unwrap();
        let html = renderer.render(&[BodyNode::Table(table(&[&["a", "b"], &["c", "d"]], true))]);
        assert_eq!(html, "<table class=\"table\"><thead><tr><th>a</th><th>b</th></tr></thead>\
<tbody><tr><td>c</td><td>d</td></tr></tbody></table>");
    }

    #[test]
    fn test_table_without_header() {
        let images = ImageUrls::new(&SanityConfig::default());
        let renderer = BodyRenderer::new(&images).unwrap();
        let mut t = table(&[&["a", "b", "c"], &["<d>"]], false);
        t.caption = Some("Prices".to_string());
        let html = renderer.render(&[BodyNode::Table(t)]);
        assert_eq!(html, "<table class=\"table\"><caption>Prices</caption>\
<tbody><tr><td>a</td><td>b</td><td>c</td></tr><tr><td>&lt;d&gt;</td></tr></tbody></table>");
    }

    #[test]
    fn test_figure() {
        let images = ImageUrls::new(&SanityConfig::default());
        let renderer = BodyRenderer::new(&images).unwrap();
        let figure = Figure {
            image: image("A jar"),
            caption: Some("Crunchy".to_string()),
            attribution: Some("Photo by J.".to_string()),
            alignment: Alignment::default(),
        };
        let html = renderer.render(&[BodyNode::Figure(figure)]);
        assert_eq!(html, format!("<figure class=\"figure figure--center\"><img src=\"{}\" alt=\"A jar\">\
<figcaption>Crunchy <span class=\"attribution\">Photo by J.</span></figcaption></figure>", SRC));
    }

    #[test]
    fn test_image_without_asset_is_skipped() {
        let images = ImageUrls::new(&SanityConfig::default());
        let renderer = BodyRenderer::new(&images).unwrap();
        let html = renderer.render(&[BodyNode::Image(Image::default()), text_block("after")]);
        assert_eq!(html, "<p>after</p>");
    }

    #[test]
    fn test_blocks_and_lists() {
        let images = ImageUrls::new(&SanityConfig::default());
        let renderer = BodyRenderer::new(&images).unwrap();
        let item = |text: &str| BodyNode::Block(Block {
            key: None,
            style: Some("normal".to_string()),
            children: vec![Span { text: text.to_string(), marks: vec!["strong".to_string()] }],
            list_item: Some("bullet".to_string()),
            level: Some(1),
        });
        let heading = BodyNode::Block(Block {
            key: None,
            style: Some("h2".to_string()),
            children: vec![Span { text: "Fish & chips".to_string(), marks: vec![] }],
            list_item: None,
            level: None,
        });

        let html = renderer.render(&[heading, item("one"), item("two"), text_block("end"), BodyNode::Unknown]);
        assert_eq!(html, "<h2>Fish &amp; chips</h2><ul><li><strong>one</strong></li>\
<li><strong>two</strong></li></ul><p>end</p>");
    }
}
