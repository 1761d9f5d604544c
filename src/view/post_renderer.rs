use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::image_url::ImageUrls;
use crate::queries::PostDetail;
use crate::view::body_renderer::BodyRenderer;
use crate::view::{format_date_time, hero_of, ViewHero};

const HERO_WIDTH: u32 = 1440;

#[derive(ramhorns::Content)]
struct ViewAuthor<'a> {
    name: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    id: &'a str,
    slug: &'a str,
    author: Option<ViewAuthor<'a>>,
    date: &'a str,
    time: &'a str,
    post_title: &'a str,
    post_content: &'a str,
    hero: Option<ViewHero>,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
    images: &'a ImageUrls,
    body: BodyRenderer<'a>,
}

impl<'a> PostRenderer<'a> {
    pub fn new(view_tpl_src: &'a str, images: &'a ImageUrls) -> io::Result<PostRenderer<'a>> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };
        let body = BodyRenderer::new(images)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing body templates: {}", e)))?;

        Ok(PostRenderer {
            template,
            images,
            body,
        })
    }

    pub fn render(&self, post: &PostDetail) -> String {
        let (date, time) = format_date_time(&post.pub_date);
        let content = post.body.as_deref()
            .map(|nodes| self.body.render(nodes))
            .unwrap_or_default();

        self.template.render(&ViewItem {
            id: &post.id,
            slug: post.slug.as_ref().map(|s| s.current.as_str()).unwrap_or_default(),
            author: post.author.as_deref().map(|name| ViewAuthor { name }),
            date: date.as_str(),
            time: time.as_str(),
            post_title: post.title.as_deref().unwrap_or("Untitled"),
            post_content: content.as_str(),
            hero: hero_of(self.images, &post.hero_image, HERO_WIDTH),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::config::SanityConfig;
    use crate::content::Slug;
    use crate::test_data::text_block;

    use super::*;

    #[test]
    fn render_view() {
        let template_src = r##"
TITLE=[{{{post_title}}}]
AUTHOR=[{{#author}}{{name}}{{/author}}]
DATE=[{{date}}]
TIME=[{{time}}]
SLUG=[{{slug}}]
POST_CONTENT=[{{{post_content}}}]
"##;
        let images = ImageUrls::new(&SanityConfig::default());
        let post_renderer = PostRenderer::new(template_src, &images).unwrap();
        let post = PostDetail {
            id: "post-hello".to_string(),
            title: Some("<post-title>".to_string()),
            slug: Some(Slug { current: "hello-world".to_string() }),
            pub_date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single(),
            hero_image: None,
            body: Some(vec![text_block("<post-content>")]),
            author: Some("<Romo>".to_string()),
        };
        let res = post_renderer.render(&post);
        assert_eq!(res, r##"
TITLE=[<post-title>]
AUTHOR=[&lt;Romo&gt;]
DATE=[2024-01-02]
TIME=[03:04:05]
SLUG=[hello-world]
POST_CONTENT=[<p>&lt;post-content&gt;</p>]"##);
    }

    #[test]
    fn render_without_title_or_body() {
        let images = ImageUrls::new(&SanityConfig::default());
        let post_renderer = PostRenderer::new("{{post_title}}|{{{post_content}}}|{{#author}}x{{/author}}", &images).unwrap();
        let post = PostDetail {
            id: "post-empty".to_string(),
            title: None,
            slug: None,
            pub_date: None,
            hero_image: None,
            body: None,
            author: None,
        };
        assert_eq!(post_renderer.render(&post), "Untitled||");
    }

    #[test]
    fn invalid_template() {
        let images = ImageUrls::new(&SanityConfig::default());
        let res = PostRenderer::new("{{#author}}{{name}}{{/hero}}", &images);
        assert_eq!(res.err().map(|e| e.kind()), Some(ErrorKind::InvalidInput));
    }
}
