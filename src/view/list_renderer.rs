use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::image_url::ImageUrls;
use crate::presentation::post_path;
use crate::queries::PostSummary;
use crate::view::{format_date_time, hero_of, ViewHero};

const THUMBNAIL_WIDTH: u32 = 720;

#[derive(ramhorns::Content)]
struct ListPage {
    post_list: Vec<PostItem>,
    count: usize,
}

#[derive(ramhorns::Content)]
struct PostItem {
    date: String,
    time: String,
    link: String,
    title: String,
    excerpt: String,
    hero: Option<ViewHero>,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
    images: &'a ImageUrls,
    base: String,
}

impl<'a> ListRenderer<'a> {
    /// `base` is the path the site is mounted on, links are built below it.
    pub fn new(list_tpl_src: &'a str, images: &'a ImageUrls, base: &str) -> io::Result<ListRenderer<'a>> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer {
            template,
            images,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn render(&self, posts: &[PostSummary]) -> String {
        let mut post_list = vec![];
        // Posts without a slug have no page to link to
        for post in posts.iter().filter(|p| p.slug.is_some()) {
            let (date, time) = format_date_time(&post.pub_date);
            let slug = post.slug.as_ref().map(|s| s.current.as_str()).unwrap_or_default();
            post_list.push(PostItem {
                date,
                time,
                link: format!("{}{}", self.base, post_path(slug)),
                title: post.title.clone().unwrap_or_default(),
                excerpt: post.excerpt.clone().unwrap_or_default(),
                hero: hero_of(self.images, &post.hero_image, THUMBNAIL_WIDTH),
            });
        }

        self.template.render(&ListPage {
            count: post_list.len(),
            post_list,
        })
    }
}
