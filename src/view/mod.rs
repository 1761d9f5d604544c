use chrono::{DateTime, Utc};
use spdlog::warn;

use crate::content::AssetSource;
use crate::image_url::ImageUrls;
use crate::queries::HeroImage;

pub mod body_renderer;
pub mod list_renderer;
pub mod post_renderer;

pub const DEFAULT_LIST_TPL: &str = r#"<ul class="posts">
{{#post_list}}<li><a href="{{link}}">{{#hero}}<img src="{{src}}" alt="">{{/hero}}<h2>{{title}}</h2></a>
<time datetime="{{date}}">{{date}}</time><p>{{excerpt}}</p></li>
{{/post_list}}</ul>
"#;

pub const DEFAULT_POST_TPL: &str = r#"<article>
{{#hero}}<img class="hero" src="{{src}}" alt="">{{/hero}}
<h1>{{post_title}}</h1>
<p class="meta">{{#author}}{{name}} · {{/author}}<time datetime="{{date}}">{{date}}</time></p>
{{{post_content}}}
</article>
"#;

#[derive(ramhorns::Content)]
struct ViewHero {
    src: String,
}

fn hero_of(images: &ImageUrls, hero_image: &Option<HeroImage>, width: u32) -> Option<ViewHero> {
    let asset = hero_image.as_ref()?.asset.clone()?;
    match images.image(&AssetSource::Resolved(asset)).width(width).auto_format().url() {
        Ok(src) => Some(ViewHero { src }),
        Err(e) => {
            warn!("Hero image skipped: {}", e);
            None
        }
    }
}

/// Splits a publication date into `(date, time)` for templates.
pub fn format_date_time(date_time: &Option<DateTime<Utc>>) -> (String, String) {
    match date_time {
        Some(dt) => (dt.format("%Y-%m-%d").to_string(), dt.format("%H:%M:%S").to_string()),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_date_time() {
        let dt = Utc.with_ymd_and_hms(2017, 9, 10, 10, 42, 32).single();
        let (date, time) = format_date_time(&dt);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");

        assert_eq!(format_date_time(&None), (String::new(), String::new()));
    }
}
