//! GROQ queries used by the site, with the shape of their results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ContentClient, QueryParams};
use crate::content::{BodyNode, ResolvedAsset, Slug};
use crate::load_query::{LoadError, LoadedQuery, QueryLoader};

/// Every post, newest first, with a plain text excerpt of the body.
pub const ALL_POSTS_QUERY: &str = r#"
*[_type == "post"] | order(pubDate desc) {
  _id,
  title,
  slug,
  pubDate,
  heroImage {
    asset->{
      _id,
      url
    }
  },
  "excerpt": array::join(string::split(pt::text(body), "")[0..255], "") + "..."
}
"#;

/// A single post with images and author dereferenced.
pub const POST_BY_SLUG_QUERY: &str = r#"
*[_type == "post" && slug.current == $slug][0] {
  _id,
  title,
  slug,
  pubDate,
  heroImage {
    asset->{
      _id,
      url
    }
  },
  body[] {
    ...,
    _type == "image" => {
      "asset": asset->{
        _id,
        url
      },
      alt,
      caption,
      alignment
    }
  },
  "author": author->name
}
"#;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeroImage {
    #[serde(default)]
    pub asset: Option<ResolvedAsset>,
}

/// Row of [`ALL_POSTS_QUERY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<Slug>,
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hero_image: Option<HeroImage>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// Result of [`POST_BY_SLUG_QUERY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<Slug>,
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hero_image: Option<HeroImage>,
    #[serde(default)]
    pub body: Option<Vec<BodyNode>>,
    #[serde(default)]
    pub author: Option<String>,
}

pub fn slug_params(slug: &str) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("slug".to_string(), json!(slug));
    params
}

pub async fn load_all_posts<C: ContentClient>(loader: &QueryLoader<C>) -> Result<LoadedQuery<Vec<PostSummary>>, LoadError> {
    loader.load_query(ALL_POSTS_QUERY, None).await
}

/// `data` is `None` when no post has the slug.
pub async fn load_post_by_slug<C: ContentClient>(loader: &QueryLoader<C>, slug: &str)
                                                 -> Result<LoadedQuery<Option<PostDetail>>, LoadError> {
    loader.load_query(POST_BY_SLUG_QUERY, Some(slug_params(slug))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_params() {
        let params = slug_params("hello-world");
        assert_eq!(params.len(), 1);
        assert_eq!(params["slug"], json!("hello-world"));
    }

    #[test]
    fn test_queries_reference_their_params() {
        assert!(POST_BY_SLUG_QUERY.contains("$slug"));
        assert!(!ALL_POSTS_QUERY.contains('$'));
        assert!(ALL_POSTS_QUERY.contains("[0..255]"));
    }

    #[test]
    fn test_post_summary_shape() {
        let row: PostSummary = serde_json::from_value(json!({
            "_id": "post-hello",
            "title": "Hello World",
            "slug": {"_type": "slug", "current": "hello-world"},
            "pubDate": "2024-05-01T10:00:00Z",
            "heroImage": null,
            "excerpt": null
        })).unwrap();
        assert_eq!(row.slug.unwrap().current, "hello-world");
        assert!(row.hero_image.is_none());
        assert!(row.excerpt.is_none());
    }
}
