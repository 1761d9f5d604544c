use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use spdlog::{debug, info, warn};

use crate::client::{ContentClient, FetchError, Perspective, QueryRequest, QueryResponse};
use crate::content::portable_text::excerpt;
use crate::content::{is_draft, published_id, AssetSource, BodyNode, Document, Image, Post, ResolvedAsset};
use crate::queries::{HeroImage, PostDetail, PostSummary, ALL_POSTS_QUERY, POST_BY_SLUG_QUERY};

const IMAGE_ASSET_TYPE: &str = "sanity.imageAsset";

/// Answers the site queries from a dataset export (`data.ndjson`) instead of
/// the hosted endpoint.
///
/// Only [`ALL_POSTS_QUERY`] and [`POST_BY_SLUG_QUERY`] are understood; any
/// other query text is an error.
pub struct ExportClient {
    documents: Vec<Document>,
    asset_urls: HashMap<String, String>,
}

impl ExportClient {
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        let content = fs::read_to_string(path)?;
        let client = Self::from_ndjson(&content)?;
        info!("Loaded {} documents from {}", client.documents.len(), path.display());
        Ok(client)
    }

    pub fn from_ndjson(content: &str) -> Result<Self, FetchError> {
        let mut documents = vec![];
        let mut asset_urls = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line)
                .map_err(|e| FetchError::Export { line: idx + 1, source: e })?;

            if value["_type"] == IMAGE_ASSET_TYPE {
                if let (Some(id), Some(url)) = (value["_id"].as_str(), value["url"].as_str()) {
                    asset_urls.insert(id.to_string(), url.to_string());
                }
                continue;
            }

            let document: Document = serde_json::from_value(value)
                .map_err(|e| FetchError::Export { line: idx + 1, source: e })?;
            if document != Document::Other {
                documents.push(document);
            }
        }

        Ok(ExportClient { documents, asset_urls })
    }

    /// Documents visible under a perspective. With drafts, a draft replaces
    /// its published version and is reported under the published id.
    fn visible(&self, perspective: Perspective) -> Vec<Document> {
        match perspective {
            Perspective::Published => self.documents.iter()
                .filter(|d| d.id().map(|id| !is_draft(id)).unwrap_or(false))
                .cloned()
                .collect(),
            Perspective::Drafts => {
                let mut by_id: HashMap<String, Document> = HashMap::new();
                let mut order = vec![];
                for doc in self.documents.iter() {
                    let Some(id) = doc.id() else { continue };
                    let key = published_id(id).to_string();
                    let draft = is_draft(id);
                    if !by_id.contains_key(&key) {
                        order.push(key.clone());
                    } else if !draft {
                        continue;
                    }
                    by_id.insert(key, Self::with_id(doc.clone(), published_id(id)));
                }
                order.into_iter().filter_map(|k| by_id.remove(&k)).collect()
            }
        }
    }

    fn with_id(doc: Document, id: &str) -> Document {
        match doc {
            Document::Post(mut p) => {
                p.id = id.to_string();
                Document::Post(p)
            }
            Document::Author(mut a) => {
                a.id = id.to_string();
                Document::Author(a)
            }
            Document::Category(mut c) => {
                c.id = id.to_string();
                Document::Category(c)
            }
            Document::Other => Document::Other,
        }
    }

    fn resolve_asset(&self, asset: &Option<AssetSource>) -> Option<ResolvedAsset> {
        let asset = asset.as_ref()?;
        let id = asset.asset_id().to_string();
        let url = asset.url().map(|u| u.to_string())
            .or_else(|| self.asset_urls.get(&id).cloned());
        Some(ResolvedAsset { id, url })
    }

    fn hero_image(&self, image: &Option<Image>) -> Option<HeroImage> {
        image.as_ref().map(|img| HeroImage { asset: self.resolve_asset(&img.asset) })
    }

    fn summary(&self, post: &Post) -> PostSummary {
        PostSummary {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            pub_date: post.pub_date,
            hero_image: self.hero_image(&post.hero_image),
            excerpt: post.body.as_deref().map(excerpt),
        }
    }

    fn detail(&self, post: &Post, docs: &[Document]) -> PostDetail {
        let author = post.author.as_ref().and_then(|r| {
            docs.iter().find_map(|d| match d {
                Document::Author(a) if a.id == r.reference => a.name.clone(),
                _ => None,
            })
        });

        let body = post.body.as_ref().map(|nodes| {
            nodes.iter().map(|node| match node {
                BodyNode::Image(img) => BodyNode::Image(Image {
                    asset: self.resolve_asset(&img.asset).map(AssetSource::Resolved),
                    alt: img.alt.clone(),
                    caption: img.caption.clone(),
                    alignment: img.alignment,
                    hotspot: None,
                    crop: None,
                }),
                other => other.clone(),
            }).collect()
        });

        PostDetail {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            pub_date: post.pub_date,
            hero_image: self.hero_image(&post.hero_image),
            body,
            author,
        }
    }

    fn posts(docs: &[Document]) -> impl Iterator<Item=&Post> {
        docs.iter().filter_map(|d| match d {
            Document::Post(p) => Some(p),
            _ => None,
        })
    }

    fn all_posts(&self, docs: &[Document]) -> Result<Value, FetchError> {
        let mut posts: Vec<&Post> = Self::posts(docs).collect();
        // order(pubDate desc), posts without a date last
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        let rows: Vec<PostSummary> = posts.into_iter().map(|p| self.summary(p)).collect();
        serde_json::to_value(rows).map_err(FetchError::Projection)
    }

    fn post_by_slug(&self, docs: &[Document], request: &QueryRequest) -> Result<Value, FetchError> {
        let slug = request.params.get("slug")
            .and_then(|s| s.as_str())
            .ok_or_else(|| FetchError::MissingParam("slug".to_string()))?;

        let mut matches = Self::posts(docs)
            .filter(|p| p.slug.as_ref().map(|s| s.current == slug).unwrap_or(false));
        let post = matches.next();
        if matches.next().is_some() {
            warn!("Slug '{}' is used by more than one post, returning the first one", slug);
        }

        match post {
            None => Ok(Value::Null),
            Some(post) => serde_json::to_value(self.detail(post, docs)).map_err(FetchError::Projection),
        }
    }
}

impl ContentClient for ExportClient {
    async fn fetch(&self, request: &QueryRequest) -> Result<QueryResponse, FetchError> {
        let docs = self.visible(request.options.perspective);
        debug!("{} documents visible with perspective={}", docs.len(), request.options.perspective);

        let query = request.query.trim();
        let result = if query == ALL_POSTS_QUERY.trim() {
            self.all_posts(&docs)?
        } else if query == POST_BY_SLUG_QUERY.trim() {
            self.post_by_slug(&docs, request)?
        } else {
            return Err(FetchError::UnsupportedQuery(query.lines().next().unwrap_or_default().to_string()));
        };

        Ok(QueryResponse {
            result,
            result_source_map: None,
            ms: None,
        })
    }
}
