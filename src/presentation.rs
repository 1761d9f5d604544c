//! Studio wiring for visual editing: where documents live on the site and
//! which plugins the studio loads.

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;

pub const UNTITLED: &str = "Untitled";
pub const DRAFT_MODE_ENABLE: &str = "/api/draft-mode/enable";
pub const DRAFT_MODE_DISABLE: &str = "/api/draft-mode/disable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub title: String,
    pub href: String,
}

pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", slug)
}

pub fn page_path(slug: &str) -> String {
    format!("/{}", slug)
}

/// `slug.current`, also accepting a slug already flattened to a string.
fn slug_of(document: &Value) -> Option<&str> {
    let slug = document.get("slug")?;
    slug.as_str()
        .or_else(|| slug.get("current").and_then(|c| c.as_str()))
        .filter(|s| !s.is_empty())
}

/// Site pages showing `document`. Types without a page and documents
/// without a slug have none.
pub fn resolve_locations(document: &Value) -> Vec<Location> {
    let path_of: fn(&str) -> String = match document.get("_type").and_then(|t| t.as_str()) {
        Some("post") => post_path,
        Some("page") => page_path,
        _ => return vec![],
    };
    let Some(slug) = slug_of(document) else {
        return vec![];
    };

    let title = document.get("title")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED);

    vec![Location { title: title.to_string(), href: path_of(slug) }]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMode {
    pub enable: &'static str,
    pub disable: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewUrl {
    pub origin: String,
    pub preview_mode: PreviewMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Plugin {
    StructureTool,
    #[serde(rename_all = "camelCase")]
    PresentationTool { preview_url: PreviewUrl, locations: Vec<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioConfig {
    pub name: String,
    pub title: String,
    pub project_id: String,
    pub dataset: String,
    pub plugins: Vec<Plugin>,
}

/// The studio definition. The presentation tool is only loaded when visual
/// editing is enabled.
pub fn studio_config(config: &Config) -> StudioConfig {
    let mut plugins = vec![Plugin::StructureTool];
    if config.sanity.visual_editing_enabled {
        plugins.push(Plugin::PresentationTool {
            preview_url: PreviewUrl {
                origin: config.site.preview_origin.clone(),
                preview_mode: PreviewMode { enable: DRAFT_MODE_ENABLE, disable: DRAFT_MODE_DISABLE },
            },
            locations: vec!["post", "page"],
        });
    }

    StudioConfig {
        name: config.studio.name.clone(),
        title: config.studio.title.clone(),
        project_id: config.studio.project_id.clone().unwrap_or_else(|| config.sanity.project_id.clone()),
        dataset: config.studio.dataset.clone().unwrap_or_else(|| config.sanity.dataset.clone()),
        plugins,
    }
}
