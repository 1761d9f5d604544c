use std::collections::HashMap;

use serde::Deserialize;

/// Content source map as returned with `resultSourceMap=withKeyArraySelector`.
///
/// `mappings` is keyed by a JSON path into the query result
/// (`$['body'][_key=="b1"]['children']`); each mapping points at an entry of
/// `documents` and an entry of `paths`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ContentSourceMap {
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub mappings: HashMap<String, Mapping>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mapping {
    pub source: MappingSource,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum MappingSource {
    #[serde(rename = "documentValue")]
    DocumentValue { document: usize, path: usize },
    #[serde(rename = "literal")]
    Literal,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation<'a> {
    pub document: &'a SourceDocument,
    /// Path inside the source document, including the part of the result
    /// path that was below the matched mapping.
    pub path: String,
}

impl ContentSourceMap {
    /// Finds the document field a result value came from.
    ///
    /// The longest mapping key that prefixes `result_path` wins; the remainder
    /// of the result path is appended to the mapped document path.
    pub fn resolve(&self, result_path: &str) -> Option<SourceLocation<'_>> {
        let (key, mapping) = self.mappings.iter()
            .filter(|(key, _)| Self::is_path_prefix(key, result_path))
            .max_by_key(|(key, _)| key.len())?;

        let MappingSource::DocumentValue { document, path } = &mapping.source else {
            return None;
        };

        let document = self.documents.get(*document)?;
        let base = self.paths.get(*path)?;
        let suffix = &result_path[key.len()..];

        Some(SourceLocation {
            document,
            path: format!("{}{}", base, suffix),
        })
    }

    fn is_path_prefix(key: &str, path: &str) -> bool {
        path.starts_with(key) && (path.len() == key.len() || path[key.len()..].starts_with('['))
    }
}
