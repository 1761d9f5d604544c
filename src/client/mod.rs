use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::client::source_map::ContentSourceMap;

pub mod export_client;
pub mod http_client;
pub mod source_map;

/// Query parameters, name to JSON value. Names are given without the `$`.
pub type QueryParams = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Published,
    Drafts,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Published => "published",
            Perspective::Drafts => "drafts",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMapMode {
    Disabled,
    WithKeyArraySelector,
}

impl SourceMapMode {
    /// Value of the `resultSourceMap` request parameter, if any.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            SourceMapMode::Disabled => None,
            SourceMapMode::WithKeyArraySelector => Some("withKeyArraySelector"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub perspective: Perspective,
    pub use_cdn: bool,
    pub token: Option<String>,
    pub result_source_map: SourceMapMode,
    pub stega: bool,
    /// `false` asks for the whole response envelope rather than only `result`
    pub filter_response: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    pub params: QueryParams,
    pub options: FetchOptions,
}

/// Response envelope of the query endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(rename = "resultSourceMap", default)]
    pub result_source_map: Option<ContentSourceMap>,
    #[serde(default)]
    pub ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unable to encode query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("query endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Error reading dataset export: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document in dataset export at line {line}: {source}")]
    Export { line: usize, source: serde_json::Error },
    #[error("unable to build query result: {0}")]
    Projection(serde_json::Error),
    #[error("query is not supported by the dataset export client: {0}")]
    UnsupportedQuery(String),
    #[error("missing query parameter ${0}")]
    MissingParam(String),
}

/// Executes a query against a content store.
///
/// Implementations never interpret the request options beyond passing them
/// on; errors are returned as they happened.
#[allow(async_fn_in_trait)]
pub trait ContentClient {
    async fn fetch(&self, request: &QueryRequest) -> Result<QueryResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_names() {
        assert_eq!(Perspective::Published.to_string(), "published");
        assert_eq!(Perspective::Drafts.to_string(), "drafts");
        assert_eq!(serde_json::to_string(&Perspective::Drafts).unwrap(), "\"drafts\"");
    }

    #[test]
    fn test_source_map_param() {
        assert_eq!(SourceMapMode::Disabled.param(), None);
        assert_eq!(SourceMapMode::WithKeyArraySelector.param(), Some("withKeyArraySelector"));
    }

    #[test]
    fn test_response_envelope() {
        let res: QueryResponse = serde_json::from_str(r#"{"query": "*", "result": [1, 2], "ms": 12}"#).unwrap();
        assert_eq!(res.result, serde_json::json!([1, 2]));
        assert_eq!(res.ms, Some(12));
        assert!(res.result_source_map.is_none());
    }
}
