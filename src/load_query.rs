use std::sync::Arc;

use serde::de::DeserializeOwned;
use spdlog::debug;
use thiserror::Error;

use crate::client::source_map::ContentSourceMap;
use crate::client::{ContentClient, FetchError, FetchOptions, Perspective, QueryParams, QueryRequest, SourceMapMode};
use crate::config::SanityConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The `SANITY_API_READ_TOKEN` environment variable is required during Visual Editing.")]
    MissingToken,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("query result does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedQuery<T> {
    pub data: T,
    pub source_map: Option<ContentSourceMap>,
    pub perspective: Perspective,
}

/// Runs queries for page rendering, picking drafts or published content
/// from the visual editing flag of the configuration.
pub struct QueryLoader<C> {
    client: C,
    config: Arc<SanityConfig>,
}

impl<C: ContentClient> QueryLoader<C> {
    pub fn new(client: C, config: Arc<SanityConfig>) -> Self {
        QueryLoader { client, config }
    }

    /// Options a query is sent with. Fails when visual editing is on and no
    /// read token is configured.
    pub fn fetch_options(&self) -> Result<FetchOptions, LoadError> {
        let visual_editing = self.config.visual_editing_enabled;
        if !visual_editing {
            return Ok(FetchOptions {
                perspective: Perspective::Published,
                use_cdn: true,
                token: None,
                result_source_map: SourceMapMode::Disabled,
                stega: false,
                filter_response: false,
            });
        }

        let Some(ref token) = self.config.read_token else {
            return Err(LoadError::MissingToken);
        };

        Ok(FetchOptions {
            perspective: Perspective::Drafts,
            use_cdn: false,
            token: Some(token.clone()),
            result_source_map: SourceMapMode::WithKeyArraySelector,
            stega: true,
            filter_response: false,
        })
    }

    pub async fn load_query<T: DeserializeOwned>(&self, query: &str, params: Option<QueryParams>)
                                                 -> Result<LoadedQuery<T>, LoadError> {
        let options = self.fetch_options()?;
        let perspective = options.perspective;

        let request = QueryRequest {
            query: query.to_string(),
            params: params.unwrap_or_default(),
            options,
        };

        debug!("Loading query with perspective={} params={:?}", perspective, request.params.keys().collect::<Vec<_>>());
        let response = self.client.fetch(&request).await?;
        let data = serde_json::from_value::<T>(response.result)?;

        Ok(LoadedQuery {
            data,
            source_map: response.result_source_map,
            perspective,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use crate::client::QueryResponse;

    use super::*;

    /// Records every request and answers with a canned envelope.
    struct RecordingClient {
        requests: Mutex<Vec<QueryRequest>>,
        response: Value,
    }

    impl RecordingClient {
        fn new(response: Value) -> Self {
            RecordingClient { requests: Mutex::new(vec![]), response }
        }

        fn requests(&self) -> Vec<QueryRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ContentClient for &RecordingClient {
        async fn fetch(&self, request: &QueryRequest) -> Result<QueryResponse, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(serde_json::from_value(self.response.clone()).unwrap())
        }
    }

    struct FailingClient;

    impl ContentClient for FailingClient {
        async fn fetch(&self, _request: &QueryRequest) -> Result<QueryResponse, FetchError> {
            Err(FetchError::Status { status: 400, body: "expected '}' following object body".to_string() })
        }
    }

    fn config(visual_editing_enabled: bool, read_token: Option<&str>) -> Arc<SanityConfig> {
        Arc::new(SanityConfig {
            visual_editing_enabled,
            read_token: read_token.map(|t| t.to_string()),
            ..SanityConfig::default()
        })
    }

    fn source_map_response() -> Value {
        json!({
            "result": {"title": "Hello World"},
            "resultSourceMap": {
                "documents": [{"_id": "drafts.post-hello", "_type": "post"}],
                "paths": ["$['title']"],
                "mappings": {"$['title']": {"type": "value", "source": {"type": "documentValue", "document": 0, "path": 0}}}
            }
        })
    }

    #[tokio::test]
    async fn test_published_without_token() {
        let client = RecordingClient::new(json!({"result": ["a", "b"]}));
        // a configured token is still not sent outside visual editing
        let loader = QueryLoader::new(&client, config(false, Some("sk-token")));

        let loaded: LoadedQuery<Vec<String>> = loader.load_query("*[_type == 'post'].title", None).await.unwrap();
        assert_eq!(loaded.data, vec!["a", "b"]);
        assert_eq!(loaded.perspective, Perspective::Published);
        assert!(loaded.source_map.is_none());

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let options = &requests[0].options;
        assert_eq!(options.perspective, Perspective::Published);
        assert_eq!(options.token, None);
        assert_eq!(options.result_source_map, SourceMapMode::Disabled);
        assert!(!options.stega);
        assert!(options.use_cdn);
        assert!(requests[0].params.is_empty());
    }

    #[tokio::test]
    async fn test_drafts_with_token() {
        let client = RecordingClient::new(source_map_response());
        let loader = QueryLoader::new(&client, config(true, Some("sk-token")));

        let mut params = QueryParams::new();
        params.insert("slug".to_string(), json!("hello-world"));
        let loaded: LoadedQuery<Value> = loader.load_query("*[slug.current == $slug][0]{title}", Some(params)).await.unwrap();

        assert_eq!(loaded.perspective, Perspective::Drafts);
        assert_eq!(loaded.data, json!({"title": "Hello World"}));
        let source_map = loaded.source_map.unwrap();
        assert_eq!(source_map.resolve("$['title']").unwrap().document.id, "drafts.post-hello");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let options = &requests[0].options;
        assert_eq!(options.perspective, Perspective::Drafts);
        assert_eq!(options.token.as_deref(), Some("sk-token"));
        assert_eq!(options.result_source_map, SourceMapMode::WithKeyArraySelector);
        assert!(options.stega);
        assert!(!options.use_cdn);
        assert_eq!(requests[0].params.get("slug"), Some(&json!("hello-world")));
    }

    #[tokio::test]
    async fn test_drafts_without_token_fails_before_fetch() {
        let client = RecordingClient::new(json!({"result": null}));
        let loader = QueryLoader::new(&client, config(true, None));

        let res: Result<LoadedQuery<Value>, _> = loader.load_query("*", None).await;
        assert!(matches!(res, Err(LoadError::MissingToken)));
        assert!(client.requests().is_empty());
        assert_eq!(
            LoadError::MissingToken.to_string(),
            "The `SANITY_API_READ_TOKEN` environment variable is required during Visual Editing."
        );
    }

    #[tokio::test]
    async fn test_fetch_error_is_propagated() {
        let loader = QueryLoader::new(FailingClient, config(false, None));
        let res: Result<LoadedQuery<Value>, _> = loader.load_query("*[", None).await;
        match res {
            Err(LoadError::Fetch(FetchError::Status { status, body })) => {
                assert_eq!(status, 400);
                assert_eq!(body, "expected '}' following object body");
            }
            other => panic!("unexpected result: {:?}", other.map(|l| l.data)),
        }
    }

    #[tokio::test]
    async fn test_result_shape_mismatch() {
        let client = RecordingClient::new(json!({"result": {"title": 42}}));
        let loader = QueryLoader::new(&client, config(false, None));
        let res: Result<LoadedQuery<Vec<String>>, _> = loader.load_query("*", None).await;
        assert!(matches!(res, Err(LoadError::Decode(_))));
    }
}
