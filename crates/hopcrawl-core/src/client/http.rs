//! HTTP neighbor service client.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use serde_json::Value;
use tracing::{debug, trace};

use super::{FetchResult, NeighborSource};
use crate::config::CrawlerConfig;
use crate::error::{Error, FetchError, Result};
use crate::NodeId;

/// Maximum number of redirects followed per query.
const MAX_REDIRECTS: usize = 10;

/// Client for `GET {base_url}/{percent-encoded node id}`.
///
/// Cloning is cheap: clones share one connection pool, which is safe for
/// concurrent use. Each worker gets its own clone.
#[derive(Debug, Clone)]
pub struct HttpNeighborClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpNeighborClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] for an unusable base URL and
    /// [`Error::Initialization`] if the HTTP client cannot be built.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| Error::Initialization(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Returns the base URL queries are built from.
    #[must_use]
    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    /// Builds the query URL for `node`, percent-encoding it as one path
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unaddressable`] for `""`, `"."` and `".."`.
    /// URL parsing folds those segments (and their `%2E` spellings) into
    /// the parent path, which would query the base URL instead of the node.
    pub fn neighbor_url(&self, node: &str) -> std::result::Result<reqwest::Url, FetchError> {
        if matches!(node, "" | "." | "..") {
            return Err(FetchError::Unaddressable {
                node: node.to_owned(),
            });
        }
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(node);
        }
        Ok(url)
    }
}

#[async_trait]
impl NeighborSource for HttpNeighborClient {
    fn source_type(&self) -> &'static str {
        "http"
    }

    async fn fetch_neighbors(&self, node: &str) -> FetchResult {
        let url = self.neighbor_url(node)?;
        debug!(node, %url, "Sending neighbor request");

        let transport = |source: reqwest::Error| FetchError::Transport {
            node: node.to_owned(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                node: node.to_owned(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(transport)?;
        trace!(node, bytes = body.len(), "Response received");

        let parsed = parse_neighbors(node, &body)?;
        if let Some(reported) = parsed.node.as_deref() {
            if reported != node {
                debug!(node, reported, "Service reported a different node id");
            }
        }
        Ok(parsed.neighbors)
    }
}

/// Decoded neighbor service response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborsResponse {
    /// The `node` field, when present and a string.
    pub node: Option<String>,
    /// String entries of the `neighbors` array; empty when the field is
    /// missing or not an array.
    pub neighbors: Vec<NodeId>,
}

/// Decodes a response body.
///
/// Only invalid JSON is an error. Any valid document is accepted: fields
/// that are absent or of the wrong type are read as empty, and non-string
/// entries inside `neighbors` are skipped.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if `body` is not valid JSON.
pub fn parse_neighbors(
    node: &str,
    body: &[u8],
) -> std::result::Result<NeighborsResponse, FetchError> {
    let value: Value = serde_json::from_slice(body).map_err(|source| FetchError::Parse {
        node: node.to_owned(),
        source,
    })?;

    let reported = value.get("node").and_then(Value::as_str).map(str::to_owned);

    let neighbors = match value.get("neighbors") {
        Some(Value::Array(items)) => {
            let neighbors: Vec<NodeId> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect();
            if neighbors.len() != items.len() {
                debug!(
                    node,
                    skipped = items.len() - neighbors.len(),
                    "Ignoring non-string neighbor entries"
                );
            }
            neighbors
        }
        _ => Vec::new(),
    };

    Ok(NeighborsResponse {
        node: reported,
        neighbors,
    })
}
