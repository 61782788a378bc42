//! Error types for hopcrawl-core.
//!
//! Two families live here. [`FetchError`] covers one neighbor query and is
//! always recovered by the level worker. [`Error`] covers everything that
//! aborts a traversal before or while it runs.

use thiserror::Error;

/// Failure of a single neighbor query.
///
/// Never fatal: the worker that issued the query logs it and treats the
/// node as having zero neighbors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failure, timeout, or any other transport-level problem.
    #[error("transport error for node {node}: {source}")]
    Transport {
        /// Node whose neighbors were requested.
        node: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status code.
    #[error("transport error for node {node}: service returned {status}")]
    Status {
        /// Node whose neighbors were requested.
        node: String,
        /// HTTP status returned by the service.
        status: reqwest::StatusCode,
    },

    /// The body was transported but is not valid JSON.
    #[error("parse error for node {node}: {source}")]
    Parse {
        /// Node whose neighbors were requested.
        node: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The source has no way to answer for this node right now.
    #[error("node {node} unavailable: {reason}")]
    Unavailable {
        /// Node whose neighbors were requested.
        node: String,
        /// Human readable reason.
        reason: String,
    },

    /// The node id has no path-segment encoding that survives URL
    /// normalization (`""`, `"."`, `".."`), so no request was sent.
    #[error("node id {node:?} cannot be addressed as a path segment")]
    Unaddressable {
        /// Node whose neighbors were requested.
        node: String,
    },
}

impl FetchError {
    /// Returns the node id the failed query was about.
    #[must_use]
    pub fn node(&self) -> &str {
        match self {
            Self::Transport { node, .. }
            | Self::Status { node, .. }
            | Self::Parse { node, .. }
            | Self::Unavailable { node, .. }
            | Self::Unaddressable { node } => node,
        }
    }

    /// Returns `true` if the query failed on the way to or from the
    /// service, as opposed to decoding or addressing.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Parse { .. } | Self::Unaddressable { .. })
    }
}

/// Fatal traversal and setup errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration sources could not be merged or extracted.
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// The service base URL cannot be used to build neighbor queries.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The neighbor client could not be created.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A level worker did not run to completion.
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Result type alias for hopcrawl-core operations.
pub type Result<T> = std::result::Result<T, Error>;
