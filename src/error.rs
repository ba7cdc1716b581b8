use std::sync::Arc;

use thiserror::Error;

use crate::models::ItemId;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidEndpoint,
    TransportFailure,
    DecodeFailure,
}

/// Cloneable so callers waiting on the same in-flight fetch all receive it.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] Arc<reqwest::Error>),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },
    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("could not decode response: {reason}")]
    Decode { reason: String },
}

impl FetchError {
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEndpoint { .. } => ErrorKind::InvalidEndpoint,
            Self::ClientBuild(_) | Self::Transport { .. } | Self::HttpStatus { .. } => {
                ErrorKind::TransportFailure
            }
            Self::Decode { .. } => ErrorKind::DecodeFailure,
        }
    }
}

/// A failure recorded while producing a best-effort value.
#[derive(Debug)]
pub struct FetchFailure {
    /// The item being fetched, `None` for the top stories list.
    pub id: Option<ItemId>,
    pub error: FetchError,
}

/// A value that is always usable, plus whatever went wrong while producing it.
///
/// Lookups never fail outright: a failed story is a zero-valued story, a failed
/// list is an empty (or partially defaulted) list. `failures` tells the caller
/// whether that default is "nothing there" or "couldn't reach it".
#[derive(Debug)]
pub struct Fetched<T> {
    pub value: T,
    pub failures: Vec<FetchFailure>,
}

impl<T> Fetched<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            failures: Vec::new(),
        }
    }

    pub fn degraded(value: T, id: Option<ItemId>, error: FetchError) -> Self {
        Self {
            value,
            failures: vec![FetchFailure { id, error }],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
