use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use crate::error::FetchError;

/// One blocking GET, body fully drained. No retries.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::ClientBuild(Arc::new(e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::invalid_endpoint(url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_endpoint(
                url,
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        let transport_err = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source: Arc::new(source),
        };

        let response = self.client.get(parsed).send().map_err(transport_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(transport_err)?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}
