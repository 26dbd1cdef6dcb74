//! Plain-HTTP fetcher
//!
//! Sufficient for the feed path, which is served as an ordinary RSS
//! document. Performs exactly one request per call; retry lives in the
//! pipeline's retry executor, never here, so the two layers do not
//! multiply attempts.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::shared_resources::global_http_client;
use crate::fetcher::{BrowserOptions, Fetcher, ResourceLocator, TransportError};

/// [`Fetcher`] backed by the shared reqwest client.
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    /// Fetcher using the process-wide shared client.
    pub fn new() -> Self {
        Self {
            client: global_http_client(),
        }
    }

    /// Fetcher using a caller-supplied client (custom proxies, timeouts).
    pub fn with_client(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        locator: &ResourceLocator,
        options: &BrowserOptions,
    ) -> Result<String, TransportError> {
        debug!(url = %locator.url, path = %locator.path, "fetching resource");

        let mut request = self.client.get(&locator.url);
        if let Some(user_agent) = &options.user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }
        if let Some(accept_language) = &options.accept_language {
            request = request.header(reqwest::header::ACCEPT_LANGUAGE, accept_language);
        }

        let response = request.send().await.map_err(classify_request_error)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TransportError::RateLimited(format!(
                "HTTP 429 from {}",
                locator.url
            )));
        }
        if !status.is_success() {
            return Err(TransportError::Unexpected(format!(
                "HTTP {status} from {}",
                locator.url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::Unexpected(format!("failed to read response body: {e}")))
    }
}

fn classify_request_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else {
        TransportError::Unexpected(error.to_string())
    }
}
