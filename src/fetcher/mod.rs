//! The transport boundary
//!
//! Everything that touches the network lives behind the [`Fetcher`] trait:
//! given a [`ResourceLocator`] and a set of [`BrowserOptions`], an
//! implementation returns the raw response text or a [`TransportError`].
//! The crate ships [`HttpFetcher`] for the feed path, which needs nothing
//! more than plain HTTP; the table and explore paths are served by a
//! rendered page, so their fetchers are supplied by the caller (browser
//! automation is out of scope here). The core never inspects how a fetcher
//! obtains its bytes.

use async_trait::async_trait;

pub mod http;
pub mod locator;
pub mod shared_resources;

pub use http::HttpFetcher;
pub use locator::ResourceLocator;

/// Which retry schedule a transport failure is eligible for.
///
/// Retry eligibility is a property of the error value, not of its type:
/// the executor asks the error for its class instead of downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Generic transient transport fault, short schedule
    Transport,
    /// Rate-limit response, longer schedule with jitter
    RateLimit,
}

/// Transport-level failures surfaced by a [`Fetcher`].
///
/// Every variant is transient from the pipeline's point of view and gets
/// retried; the class decides which schedule applies. Caller errors
/// (validation) and malformed responses (parse errors) are separate types
/// and never enter the retry loop.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The fetch did not complete within its time budget
    #[error("transport timeout: {0}")]
    Timeout(String),

    /// An expected page element never appeared during interaction
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// The service refused the request due to rate limiting
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other transport fault
    #[error("transport error: {0}")]
    Unexpected(String),
}

impl TransportError {
    /// The retry schedule this failure is eligible for.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            TransportError::RateLimited(_) => RetryClass::RateLimit,
            _ => RetryClass::Transport,
        }
    }

    /// Short description used inside retry log lines.
    pub fn description(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "transport timeout",
            TransportError::ElementNotFound(_) => "page element not found",
            TransportError::RateLimited(_) => "rate limit exceeded",
            TransportError::Unexpected(_) => "transport error",
        }
    }

    /// Remediation hint logged with the final failure.
    pub fn suggestion(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "Check your network connection and try again",
            TransportError::ElementNotFound(_) => {
                "The service may have changed its page structure; update the fetcher"
            }
            TransportError::RateLimited(_) => {
                "Reduce request frequency or wait before retrying"
            }
            TransportError::Unexpected(_) => "Check network connectivity and service status",
        }
    }
}

/// Rendering options forwarded to the fetcher.
///
/// Opaque to the core. A browser-backed fetcher honors all three fields;
/// [`HttpFetcher`] applies the header-shaped ones and ignores `headless`.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run any backing browser without a visible window
    pub headless: bool,
    /// Override the User-Agent header
    pub user_agent: Option<String>,
    /// Override the Accept-Language header
    pub accept_language: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: None,
            accept_language: None,
        }
    }
}

/// Raw-payload acquisition.
///
/// Implementations must be cheap to share across concurrent batch workers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the resource and return its raw text.
    async fn fetch(
        &self,
        locator: &ResourceLocator,
        options: &BrowserOptions,
    ) -> Result<String, TransportError>;
}

/// Whether a payload that arrived over a nominally successful transport
/// still reports rate limiting. Rendered explore pages surface HTTP 429
/// in the document title rather than the status line.
pub fn payload_reports_rate_limit(payload: &str) -> bool {
    let head: String = payload.chars().take(2048).collect();
    head.contains("429") && head.contains("Too Many Requests") || head.contains("Error 429")
}
