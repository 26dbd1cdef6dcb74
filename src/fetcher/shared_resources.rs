//! Shared resources for fetcher instances
//!
//! One process-wide HTTP client so connection pooling works across every
//! concurrent batch worker instead of each fetcher opening its own pool.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Time to establish a TCP connection.
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Overall budget for one request, body read included.
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Global HTTP client shared by all fetcher instances.
///
/// Both timeouts are explicit so a stalled endpoint cannot hang a batch
/// worker indefinitely.
pub static GLOBAL_HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    Arc::new(
        Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                panic!("FATAL: failed to build HTTP client: {e}. Check system TLS configuration.");
            }),
    )
});

/// Get the global HTTP client. Cloning the `Arc` is cheap.
pub fn global_http_client() -> Arc<Client> {
    GLOBAL_HTTP_CLIENT.clone()
}
