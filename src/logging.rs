//! Tracing subscriber setup
//!
//! The library itself only emits `tracing` events; installing a
//! subscriber is the embedding application's call. [`init_tracing`] is
//! the one-liner for applications that want the standard setup.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber with env-driven filtering and optional
/// JSON formatting.
///
/// The filter honors `RUST_LOG` and defaults to
/// `trend_data_downloader=info`. Setting `LOG_FORMAT=json` switches to
/// structured JSON output for log collectors.
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trend_data_downloader=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()?;
    }
    Ok(())
}
