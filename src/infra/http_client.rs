//! HTTP client factory with consistent timeout configuration.
//!
//! Outbound calls to the edge provider must use `build_client()` rather than
//! constructing `reqwest::Client` directly, so every provider round trip
//! carries a bounded timeout and can never pin a request handler open.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time). The Vercel domains
/// API answers within seconds; anything longer is treated as an outage.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client with default timeouts.
///
/// Panics if the client cannot be built (e.g., TLS misconfiguration). This is
/// acceptable for singleton constructors since the provider adapter cannot
/// function without an HTTP client.
pub fn build_client() -> Client {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}
