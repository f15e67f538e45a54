//! HTTP fetching for the crawler.

use reqwest::blocking::Client;
use std::time::Duration;

/// User agent sent with every crawl request.
pub const USER_AGENT: &str = concat!("webminer/", env!("CARGO_PKG_VERSION"));

/// Builds the blocking HTTP client used by all crawl workers.
///
/// Redirects are followed, responses time out after 30 seconds, and TLS
/// certificate errors are tolerated so self-signed hosts can be crawled.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .build()
}

/// Fetches a URL and returns the response body.
///
/// The status code is not inspected: whatever body the server returns is
/// the page content. Callers treat an empty body as a failed fetch.
pub fn fetch(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send()?.text()
}
