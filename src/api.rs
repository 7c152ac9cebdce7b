//! Guardian content API client.
//!
//! This module owns everything that touches the network: search URL assembly,
//! a reachability probe, and the single HTTP GET that powers a screen load.
//!
//! # Error policy
//!
//! Nothing in here returns an error to the caller once a [`GuardianClient`]
//! exists. Malformed URLs, non-200 statuses, and transport failures are
//! logged at their origin and folded into a [`FetchOutcome`] so the loader
//! can pick a screen state instead of crashing.
//!
//! # Timeouts
//!
//! - Connect timeout: 15 seconds
//! - Read timeout: 10 seconds

use crate::models::FetchOutcome;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::net::lookup_host;
use tracing::{debug, error, info, instrument, warn};

/// Base of every search request; the query term and key are appended raw.
pub const SEARCH_ENDPOINT: &str = "http://content.guardianapis.com/search?q=";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Reasons a fetch can fail once a request is attempted.
///
/// Each variant is logged where it arises and then carried as data inside
/// [`FetchOutcome::RequestFailed`]; none of them propagates as an `Err`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL string could not be parsed.
    #[error("malformed request url: {0}")]
    MalformedUrl(#[from] url::ParseError),
    /// The server answered with something other than 200 OK.
    #[error("server answered with status {0}")]
    HttpStatus(StatusCode),
    /// Connection, timeout, or body-read failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Assemble the search request URL from a query term and a key parameter.
///
/// The key parameter carries its own `&api-key=` prefix and is concatenated
/// verbatim, as is the term. No percent-encoding is applied.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     build_search_url("holiday", "&api-key=XXX"),
///     "http://content.guardianapis.com/search?q=holiday&api-key=XXX"
/// );
/// ```
pub fn build_search_url(term: &str, key_param: &str) -> String {
    format!("{SEARCH_ENDPOINT}{term}{key_param}")
}

/// HTTP client for the Guardian search API.
///
/// Wraps a [`reqwest::Client`] configured with the connect and read timeouts
/// above. One instance is built at startup and shared across loads.
pub struct GuardianClient {
    http: Client,
}

impl GuardianClient {
    /// Build a client with the configured timeouts.
    pub fn new() -> Result<Self, FetchError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Perform one GET against `url` and return the tagged outcome.
    ///
    /// The target host is probed first; if it cannot be resolved the request
    /// is never opened and the outcome is [`FetchOutcome::NetworkUnavailable`].
    /// A 200 answer yields the full body text; anything else is logged and
    /// returned as [`FetchOutcome::RequestFailed`].
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let parsed = match url::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(error = %e, "Error with creating URL");
                return FetchOutcome::RequestFailed(e.into());
            }
        };

        if !host_reachable(&parsed).await {
            info!("Network unreachable; skipping request");
            return FetchOutcome::NetworkUnavailable;
        }

        match self.http.get(parsed).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.text().await {
                    Ok(body) => {
                        info!(bytes = body.len(), "Fetched search response");
                        debug!(preview = %truncate_for_log(&body, 300), "Response body");
                        FetchOutcome::Body(body)
                    }
                    Err(e) => {
                        error!(error = %e, "Problem reading the response body");
                        FetchOutcome::RequestFailed(e.into())
                    }
                }
            }
            Ok(response) => {
                let status = response.status();
                error!(%status, "Error response code");
                FetchOutcome::RequestFailed(FetchError::HttpStatus(status))
            }
            Err(e) => {
                error!(error = %e, "Problem retrieving the article JSON results");
                FetchOutcome::RequestFailed(e.into())
            }
        }
    }
}

/// Resolve the request's host as a cheap stand-in for a connectivity service.
///
/// Resolution uses the system resolver with a short timeout; it never opens a
/// connection to the target. Literal IP hosts resolve locally and always pass.
async fn host_reachable(url: &url::Url) -> bool {
    let Some(host) = url.host_str() else {
        warn!("Request URL has no host; treating network as unavailable");
        return false;
    };
    let port = url.port_or_known_default().unwrap_or(80);
    let target = format!("{host}:{port}");

    match tokio::time::timeout(PROBE_TIMEOUT, lookup_host(target)).await {
        Ok(Ok(mut addrs)) => addrs.next().is_some(),
        Ok(Err(e)) => {
            warn!(%host, error = %e, "Host lookup failed; treating network as unavailable");
            false
        }
        Err(_) => {
            warn!(%host, "Host lookup timed out; treating network as unavailable");
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::spawn_one_shot_server;
    use super::*;

    #[test]
    fn test_build_search_url() {
        assert_eq!(
            build_search_url("holiday", "&api-key=XXX"),
            "http://content.guardianapis.com/search?q=holiday&api-key=XXX"
        );
    }

    #[test]
    fn test_build_search_url_empty_parts() {
        assert_eq!(
            build_search_url("", ""),
            "http://content.guardianapis.com/search?q="
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_200() {
        let url = spawn_one_shot_server("200 OK", "{\"response\":{\"results\":[]}}".to_string()).await;
        let client = GuardianClient::new().unwrap();

        let outcome = client.fetch(&url).await;
        assert_eq!(
            outcome.into_body(),
            Some("{\"response\":{\"results\":[]}}".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_request_failed() {
        let url = spawn_one_shot_server("404 Not Found", "gone".to_string()).await;
        let client = GuardianClient::new().unwrap();

        match client.fetch(&url).await {
            FetchOutcome::RequestFailed(FetchError::HttpStatus(status)) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("expected HttpStatus failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_request_failed() {
        // Nothing listens on port 1; the probe passes (literal IP) but the
        // connection itself fails.
        let client = GuardianClient::new().unwrap();

        match client.fetch("http://127.0.0.1:1/search").await {
            FetchOutcome::RequestFailed(FetchError::Transport(_)) => {}
            other => panic!("expected Transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_url_is_request_failed() {
        let client = GuardianClient::new().unwrap();

        match client.fetch("not a url").await {
            FetchOutcome::RequestFailed(FetchError::MalformedUrl(_)) => {}
            other => panic!("expected MalformedUrl failure, got {other:?}"),
        }
    }
}
