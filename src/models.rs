//! Data models for search results and fetch outcomes.
//!
//! This module defines the two value types that flow through the pipeline:
//! - [`Article`]: one search result, as shown in the list
//! - [`FetchOutcome`]: the tagged result of a single HTTP fetch
//!
//! Articles are plain immutable values with structural equality only; the
//! order of an article sequence is whatever the server returned and is never
//! sorted or deduplicated downstream.

use crate::api::FetchError;

/// A single article record from the Guardian search API.
///
/// Built by the parser from one element of the `response.results` array,
/// consumed by the list presentation and the click-through handler.
///
/// # Fields
///
/// * `section` - The section the article is listed under (`sectionName`)
/// * `title` - The article headline (`webTitle`)
/// * `kind` - The kind of piece, e.g. "article" or "liveblog" (the API's `type`)
/// * `published_at` - ISO-8601 publication timestamp (`webPublicationDate`)
/// * `url` - The article's web URL (`webUrl`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The section the article is listed under.
    pub section: String,
    /// The article headline.
    pub title: String,
    /// The kind of piece ("article", "liveblog", ...).
    pub kind: String,
    /// ISO-8601 publication timestamp, reformatted at render time.
    pub published_at: String,
    /// The article's web URL, opened on click-through.
    pub url: String,
}

/// The tagged outcome of one HTTP fetch.
///
/// Produced by [`GuardianClient::fetch`](crate::api::GuardianClient::fetch),
/// consumed by the loader. Failures never cross this boundary as errors; they
/// are logged at their origin and carried here as data so the orchestrator can
/// pick a screen state.
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with the full response body.
    Body(String),
    /// The reachability probe failed; no request was issued.
    NetworkUnavailable,
    /// The request was issued but did not yield a 200 body.
    RequestFailed(FetchError),
}

impl FetchOutcome {
    /// The response body, if the fetch produced one.
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Body(body) => Some(body),
            FetchOutcome::NetworkUnavailable | FetchOutcome::RequestFailed(_) => None,
        }
    }
}
