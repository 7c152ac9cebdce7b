//! JSON extraction for Guardian search responses.
//!
//! The API answers with a body shaped like:
//!
//! ```text
//! { "response": { "results": [ { "sectionName", "webTitle", "type",
//!                                "webPublicationDate", "webUrl" }, ... ] } }
//! ```
//!
//! [`extract_articles`] turns that text into an ordered `Vec<Article>`,
//! failing soft on every malformed input: no error ever escapes this module.

use crate::models::Article;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Top-level envelope of a search response.
#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// One element of the `results` array.
///
/// Every field defaults to the empty string, so a record missing a key still
/// parses; a gap degrades that one field rather than the whole screen.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResult {
    #[serde(rename = "sectionName")]
    section_name: String,
    #[serde(rename = "webTitle")]
    web_title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "webPublicationDate")]
    web_publication_date: String,
    #[serde(rename = "webUrl")]
    web_url: String,
}

impl From<SearchResult> for Article {
    fn from(result: SearchResult) -> Self {
        Article {
            section: result.section_name,
            title: result.web_title,
            kind: result.kind,
            published_at: result.web_publication_date,
            url: result.web_url,
        }
    }
}

/// Extract the ordered article list from raw response text.
///
/// - Empty input yields `None`, which the loader maps to the no-connection
///   screen (an empty body only ever follows a failed fetch).
/// - Malformed JSON, or JSON without the expected envelope, is logged and
///   yields `Some(vec![])`, which the loader maps to the no-results screen.
/// - Well-formed input yields one [`Article`] per `results` element, in
///   server order.
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn extract_articles(text: &str) -> Option<Vec<Article>> {
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<SearchEnvelope>(text) {
        Ok(envelope) => {
            let articles: Vec<Article> = envelope
                .response
                .results
                .into_iter()
                .map(Article::from)
                .collect();
            debug!(count = articles.len(), "Extracted articles");
            Some(articles)
        }
        Err(e) => {
            warn!(error = %e, "Problem parsing the article JSON results");
            Some(Vec::new())
        }
    }
}
