//! Background load orchestration and the screen state machine.
//!
//! A screen load is one trip through the pipeline: fetch the search URL,
//! parse the body into articles, and report back to the UI loop over a
//! channel. The fetch-and-parse leg runs in a spawned task so the terminal
//! stays responsive; the UI loop applies completions between frames.
//!
//! # Generations
//!
//! Every [`NewsLoader::start_load`] bumps a generation counter, and each
//! completion carries the generation that started it. The UI loop asks
//! [`NewsLoader::is_current`] before applying a completion, so a slow load
//! that finishes after a reload was requested is discarded instead of
//! overwriting newer state.

use crate::api::GuardianClient;
use crate::models::Article;
use crate::parse::extract_articles;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// The mutually exclusive screen states.
///
/// `Loading` shows the progress text; the other three are terminal until the
/// next load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// A load is in flight; show the progress indicator.
    Loading,
    /// The fetch produced nothing at all (network-layer failure).
    NoConnection,
    /// The fetch succeeded but the result list was empty.
    NoResults,
    /// Articles to show, in server order.
    Populated(Vec<Article>),
}

/// Map a finished load onto a screen state.
///
/// `None` means the network layer produced nothing; an empty list means the
/// server answered but had no results.
pub fn classify(outcome: Option<Vec<Article>>) -> LoadState {
    match outcome {
        None => LoadState::NoConnection,
        Some(articles) if articles.is_empty() => LoadState::NoResults,
        Some(articles) => LoadState::Populated(articles),
    }
}

/// One finished background load, tagged with the generation that started it.
#[derive(Debug)]
pub struct LoadCompletion {
    /// Generation at the time the load was started.
    pub generation: u64,
    /// The fetched and parsed articles, or `None` on network failure.
    pub articles: Option<Vec<Article>>,
}

/// Starts background loads and tracks which one is current.
pub struct NewsLoader {
    client: Arc<GuardianClient>,
    url: String,
    generation: u64,
    completions: mpsc::UnboundedSender<LoadCompletion>,
}

impl NewsLoader {
    /// Build a loader for one search URL, along with the receiving end the
    /// UI loop polls for completions.
    pub fn new(
        client: GuardianClient,
        url: String,
    ) -> (Self, mpsc::UnboundedReceiver<LoadCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            client: Arc::new(client),
            url,
            generation: 0,
            completions: tx,
        };
        (loader, rx)
    }

    /// Kick off a background fetch-and-parse and return its generation.
    #[instrument(level = "info", skip_all)]
    pub fn start_load(&mut self) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let client = Arc::clone(&self.client);
        let url = self.url.clone();
        let completions = self.completions.clone();

        info!(generation, "Starting background load");
        tokio::spawn(async move {
            let articles = load_in_background(&client, &url).await;
            // The UI side may already be gone during shutdown.
            let _ = completions.send(LoadCompletion {
                generation,
                articles,
            });
        });
        generation
    }

    /// Whether a completion belongs to the most recently started load.
    pub fn is_current(&self, completion: &LoadCompletion) -> bool {
        let current = completion.generation == self.generation;
        if !current {
            debug!(
                stale = completion.generation,
                current = self.generation,
                "Discarding stale load completion"
            );
        }
        current
    }
}

/// Run the fetch-and-parse pipeline once.
///
/// `None` signals a network-layer failure (unreachable host, non-200 answer,
/// transport error, or an empty body); `Some` carries the parsed list, which
/// may be empty.
pub async fn load_in_background(client: &GuardianClient, url: &str) -> Option<Vec<Article>> {
    let body = client.fetch(url).await.into_body()?;
    extract_articles(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::spawn_one_shot_server;

    const TWO_ITEM_FIXTURE: &str = r#"{
        "response": {
            "results": [
                {
                    "type": "article",
                    "sectionName": "Travel",
                    "webPublicationDate": "2016-08-06T12:00:00Z",
                    "webTitle": "Ten holiday escapes",
                    "webUrl": "https://www.theguardian.com/travel/escapes"
                },
                {
                    "type": "article",
                    "sectionName": "Money",
                    "webPublicationDate": "2016-08-07T09:30:00Z",
                    "webTitle": "Holiday money tips",
                    "webUrl": "https://www.theguardian.com/money/tips"
                }
            ]
        }
    }"#;

    #[test]
    fn test_classify_none_is_no_connection() {
        assert_eq!(classify(None), LoadState::NoConnection);
    }

    #[test]
    fn test_classify_empty_is_no_results() {
        assert_eq!(classify(Some(Vec::new())), LoadState::NoResults);
    }

    #[test]
    fn test_classify_non_empty_is_populated() {
        let article = Article {
            section: "Travel".to_string(),
            title: "Ten holiday escapes".to_string(),
            kind: "article".to_string(),
            published_at: "2016-08-06T12:00:00Z".to_string(),
            url: "https://www.theguardian.com/travel/escapes".to_string(),
        };
        match classify(Some(vec![article.clone()])) {
            LoadState::Populated(articles) => assert_eq!(articles, vec![article]),
            other => panic!("expected Populated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let client = GuardianClient::new().unwrap();
        // Port 1 refuses connections, so the spawned loads fail fast.
        let (mut loader, _rx) = NewsLoader::new(client, "http://127.0.0.1:1/search".to_string());

        let first = loader.start_load();
        let second = loader.start_load();

        assert!(!loader.is_current(&LoadCompletion {
            generation: first,
            articles: None,
        }));
        assert!(loader.is_current(&LoadCompletion {
            generation: second,
            articles: None,
        }));
    }

    #[tokio::test]
    async fn test_end_to_end_two_item_fixture() {
        let url = spawn_one_shot_server("200 OK", TWO_ITEM_FIXTURE.to_string()).await;
        let client = GuardianClient::new().unwrap();

        let articles = load_in_background(&client, &url).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, "https://www.theguardian.com/travel/escapes");
        assert_eq!(articles[1].url, "https://www.theguardian.com/money/tips");

        let rows = crate::ui::article_rows(&articles);
        assert_eq!(rows.len(), 2);

        match classify(Some(articles)) {
            LoadState::Populated(list) => assert_eq!(list.len(), 2),
            other => panic!("expected Populated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_reports_completion_over_channel() {
        let url = spawn_one_shot_server("200 OK", TWO_ITEM_FIXTURE.to_string()).await;
        let client = GuardianClient::new().unwrap();
        let (mut loader, mut rx) = NewsLoader::new(client, url);

        let generation = loader.start_load();
        let completion = rx.recv().await.expect("loader task dropped the channel");

        assert_eq!(completion.generation, generation);
        assert!(loader.is_current(&completion));
        assert_eq!(completion.articles.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_load_against_unreachable_server_is_none() {
        let client = GuardianClient::new().unwrap();
        let articles = load_in_background(&client, "http://127.0.0.1:1/search").await;
        assert_eq!(articles, None);
    }
}
