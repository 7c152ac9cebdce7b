//! # newswire
//!
//! A terminal client for the Guardian content search API. One search term in,
//! a scrollable list of articles out, with Enter opening the selected story
//! in the system browser.
//!
//! ## Usage
//!
//! ```sh
//! newswire -q holiday
//! newswire --once          # headless: print rows to stdout
//! ```
//!
//! ## Architecture
//!
//! The application is one pipeline per screen load:
//! 1. **Fetch**: one HTTP GET against the search endpoint ([`api`])
//! 2. **Parse**: JSON body into ordered [`models::Article`] records ([`parse`])
//! 3. **Classify**: pick the screen state — no-connection, no-results, or
//!    populated ([`loader`])
//! 4. **Present**: bind the records to the terminal list ([`ui`])
//!
//! The fetch-and-parse leg runs in a background task; completions come back
//! to the UI loop over a channel, tagged with a load generation so a stale
//! load can never overwrite a newer one.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod loader;
mod models;
mod parse;
mod ui;
mod utils;

use api::GuardianClient;
use cli::Cli;
use loader::NewsLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing(&args)?;
    info!(query = %args.query, once = args.once, "newswire starting up");

    let url = args.search_url();
    debug!(%url, "Search URL assembled");

    let client = GuardianClient::new()?;

    if args.once {
        run_once(&client, &url).await;
        return Ok(());
    }

    let (loader, completions) = NewsLoader::new(client, url);
    ui::run(loader, completions).await
}

/// Headless mode: run the pipeline once and print rows to stdout.
///
/// Mirrors the three screen states so scripts see the same collapse of
/// failures the TUI shows.
async fn run_once(client: &GuardianClient, url: &str) {
    match loader::load_in_background(client, url).await {
        None => println!("{}", ui::NO_CONNECTION_MESSAGE),
        Some(articles) if articles.is_empty() => println!("{}", ui::NO_RESULTS_MESSAGE),
        Some(articles) => {
            for article in &articles {
                let date =
                    utils::format_publication_date(&article.published_at).unwrap_or_default();
                println!(
                    "{} | {} | {} | {}\n    {}",
                    article.section, article.title, article.kind, date, article.url
                );
            }
            info!(count = articles.len(), "Printed articles");
        }
    }
}

/// Initialize tracing the same way in both modes, but route output to a file
/// while the TUI owns the terminal.
fn init_tracing(args: &Cli) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());

    if args.once {
        builder.init();
    } else {
        let log = std::fs::File::create(&args.log_file)?;
        builder.with_ansi(false).with_writer(Arc::new(log)).init();
    }
    Ok(())
}
