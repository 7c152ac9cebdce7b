//! Command-line interface definitions for newswire.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags, and the API key can
//! also come from the environment.

use clap::Parser;

/// Search term used when none is given.
pub const DEFAULT_QUERY: &str = "holiday";

/// The Guardian's public demo key; fine for light use.
pub const DEFAULT_API_KEY: &str = "test";

/// Command-line arguments for newswire.
///
/// # Examples
///
/// ```sh
/// # Browse results for the default "holiday" query
/// newswire
///
/// # A different query with your own key
/// newswire -q brexit --api-key YOUR_KEY
///
/// # Headless: fetch once and print rows to stdout
/// newswire --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search term sent to the Guardian content API
    #[arg(short, long, default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Guardian API key
    #[arg(long, env = "GUARDIAN_API_KEY", default_value = DEFAULT_API_KEY)]
    pub api_key: String,

    /// Fetch once and print rows to stdout instead of starting the TUI
    #[arg(long)]
    pub once: bool,

    /// Log file used while the TUI owns the terminal
    #[arg(long, default_value = "newswire.log")]
    pub log_file: String,
}

impl Cli {
    /// The fully-formed search URL for this invocation.
    pub fn search_url(&self) -> String {
        crate::api::build_search_url(&self.query, &format!("&api-key={}", self.api_key))
    }
}
