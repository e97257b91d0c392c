//! # rustplos
//!
//! Client for the PLOS Search API (Solr) with a handful of reports on top:
//! author bibliographies, all-time view totals, and per-day publication counts.
//!
//! ## Modules
//!
//! - [`query`] - Solr request construction
//! - [`normalize`] - JSON / XML response decoding into article records
//! - [`journals`] - Journal directory and article links
//! - [`dates`] - Day ranges in Solr timestamp syntax
//! - [`client`] - HTTP transport and search client
//! - [`reports`] - Author, views, histogram and per-day reports
//! - [`config`] - Runtime configuration and its on-disk store
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustplos::{client::PlosClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PlosClient::new(Config::new("my-api-key")?)?;
//!     let views = client.author_views("Michael B Eisen", &mut std::io::stdout()).await?;
//!     println!("Total: {}", views);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod journals;
pub mod normalize;
pub mod query;
pub mod reports;

pub use error::{PlosError, Result};
