//! rustplos - PLOS Search API reports
//!
//! Queries the PLOS Solr search endpoint and prints author bibliographies,
//! all-time view totals, or writes per-day publication counts to CSV.
//!
//! ## Usage
//!
//! ```bash
//! rustplos author "Michael B Eisen" --limit 5
//! rustplos graph 2009-10-01 2009-11-01 --out october.csv --query 'journal:"PLoS ONE"'
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustplos::client::PlosClient;
use rustplos::config::{Config, ConfigStore};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// PLOS Search API reports
#[derive(Parser)]
#[command(name = "rustplos")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// PLOS API key (overrides the stored key)
    #[arg(long, global = true, env = "PLOS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Search endpoint (default: http://api.plos.org/search)
    #[arg(long, global = true)]
    search_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Report(ReportCommand),

    /// Manage the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// List articles by an author
    Author {
        /// Author name
        name: String,

        /// Match any of the name's words instead of the exact name
        #[arg(long)]
        loose: bool,

        /// Maximum number of articles to list
        #[arg(short, long, default_value = "10")]
        limit: u64,
    },

    /// Total all-time views of an author's articles
    Views {
        /// Author name
        name: String,
    },

    /// Write per-day publication counts for [START, END) to CSV
    Graph {
        /// First day (YYYY-MM-DD, inclusive)
        start: String,

        /// Last day (YYYY-MM-DD, exclusive)
        end: String,

        /// Output file
        #[arg(short, long, default_value = "publications.csv")]
        out: PathBuf,

        /// Extra Solr clause ANDed onto each day, e.g. 'journal:"PLoS ONE"'
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List articles published on a day
    On {
        /// Day (YYYY-MM-DD)
        day: String,

        /// Restrict to one journal, e.g. "PLoS ONE"
        #[arg(short, long)]
        journal: Option<String>,
    },

    /// List articles by title (Solr syntax; quote for a phrase)
    Title {
        /// Title terms
        title: String,

        /// Maximum number of articles to list
        #[arg(short, long, default_value = "10")]
        limit: u64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show config file path
    Path,
    /// Store an API key
    SetKey {
        /// PLOS API key
        key: String,
    },
    /// Remove the stored configuration
    Clear,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let store = ConfigStore::new()?;

    match cli.command {
        Commands::Config { action } => handle_config(action, &store),
        Commands::Report(command) => {
            let config = Config::resolve(cli.api_key, cli.search_url, store.load())
                .context("Failed to load configuration")?
                .with_timeout_secs(cli.timeout);
            run_report(command, config).await
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

async fn run_report(command: ReportCommand, config: Config) -> Result<()> {
    let client = PlosClient::new(config)?;
    let mut stdout = io::stdout();

    match command {
        ReportCommand::Author { name, loose, limit } => {
            client.author_search(&name, !loose, limit, &mut stdout).await?;
        }
        ReportCommand::Views { name } => {
            client.author_views(&name, &mut stdout).await?;
        }
        ReportCommand::Graph {
            start,
            end,
            out,
            query,
        } => {
            let days = client
                .graph_pubs(&start, &end, &out, query.as_deref())
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            writeln!(stdout, "Saved {} days to {}", days, out.display())?;
        }
        ReportCommand::On { day, journal } => {
            client.pubs_on(&day, journal.as_deref(), &mut stdout).await?;
        }
        ReportCommand::Title { title, limit } => {
            client.title_search(&title, limit, &mut stdout).await?;
        }
    }

    Ok(())
}

// ============================================================================
// Config Management
// ============================================================================

fn handle_config(action: ConfigAction, store: &ConfigStore) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("Config file: {:?}", store.path());
        }
        ConfigAction::SetKey { key } => {
            // validate before persisting
            Config::new(key.as_str())?;
            let mut stored = store.load();
            stored.api_key = Some(key.trim().to_string());
            store.save(&stored)?;
            println!("API key saved to {:?}", store.path());
        }
        ConfigAction::Clear => {
            store.clear()?;
            println!("Configuration cleared.");
        }
    }

    Ok(())
}
