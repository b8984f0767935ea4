//! # sheetgrep CLI
//!
//! The `sheetgrep` binary is the primary interface for the workbook
//! ingestion-and-search engine. It provides commands for database
//! initialization, workbook upload, keyword search, sheet viewing, and
//! starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! sheetgrep --config ./config/sheetgrep.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sheetgrep init` | Create the SQLite database and run schema migrations |
//! | `sheetgrep upload <path>` | Parse and index a workbook |
//! | `sheetgrep search <term>…` | Find rows containing every term |
//! | `sheetgrep files` | List uploaded files |
//! | `sheetgrep view <id>` | Print a file's reconstructed sheets |
//! | `sheetgrep download <id>` | Write the original workbook bytes back out |
//! | `sheetgrep delete <id>` | Delete a file and all of its rows |
//! | `sheetgrep serve` | Start the HTTP server |

mod blob;
mod cell;
mod config;
mod db;
mod error;
mod files;
mod index;
mod ingest;
mod migrate;
mod models;
mod reconstruct;
mod search;
mod server;
mod sqlite_store;
mod store;
mod workbook;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Workbook ingestion-and-search engine: upload spreadsheet workbooks, find
/// rows by keyword across all of them, and jump back to the original sheet.
#[derive(Parser)]
#[command(
    name = "sheetgrep",
    about = "Upload, index, and search spreadsheet workbooks by keyword",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/sheetgrep.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the files and rows tables.
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Parse a workbook and index its rows.
    ///
    /// Rejects re-uploads that match an existing file's name and byte size.
    Upload {
        /// Path to the workbook file.
        path: PathBuf,
    },

    /// Find rows containing every given term.
    ///
    /// Terms match as case-insensitive substrings of a row's text; a row is
    /// returned only when all terms match.
    Search {
        /// Keyword terms (all must match).
        #[arg(required = true)]
        terms: Vec<String>,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// List uploaded files.
    Files,

    /// Print a file's reconstructed sheets.
    ///
    /// Blank rows were dropped at ingestion, so the view is compacted;
    /// row numbering in search results still reflects original positions.
    View {
        /// File id.
        id: i64,
    },

    /// Write the original workbook bytes back out.
    Download {
        /// File id.
        id: i64,

        /// Output path. Defaults to the original upload name.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete a file, all of its rows, and its stored binary.
    Delete {
        /// File id.
        id: i64,
    },

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// upload, search, view, download, and delete endpoints.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Upload { path } => {
            ingest::run_upload(&cfg, &path).await?;
        }
        Commands::Search { terms, limit } => {
            search::run_search(&cfg, &terms, limit).await?;
        }
        Commands::Files => {
            files::run_list(&cfg).await?;
        }
        Commands::View { id } => {
            reconstruct::run_view(&cfg, id).await?;
        }
        Commands::Download { id, output } => {
            files::run_download(&cfg, id, output).await?;
        }
        Commands::Delete { id } => {
            files::run_delete(&cfg, id).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
