//! Credits Import Tool
//!
//! Imports a pipe-delimited catalog export (producers, performers,
//! songs, albums, production events) into a SQLite credits database.

use anyhow::Result;
use clap::Parser;
use credits_catalog_server::loader::{load_all, CreditFiles};
use credits_catalog_server::SqliteCreditsStore;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "credits-import")]
#[command(about = "Import pipe-delimited credits dump files into a SQLite database")]
struct Args {
    /// Path to the producers dump file
    #[arg(value_name = "PRODUCERS_FILE")]
    producers: PathBuf,

    /// Path to the performers dump file
    #[arg(value_name = "PERFORMERS_FILE")]
    performers: PathBuf,

    /// Path to the songs dump file
    #[arg(value_name = "SONGS_FILE")]
    songs: PathBuf,

    /// Path to the albums dump file
    #[arg(value_name = "ALBUMS_FILE")]
    albums: PathBuf,

    /// Path to the production events dump file
    #[arg(value_name = "EVENTS_FILE")]
    events: PathBuf,

    /// Path to the output SQLite database file
    #[arg(value_name = "OUTPUT_DB")]
    output_db: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Credits Import Tool");
    info!("===================");
    info!("Output database: {}", args.output_db.display());

    if args.output_db.exists() {
        warn!(
            "Output database already exists: {}",
            args.output_db.display()
        );
        warn!("The import will fail on rows that are already present.");
    }

    let store = SqliteCreditsStore::new(&args.output_db, 1)?;

    let files = CreditFiles {
        producers: args.producers,
        performers: args.performers,
        songs: args.songs,
        albums: args.albums,
        events: args.events,
    };

    let summary = load_all(&store, &files)?;

    info!("Import complete:");
    info!("  Producers: {}", summary.producers);
    info!("  Performers: {}", summary.performers);
    info!("  Songs: {}", summary.songs);
    info!("  Albums: {}", summary.albums);
    info!("  Production events: {}", summary.events);

    Ok(())
}
