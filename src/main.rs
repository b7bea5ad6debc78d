use anyhow::{Context, Result};
use clap::Parser;
use credits_catalog_server::config::{AppConfig, CliConfig, FileConfig};
use credits_catalog_server::{run_server, NoRelated, SqliteCreditsStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite credits database file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// Default page size for listing endpoints.
    #[clap(long)]
    pub per_page: Option<usize>,

    /// Number of read connections to the database.
    #[clap(long)]
    pub read_pool_size: Option<usize>,

    /// Path to the collaboration network csv served at /data.json.
    #[clap(long, value_parser = parse_path)]
    pub network_csv: Option<PathBuf>,

    /// Path to a TOML config file; its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match cli_args.config {
        Some(ref path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        db_path: cli_args.db_path.clone(),
        port: cli_args.port,
        per_page: cli_args.per_page,
        read_pool_size: cli_args.read_pool_size,
        network_csv: cli_args.network_csv.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening SQLite credits database at {:?}...", config.db_path);
    let store = Arc::new(SqliteCreditsStore::new(
        &config.db_path,
        config.read_pool_size,
    )?);

    // No model artifact wired in yet, recommendations are empty.
    let related = Arc::new(NoRelated);

    run_server(&config, store, related).await
}
