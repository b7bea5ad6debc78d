mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_PER_PAGE: usize = 100;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// CLI arguments that take part in config resolution. Mirrors the
/// fields that a TOML config file can override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub per_page: Option<usize>,
    pub read_pool_size: Option<usize>,
    pub network_csv: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub per_page: usize,
    pub read_pool_size: usize,
    pub network_csv: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and an optional TOML
    /// file config. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        let per_page = file
            .per_page
            .or(cli.per_page)
            .unwrap_or(DEFAULT_PER_PAGE);
        if per_page == 0 {
            bail!("per_page must be greater than zero");
        }

        let read_pool_size = file
            .read_pool_size
            .or(cli.read_pool_size)
            .unwrap_or(DEFAULT_READ_POOL_SIZE);
        if read_pool_size == 0 {
            bail!("read_pool_size must be greater than zero");
        }

        let network_csv = file
            .network_csv
            .map(PathBuf::from)
            .or_else(|| cli.network_csv.clone());
        if let Some(ref csv) = network_csv {
            if !csv.is_file() {
                bail!("Network csv does not exist: {:?}", csv);
            }
        }

        Ok(AppConfig {
            db_path,
            port: file.port.unwrap_or(cli.port),
            per_page,
            read_pool_size,
            network_csv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> CliConfig {
        CliConfig {
            db_path: Some(PathBuf::from("/cli/credits.db")),
            port: 3000,
            per_page: None,
            read_pool_size: None,
            network_csv: None,
        }
    }

    #[test]
    fn test_cli_only_uses_defaults() {
        let config = AppConfig::resolve(&cli(), None).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/cli/credits.db"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.per_page, DEFAULT_PER_PAGE);
        assert_eq!(config.read_pool_size, DEFAULT_READ_POOL_SIZE);
        assert!(config.network_csv.is_none());
    }

    #[test]
    fn test_file_overrides_cli() {
        let file = FileConfig {
            db_path: Some("/file/credits.db".to_string()),
            port: Some(8080),
            per_page: Some(25),
            read_pool_size: None,
            network_csv: None,
        };
        let config = AppConfig::resolve(&cli(), Some(file)).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/file/credits.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.per_page, 25);
    }

    #[test]
    fn test_db_path_is_required() {
        let cli = CliConfig {
            db_path: None,
            ..cli()
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }

    #[test]
    fn test_zero_per_page_rejected() {
        let file = FileConfig {
            per_page: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli(), Some(file)).is_err());
    }

    #[test]
    fn test_missing_network_csv_rejected() {
        let cli = CliConfig {
            network_csv: Some(PathBuf::from("/definitely/not/here.csv")),
            ..cli()
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }
}
