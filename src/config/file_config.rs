use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub per_page: Option<usize>,
    pub read_pool_size: Option<usize>,
    pub network_csv: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            db_path = "/data/credits.db"
            port = 8080
            per_page = 50
            read_pool_size = 8
            network_csv = "/data/network.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/data/credits.db"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.per_page, Some(50));
        assert_eq!(config.read_pool_size, Some(8));
        assert_eq!(config.network_csv.as_deref(), Some("/data/network.csv"));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let config: FileConfig = toml::from_str("port = 3000").unwrap();
        assert_eq!(config.port, Some(3000));
        assert!(config.db_path.is_none());
        assert!(config.network_csv.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "db_path = \"credits.db\"\nport = 9000\n").unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.db_path.as_deref(), Some("credits.db"));
        assert_eq!(config.port, Some(9000));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "port = \"not a number").unwrap();

        assert!(FileConfig::load(&path).is_err());
    }
}
