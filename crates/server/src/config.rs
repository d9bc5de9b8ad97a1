use std::env::VarError;
use std::path::Path;

use anyhow::{Context, ensure};
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

pub const CONFIG_PATH_ENV: &str = "CODEQUIZ_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "codequiz.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
    /// JSON file of quiz documents imported at startup.
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            run_migrations: default_run_migrations(),
            seed_file: None,
        }
    }
}

impl StoreConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("failed to deserialize store config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_connections > 0,
            "max_connections must be at least 1"
        );
        ensure!(!self.database_url.is_empty(), "database_url must not be empty");
        Ok(())
    }

    /// Reads `$CODEQUIZ_CONFIG` (or `codequiz.toml` when present), then applies `DATABASE_URL`.
    pub fn load() -> Result<Self> {
        Self::resolve(
            std::env::var(CONFIG_PATH_ENV),
            std::env::var("DATABASE_URL"),
        )
    }

    fn resolve(
        config_path: std::result::Result<String, VarError>,
        database_url: std::result::Result<String, VarError>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Ok(path) => Self::from_file(path)?,
            Err(VarError::NotPresent) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(VarError::NotPresent) => Self::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {CONFIG_PATH_ENV}"));
            }
        };

        match database_url {
            Ok(url) => config.database_url = url,
            Err(VarError::NotPresent) => {}
            Err(err) => return Err(err).context("failed to read DATABASE_URL"),
        }

        config.validate()?;
        Ok(config)
    }
}

fn default_database_url() -> String {
    "sqlite://codequiz.sqlite?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}
