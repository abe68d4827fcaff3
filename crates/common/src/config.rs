//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Pagination limits for listings.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Trending ranking configuration.
    #[serde(default)]
    pub trending: TrendingConfig,
    /// Vote transition configuration.
    #[serde(default)]
    pub voting: VotingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Page size limits.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not name one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Hard cap; larger requested sizes are clamped to this.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

/// Trending ranking configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrendingConfig {
    /// Upper bound on public prompts loaded into memory for one ranking.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u64,
}

/// Vote transition configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VotingConfig {
    /// How many times a transition is re-attempted after a retryable store failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_page_size() -> u64 {
    5
}

const fn default_max_page_size() -> u64 {
    50
}

const fn default_max_candidates() -> u64 {
    10_000
}

const fn default_max_retries() -> u32 {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
        }
    }
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `PROMPTVAULT_ENV`)
    /// 3. Environment variables with `PROMPTVAULT__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("PROMPTVAULT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PROMPTVAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("PROMPTVAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/promptvault"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.pagination.default_page_size, 5);
        assert_eq!(config.pagination.max_page_size, 50);
        assert_eq!(config.trending.max_candidates, 10_000);
        assert_eq!(config.voting.max_retries, 3);
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/promptvault"

            [pagination]
            default_page_size = 10
            max_page_size = 20

            [voting]
            max_retries = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.pagination.max_page_size, 20);
        assert_eq!(config.voting.max_retries, 0);
    }

    #[test]
    fn test_database_url_required() {
        assert!(parse("[server]\nport = 9000\n").is_err());
    }
}
