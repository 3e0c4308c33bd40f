use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub redis: RedisConfig,

    pub ai: AiConfig,

    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// SQLite connection string, e.g. `sqlite:data/arcanum.db` or
    /// `sqlite::memory:` for throwaway instances.
    pub database_url: String,

    pub max_db_connections: u32,

    pub min_db_connections: u32,

    pub log_level: String,

    /// Instance component of generated artifact ids (10 bits).
    pub instance_id: u64,

    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/arcanum.db".to_string(),
            max_db_connections: 5,
            min_db_connections: 1,
            log_level: "info".to_string(),
            instance_id: 1,
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HS256 signing secret. Override via `ARCANUM_JWT_SECRET`; the
    /// baked-in default is only suitable for local development.
    pub jwt_secret: String,

    /// Token lifetime, which is also the whitelist entry TTL.
    pub token_ttl_seconds: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "arcanum_dev_secret_change_me".to_string(),
            token_ttl_seconds: 2 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis connection URL for the token whitelist. When unset, an
    /// in-process cache is used instead (single-instance deployments).
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Chat-completions endpoint (OpenAI-compatible).
    pub endpoint: String,

    /// Override via `ARCANUM_AI_API_KEY`.
    pub api_key: String,

    pub model: String,

    pub request_timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Blob storage upload endpoint; the container name is appended.
    pub endpoint: String,

    pub default_container: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:10000/uploads".to_string(),
            default_container: "artifact-images".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Secrets may live in a .env file next to the binary.
        dotenvy::dotenv().ok();

        let path = Self::config_path();
        let mut config = if path.exists() {
            info!("Loading config from: {}", path.display());
            Self::load_from_path(&path)?
        } else {
            info!("No config file found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_path() -> PathBuf {
        std::env::var("ARCANUM_CONFIG")
            .map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("ARCANUM_JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Ok(api_key) = std::env::var("ARCANUM_AI_API_KEY") {
            self.ai.api_key = api_key;
        }
        if let Ok(url) = std::env::var("ARCANUM_REDIS_URL") {
            self.redis.url = Some(url);
        }
        if let Ok(url) = std::env::var("ARCANUM_DATABASE_URL") {
            self.general.database_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.jwt_secret.is_empty() {
            anyhow::bail!("security.jwt_secret must not be empty");
        }
        if self.security.token_ttl_seconds == 0 {
            anyhow::bail!("security.token_ttl_seconds must be positive");
        }
        if self.general.max_db_connections < self.general.min_db_connections {
            anyhow::bail!("general.max_db_connections must be >= min_db_connections");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [security]
            token_ttl_seconds = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.security.token_ttl_seconds, 600);
        assert_eq!(config.general.max_db_connections, 5);
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let mut config = Config::default();
        config.security.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }
}
