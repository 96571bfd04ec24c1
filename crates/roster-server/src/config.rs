//! Configuration loading
//!
//! Sources are layered, later ones winning: built-in defaults, the optional
//! TOML file, then `ROSTER__<SECTION>__<KEY>` environment variables. CLI
//! flags are applied on top by `main`.

use anyhow::{Context, Result};
use roster_auth::DEFAULT_HASH_COST;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Admin account ensured at startup
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
    /// File the configuration was read from, if it existed
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// File backing a `sqlite:` URL, if it names one
    pub fn sqlite_file(&self) -> Option<&Path> {
        let rest = self.url.strip_prefix("sqlite://").or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(Path::new(path))
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; must be supplied, usually via `TOKEN_SIGN_SECRET`
    #[serde(default)]
    pub jwt_secret: String,
    /// Argon2 time cost used for new password hashes
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            hash_cost: default_hash_cost(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Admin account created at startup when missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_db_url() -> String {
    "sqlite:./data/roster.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_hash_cost() -> u32 {
    DEFAULT_HASH_COST
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from an optional TOML file and the environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix("ROSTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        let mut config: Config = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse configuration from {}", path))?;
        config.source = Some(PathBuf::from(path)).filter(|p| p.exists());

        Ok(config)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            anyhow::bail!(
                "auth.jwt_secret is empty; set TOKEN_SIGN_SECRET or ROSTER__AUTH__JWT_SECRET"
            );
        }
        if self.auth.hash_cost == 0 {
            anyhow::bail!("auth.hash_cost must be at least 1");
        }
        if let Some(admin) = &self.bootstrap_admin
            && (admin.email.is_empty() || admin.password.is_empty())
        {
            anyhow::bail!("bootstrap_admin requires both email and password");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/roster.toml").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.hash_cost, DEFAULT_HASH_COST);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.bootstrap_admin.is_none());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 8080

            [auth]
            jwt_secret = "from-file"
            hash_cost = 3

            [bootstrap_admin]
            email = "admin@example.com"
            password = "Admin123!"
            "#,
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.source.as_deref(), Some(file.path()));
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "from-file");
        assert_eq!(config.auth.hash_cost, 3);
        assert_eq!(
            config.bootstrap_admin.as_ref().map(|a| a.email.as_str()),
            Some("admin@example.com")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sqlite_file() {
        let mut db = DatabaseConfig::default();
        assert_eq!(db.sqlite_file(), Some(Path::new("./data/roster.db")));

        db.url = "sqlite::memory:".to_string();
        assert_eq!(db.sqlite_file(), None);

        db.url = "sqlite:///var/lib/roster.db".to_string();
        assert_eq!(db.sqlite_file(), Some(Path::new("/var/lib/roster.db")));
    }
}
