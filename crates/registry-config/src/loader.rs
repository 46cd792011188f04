//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "registry.toml",
    "./config/config.toml",
    "./config/registry.toml",
    "/etc/registry/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file()? {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        self.apply_env_overrides(&mut config);

        config.validate()?;
        Ok(config)
    }

    /// An explicitly named file (constructor path or `REGISTRY_CONFIG`) must
    /// exist; only the standard locations are optional.
    fn find_config_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| env::var("REGISTRY_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            return if path.exists() {
                Ok(Some(path))
            } else {
                Err(ConfigError::NotFound(path))
            };
        }

        Ok(CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists()))
    }

    fn apply_env_overrides(&self, config: &mut AppConfig) {
        // MongoDB
        if let Ok(val) = env::var("REGISTRY_MONGODB_URI") {
            config.mongodb.uri = val;
        }
        if let Ok(val) = env::var("REGISTRY_MONGODB_DATABASE") {
            config.mongodb.database = val;
        }

        // AMQP
        if let Ok(val) = env::var("REGISTRY_AMQP_URI") {
            config.amqp.uri = val;
        }
        if let Ok(val) = env::var("REGISTRY_AMQP_QUEUE_PREFIX") {
            config.amqp.queue_prefix = val;
        }
        if let Ok(val) = env::var("REGISTRY_AMQP_NOTIFICATION_EXCHANGE") {
            config.amqp.notification_exchange = val;
        }
        if let Ok(val) = env::var("REGISTRY_AMQP_PREFETCH") {
            if let Ok(prefetch) = val.parse() {
                config.amqp.prefetch_count = prefetch;
            }
        }

        // Token authority
        if let Ok(val) = env::var("REGISTRY_TOKEN_AUTHORITY_ENABLED") {
            config.auth.token_authority.enabled = val.parse().unwrap_or(true);
        }
        if let Ok(val) = env::var("REGISTRY_TOKEN_AUTHORITY_ALGORITHM") {
            config.auth.token_authority.algorithm = val;
        }
        if let Ok(val) = env::var("REGISTRY_TOKEN_AUTHORITY_SECRET") {
            config.auth.token_authority.secret = val;
        }
        if let Ok(val) = env::var("REGISTRY_TOKEN_AUTHORITY_PUBLIC_KEY_PATH") {
            config.auth.token_authority.public_key_path = val;
        }
        if let Ok(val) = env::var("REGISTRY_TOKEN_AUTHORITY_ISSUER") {
            config.auth.token_authority.issuer = val;
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[mongodb]
database = "from_file"

[auth.token_authority]
secret = "file-secret"
"#
        )
        .unwrap();

        let config = ConfigLoader::with_path(file.path()).load().unwrap();
        assert_eq!(config.mongodb.database, "from_file");
        assert_eq!(config.auth.token_authority.secret, "file-secret");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mongodb\ndatabase = ").unwrap();

        let result = ConfigLoader::with_path(file.path()).load();
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let result = ConfigLoader::with_path(&missing).load();
        match result {
            Err(ConfigError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }
}
