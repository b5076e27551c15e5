//! Service configuration
//!
//! Loaded once at start-up from environment variables and handed to the
//! services that need it; nothing reads the environment after that.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{jwt::JwtConfig, password::PasswordConfig};

/// Top-level configuration for the API service
///
/// # Environment Variables
/// - `PORT`: listening port (default: 3000)
/// - `SECRET_KEY`: secret used to sign session tokens (required)
/// - `TOKEN_EXPIRY`: token lifetime in seconds (default: 3600)
/// - `HASH_MEMORY_KIB`: Argon2 memory cost in KiB (default: 19456)
/// - `HASH_ITERATIONS`: Argon2 iteration count (default: 2)
/// - `HASH_PARALLELISM`: Argon2 lane count (default: 1)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    pub secret_key: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry: u64,
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

fn default_port() -> u16 {
    3000
}

fn default_token_expiry() -> u64 {
    3600
}

fn default_hash_memory_kib() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Invalid service configuration (is SECRET_KEY set?)")?;

        if config.secret_key.is_empty() {
            anyhow::bail!("SECRET_KEY must not be empty");
        }

        Ok(config)
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.secret_key.clone(),
            token_expiry: self.token_expiry,
        }
    }

    pub fn password_config(&self) -> PasswordConfig {
        PasswordConfig {
            memory_kib: self.hash_memory_kib,
            iterations: self.hash_iterations,
            parallelism: self.hash_parallelism,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "PORT",
        "SECRET_KEY",
        "TOKEN_EXPIRY",
        "HASH_MEMORY_KIB",
        "HASH_ITERATIONS",
        "HASH_PARALLELISM",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("SECRET_KEY", "test-secret");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.secret_key, "test-secret");
        assert_eq!(config.token_expiry, 3600);
        assert_eq!(config.hash_memory_kib, 19456);
        assert_eq!(config.hash_iterations, 2);
        assert_eq!(config.hash_parallelism, 1);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_app_config_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("SECRET_KEY", "another-secret");
            std::env::set_var("PORT", "8080");
            std::env::set_var("TOKEN_EXPIRY", "60");
            std::env::set_var("HASH_ITERATIONS", "3");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_expiry, 60);
        assert_eq!(config.hash_iterations, 3);

        let jwt = config.jwt_config();
        assert_eq!(jwt.secret, "another-secret");
        assert_eq!(jwt.token_expiry, 60);
        assert_eq!(config.password_config().iterations, 3);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_app_config_requires_secret_key() {
        clear_env();

        assert!(AppConfig::from_env().is_err());
    }
}
