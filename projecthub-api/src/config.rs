/// Configuration management for the API server
///
/// Configuration comes from environment variables (with `.env` support for
/// development); each section loads itself, so the error messages name the
/// variable that is missing.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST` / `API_PORT`: bind address (default: 0.0.0.0:8080)
/// - `JWT_SECRET`: HS256 signing key (required, min 32 chars)
/// - `CORS_ORIGINS`: comma-separated allowed origins (default: *)
/// - `RUST_LOG`: log filter (default: info)

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; "*" selects the permissive development policy
    pub cors_origins: Vec<String>,
}

/// Database section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key; generate with `openssl rand -hex 32`
    pub secret: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ApiConfig {
    fn from_env() -> anyhow::Result<Self> {
        let cors_origins = env_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: env_or("API_HOST", "0.0.0.0"),
            port: env_or("API_PORT", "8080").parse()?,
            cors_origins,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> anyhow::Result<Self> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10").parse()?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> anyhow::Result<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Self { secret })
    }
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or malformed variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use projecthub_api::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_env()?;
    /// println!("listening on {}", config.bind_address());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> anyhow::Result<Self> {
        // Pick up a .env file when present (development)
        dotenvy::dotenv().ok();

        Ok(Self {
            api: ApiConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_joins_host_and_port() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/projecthub".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "0123456789abcdef0123456789abcdef".to_string(),
            },
        };

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("PROJECTHUB_UNSET_VARIABLE", "fallback"), "fallback");
    }
}
