/// Configuration management for the API server
///
/// Loaded from environment variables (and a `.env` file when present).
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS and strict CORS (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for session tokens, at least 32 characters (required)
/// - `JWT_EXPIRATION_DAYS`: Session lifetime (default: 30)
/// - `FRONTEND_URL`: Base URL for links in mail (default: http://localhost:5173)
/// - `MAIL_FROM`: Sender address (default: TaskHub <no-reply@taskhub.local>)
/// - `MAIL_API_URL` / `MAIL_API_KEY`: Mail relay; mail is only logged when unset
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use taskhub_shared::{auth::jwt::DEFAULT_EXPIRATION_DAYS, services::accounts::AccountSettings};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Session lifetime in days
    pub expiration_days: i64,
}

/// Mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Frontend base URL used in confirmation and reset links
    pub frontend_url: String,

    /// Sender address
    pub from: String,

    /// HTTP relay endpoint; `None` selects the logging mailer
    pub api_url: Option<String>,

    /// HTTP relay bearer key
    pub api_key: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let api_port = or("API_PORT", "8080").parse::<u16>()?;

        let cors_origins = or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = matches!(
            or("PRODUCTION", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = or("DATABASE_MAX_CONNECTIONS", "10").parse::<u32>()?;

        let jwt_secret = var("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expiration_days =
            or("JWT_EXPIRATION_DAYS", &DEFAULT_EXPIRATION_DAYS.to_string()).parse::<i64>()?;

        if expiration_days <= 0 {
            anyhow::bail!("JWT_EXPIRATION_DAYS must be positive");
        }

        let api_url = var("MAIL_API_URL").filter(|v| !v.trim().is_empty());
        let api_key = var("MAIL_API_KEY").filter(|v| !v.trim().is_empty());

        if api_url.is_some() && api_key.is_none() {
            anyhow::bail!("MAIL_API_KEY is required when MAIL_API_URL is set");
        }

        Ok(Self {
            api: ApiConfig {
                host: or("API_HOST", "0.0.0.0"),
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_days,
            },
            mail: MailConfig {
                frontend_url: or("FRONTEND_URL", "http://localhost:5173"),
                from: or("MAIL_FROM", "TaskHub <no-reply@taskhub.local>"),
                api_url,
                api_key,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Settings for the account services
    pub fn account_settings(&self) -> AccountSettings {
        AccountSettings {
            frontend_url: self.mail.frontend_url.clone(),
            jwt_secret: self.jwt.secret.clone(),
            session_ttl: Duration::days(self.jwt.expiration_days),
        }
    }
}
