//! Configuration module for environment variables and application settings
//!
//! The configuration is read once in `main` and handed to the server by value;
//! nothing in here is global.

use anyhow::{Context, Result, anyhow};
use std::env;

use crate::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Token signing and validation settings
    pub jwt: JwtConfig,

    /// The single identity allowed to obtain tokens
    pub identity: IdentityConfig,

    /// PostgreSQL settings; `None` runs the service on the in-memory store
    pub database: Option<DatabaseConfig>,

    /// Server configuration
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub key: String,
    pub issuer: String,
    pub audience: String,
    /// Reject tokens outside their `nbf`..`exp` window
    pub validate_lifetime: bool,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub id: i64,
    pub identifier: String,
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup("JWT_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("JWT_KEY environment variable is required"))?;

        let database = match lookup("DATABASE_URL") {
            Some(url) if !url.is_empty() => {
                let mut db = DatabaseConfig::from_url(&url)?;
                if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
                    db.max_size = max
                        .parse()
                        .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;
                }
                db.tls = parse_flag(&lookup, "DATABASE_TLS", false)?;
                Some(db)
            }
            _ => None,
        };

        Ok(Self {
            jwt: JwtConfig {
                key,
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "fabryka-server".to_string()),
                audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "fabryka-clients".to_string()),
                validate_lifetime: parse_flag(&lookup, "JWT_VALIDATE_LIFETIME", true)?,
            },

            identity: IdentityConfig {
                id: lookup("AUTH_IDENTITY_ID")
                    .map(|v| v.parse::<i64>())
                    .transpose()
                    .context("AUTH_IDENTITY_ID must be an integer")?
                    .unwrap_or(1),
                identifier: lookup("AUTH_IDENTIFIER")
                    .unwrap_or_else(|| "admin@fabryka.com".to_string()),
                secret: lookup("AUTH_SECRET").unwrap_or_else(|| "P@ssword".to_string()),
            },

            database,

            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("SERVER_PORT")
                    .or_else(|| lookup("PORT"))
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .context("SERVER_PORT must be a valid port number")?
                    .unwrap_or(3000),
            },
        })
    }
}

fn parse_flag<F>(lookup: &F, name: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(anyhow!("{} must be true or false, got {:?}", name, v)),
    }
}
