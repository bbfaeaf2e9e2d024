//! # Fabryka Server
//!
//! HTTP API for managing factory halls, built with Axum and Tokio and
//! guarded by HS256 bearer tokens.
//!
//! ## Architecture
//! - `server`: router and application state
//! - `config`: environment variable configuration
//! - `auth`: token issuance, validation, revocation and middleware
//! - `database`: PostgreSQL pool, migrations and the hall record store
//! - `routes`: HTTP handlers
//!
//! ## Environment Setup
//! Copy `.env.example` to `.env` and set at least `JWT_KEY`:
//! ```bash
//! cp .env.example .env
//! ```
//!
//! ## Running the Server
//! ```bash
//! cargo run
//! ```
//!
//! Obtain a token and call a protected endpoint:
//! ```bash
//! TOKEN=$(curl -s -X POST localhost:3000/security/getToken \
//!   -H 'content-type: application/json' \
//!   -d '{"userName":"admin@fabryka.com","password":"P@ssword"}' | tr -d '"')
//! curl -H "Authorization: Bearer $TOKEN" localhost:3000/hala
//! ```

mod auth;
mod config;
mod database;
mod routes;
mod server;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the real environment still applies
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!("Build profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });

    let config = config::Config::from_env()?;
    server::start(config).await
}
