//! # Server Module
//!
//! HTTP server setup and route configuration.

use anyhow::{Context, Result};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{
    identity::StaticIdentityStore,
    jwt::{TokenIssuer, TokenValidator, ValidationPolicy},
    middleware::AuthMiddleware,
    revocation::{MemoryRevocationList, RevocationList},
};
use crate::config::Config;
use crate::database::{
    DatabaseConnection, HalaStore, MemoryHalaStore, PgHalaStore, migrations::run_migrations,
};
use crate::routes::{auth, hala, health::ping, weather};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub revocations: Arc<dyn RevocationList>,
    pub store: Arc<dyn HalaStore>,
}

impl AppState {
    /// Wire the token issuer, validator and denylist from configuration.
    pub fn new(config: &Config, store: Arc<dyn HalaStore>) -> Self {
        let identities = Arc::new(StaticIdentityStore::from(&config.identity));
        let policy = ValidationPolicy::from(&config.jwt);
        // Expired entries may only be forgotten if expired tokens are refused
        let revocations: Arc<dyn RevocationList> = Arc::new(
            MemoryRevocationList::with_expiry_purge(policy.validate_lifetime),
        );

        if !policy.validate_lifetime {
            tracing::warn!("Token lifetime validation is disabled; expired tokens will be accepted");
        }

        Self {
            issuer: Arc::new(TokenIssuer::new(&config.jwt, identities)),
            validator: Arc::new(TokenValidator::new(&policy).with_revocations(revocations.clone())),
            revocations,
            store,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    // Everything here requires a valid bearer token
    let protected_routes = Router::new()
        .route("/hala", get(hala::list_hale).post(hala::create_hala))
        .route(
            "/hala/{id}",
            get(hala::get_hala)
                .put(hala::update_hala)
                .delete(hala::delete_hala),
        )
        .route("/security/revokeToken", post(auth::revoke_token))
        .route_layer(middleware::from_fn_with_state(
            state.validator.clone(),
            AuthMiddleware::validate_token,
        ));

    Router::new()
        .route("/ping", get(ping))
        .route("/weatherforecast", get(weather::get_weather_forecast))
        .route("/security/getToken", post(auth::get_token))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([
                        axum::http::Method::GET,
                        axum::http::Method::POST,
                        axum::http::Method::PUT,
                        axum::http::Method::DELETE,
                        axum::http::Method::OPTIONS,
                    ])
                    .allow_headers([
                        axum::http::header::ORIGIN,
                        axum::http::header::CONTENT_TYPE,
                        axum::http::header::ACCEPT,
                        axum::http::header::AUTHORIZATION,
                    ]),
            ),
        )
        .with_state(state)
}

/// Connect the configured store, falling back to memory without a database.
async fn open_store(config: &Config) -> Result<Arc<dyn HalaStore>> {
    match &config.database {
        Some(db_config) => {
            let db = DatabaseConnection::new(db_config.clone())
                .await
                .context("Failed to connect to database")?;
            run_migrations(db.pool()).await?;
            Ok(Arc::new(PgHalaStore::new(db)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            Ok(Arc::new(MemoryHalaStore::default()))
        }
    }
}

/// Starts the HTTP server and serves until the process is stopped.
pub async fn start(config: Config) -> Result<()> {
    let store = open_store(&config).await?;
    let app = router(AppState::new(&config, store));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("Fabryka server listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/ping", addr);
    tracing::info!("Tokens issued at http://{}/security/getToken", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
