//! Quill blogging platform REST API.
//!
//! Users register and authenticate with bearer tokens, publish articles,
//! tag them, comment, like/dislike comments, like and favourite articles
//! and follow other authors. Every response, success or failure, uses the
//! `{code, statusCode, message, data}` envelope from [`response`].
//!
//! Persistence goes through the [`repository::Store`] trait, which has a
//! PostgreSQL implementation for production and an in-memory one that backs
//! the integration tests and local development.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod response;
pub mod security;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::repository::{MemoryStore, PgStore, Store};
use crate::services::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub email: EmailService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config, email: EmailService) -> Self {
        Self {
            store,
            config,
            email,
        }
    }

    /// Connects the configured storage backend and mailer.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.storage.backend {
            StorageBackend::Postgres => {
                let pg = PgStore::connect(&config.database).await?;
                pg.run_migrations().await?;
                Arc::new(pg)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let email = EmailService::new(&config.email)?;

        Ok(Self::new(store, config, email))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api::routes())
        .fallback(unknown_route)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum_middleware::map_response(envelope_method_not_allowed)),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn unknown_route() -> AppError {
    AppError::NotFound("Route".to_string())
}

/// The router answers a known path with an unsupported method by itself,
/// with an empty body. Re-render it in the envelope, keeping `Allow`.
async fn envelope_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut enveloped = AppError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        enveloped.headers_mut().insert(header::ALLOW, allow);
    }
    enveloped
}
