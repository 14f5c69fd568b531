use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use intelligence_service::config::{Config, EngineThresholds};
use intelligence_service::handlers::{self, AppState};
use intelligence_service::services::IntelligenceEngine;
use intelligence_service::stores::{PgEventStore, PgIdentityStore, PgOrderStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,intelligence_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting intelligence-service");

    let config = Config::from_env().context("Failed to load configuration")?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Database pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations completed successfully");

    let engine = IntelligenceEngine::new(
        Arc::new(PgEventStore::new(db_pool.clone())),
        Arc::new(PgOrderStore::new(db_pool.clone())),
        Arc::new(PgIdentityStore::new(db_pool)),
        EngineThresholds::default(),
    );
    let state = web::Data::new(AppState { engine });

    let port = config.service.http_port;
    tracing::info!("HTTP server listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server failed")
}
