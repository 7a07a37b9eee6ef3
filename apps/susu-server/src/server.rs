use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use susu::SusuModule;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::shutdown;

/// Module routes plus the operational endpoints, wrapped in tracing and a
/// per-request timeout.
pub fn build_router(module: &SusuModule, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/openapi.json", get(|| async { Json(SusuModule::openapi()) }));

    module
        .register_rest(router)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                )
            }),
        )
}

/// Connect, migrate, then serve until a shutdown signal arrives.
///
/// # Errors
/// Fails on connection, migration, bind or serve errors.
pub async fn run(config: AppConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let db = susu_db::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    let applied = SusuModule::migrate(&db).await?;
    tracing::info!(
        applied = applied.applied,
        skipped = applied.skipped,
        "migrations complete"
    );

    let module = SusuModule::new(db, config.susu)?;
    let router = build_router(&module, config.server.request_timeout);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "susu server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handler failed; shutting down");
            }
        })
        .await
        .context("server error")?;

    tracing::info!("susu server stopped");
    Ok(())
}
