//! HTTP server for the solver API.

use crate::config::Config;
use crate::cors::cors_middleware;
use crate::routes;
use crate::solver::Solver;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use gemini_prompt::{Gemini, ModelCaller, ModelRef};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Maximum request body: 10 MiB
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
pub struct AppState<C: ModelCaller> {
    pub solver: Solver<C>,
    pub config: Config,
    pub start_time: Instant,
}

impl<C: ModelCaller> AppState<C> {
    pub fn new(config: Config, caller: Option<C>) -> Self {
        Self {
            solver: Solver::new(caller),
            config,
            start_time: Instant::now(),
        }
    }
}

/// Builds the Gemini caller described by the config, or `None` without an API key.
pub fn build_caller(config: &Config) -> Result<Option<Gemini>> {
    let Some(key) = &config.gemini_api_key else {
        return Ok(None);
    };
    let caller = Gemini::new(ModelRef::from(config.gemini_model.as_str()), key.clone())
        .with_api_base(config.gemini_api_base.as_str())
        .with_timeout(config.request_timeout)
        .context("failed to build Gemini HTTP client")?;
    Ok(Some(caller))
}

/// Assembles the router with CORS, body limit and request tracing.
pub fn router<C: ModelCaller + 'static>(state: AppState<C>) -> Router {
    let cors = Arc::new(state.config.cors_policy());

    Router::new()
        .merge(routes::info_routes())
        .merge(routes::health_routes())
        .merge(routes::solve_routes())
        .fallback(routes::not_found)
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let caller = build_caller(&config)?;
    match &caller {
        Some(c) => info!(model = %c.model, "Gemini model initialized"),
        None => error!("GEMINI_API_KEY environment variable is not set, /solve will fail"),
    }

    let addr = config.bind_addr();
    info!(
        addr = %addr,
        environment = config.environment_name(),
        model = %config.gemini_model,
        api_key = if config.ai_configured() { "configured" } else { "missing" },
        allowed_origins = config.allowed_origins.len(),
        cors_allow_all = config.cors_allow_all,
        frontend_url = config.frontend_url.as_deref().unwrap_or("not set"),
        "starting math solver API"
    );

    let app = router(AppState::new(config, caller));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received, shutting down gracefully");
}
