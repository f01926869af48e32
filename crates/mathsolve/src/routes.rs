//! API routes.

use crate::api::{
    now_iso, ErrorResponse, HealthConfiguration, HealthResponse, HealthServer, HealthServices,
    SolveRequest, SolveResponse,
};
use crate::error::ApiError;
use crate::fallback::{EXAMPLES, OPERATIONS, OPERATION_EXAMPLES};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use gemini_prompt::ModelCaller;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

type AppStateArc<C> = Arc<AppState<C>>;

pub const ENDPOINTS: &[&str] = &["/solve", "/health", "/operations", "/examples", "/test"];

// ============================================================================
// Info Routes
// ============================================================================

pub fn info_routes<C: ModelCaller + 'static>() -> Router<AppStateArc<C>> {
    Router::new()
        .route("/", get(index))
        .route("/test", get(test_endpoint))
        .route("/operations", get(operations))
        .route("/examples", get(examples))
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": "Hybrid Math Solver API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-powered mathematical problem solver using Google Gemini",
        "endpoints": {
            "POST /solve": "Solve a mathematical problem",
            "GET /health": "Check server health and configuration",
            "GET /operations": "List supported mathematical operations",
            "GET /examples": "Get example problems and expected results",
            "GET /test": "Simple test endpoint for debugging"
        },
        "usage": {
            "solve": {
                "method": "POST",
                "url": "/solve",
                "body": { "problem": "Find the derivative of x^2 + 3x" },
                "response": "Structured solution with steps and explanation"
            }
        }
    }))
}

fn origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn test_endpoint(method: Method, headers: HeaderMap) -> Json<Value> {
    let origin = origin(&headers);
    debug!(origin = origin.as_deref().unwrap_or("-"), "test endpoint hit");
    Json(json!({
        "success": true,
        "message": "Server is working!",
        "timestamp": now_iso(),
        "origin": origin,
        "method": method.as_str(),
        "cors": "enabled"
    }))
}

async fn operations() -> Json<Value> {
    Json(json!({
        "availableOperations": OPERATIONS,
        "method": "gemini-ai-enhanced",
        "description": "Mathematical operations supported by the Gemini-powered solver",
        "examples": OPERATION_EXAMPLES
    }))
}

async fn examples() -> Json<Value> {
    Json(json!({
        "examples": EXAMPLES,
        "usage": "POST to /solve with { problem: 'your math problem here' }"
    }))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes<C: ModelCaller + 'static>() -> Router<AppStateArc<C>> {
    Router::new().route("/health", get(health::<C>))
}

async fn health<C: ModelCaller + 'static>(
    State(state): State<AppStateArc<C>>,
) -> (StatusCode, Json<HealthResponse>) {
    let available = state.solver.is_available();
    let config = &state.config;
    info!(ai_available = available, "health check");

    let mut body = HealthResponse {
        status: if available { "healthy" } else { "unhealthy" }.into(),
        timestamp: now_iso(),
        uptime: state.start_time.elapsed().as_secs_f64(),
        services: HealthServices {
            gemini: if available { "configured" } else { "missing_api_key" }.into(),
            gemini_model: config.gemini_model.clone(),
            cors: "enabled".into(),
            method: "gemini-ai-only".into(),
        },
        configuration: HealthConfiguration {
            port: config.port,
            environment: config.environment_name().to_string(),
            cors_allow_all: config.cors_allow_all,
            allowed_origins: config.cors_policy().allowed_origins().to_vec(),
            frontend_url: config
                .frontend_url
                .clone()
                .unwrap_or_else(|| "not_set".into()),
        },
        server: HealthServer {
            version: env!("CARGO_PKG_VERSION").into(),
            platform: std::env::consts::OS.into(),
            arch: std::env::consts::ARCH.into(),
        },
        error: None,
        message: None,
    };

    if !available {
        body.error = Some("AI service unavailable".into());
        body.message = Some(
            "Gemini API is not configured. The math solver requires AI to function.".into(),
        );
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body));
    }
    (StatusCode::OK, Json(body))
}

// ============================================================================
// Solve Routes
// ============================================================================

pub fn solve_routes<C: ModelCaller + 'static>() -> Router<AppStateArc<C>> {
    Router::new().route("/solve", post(solve::<C>))
}

async fn solve<C: ModelCaller + 'static>(
    State(state): State<AppStateArc<C>>,
    body: Result<Json<SolveRequest>, JsonRejection>,
) -> Result<Json<SolveResponse>, ApiError> {
    if !state.solver.is_available() {
        return Err(ApiError::not_configured());
    }

    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection, "rejected solve body");
            return Err(ApiError::bad_problem());
        }
    };
    let problem = req.problem_text().ok_or_else(ApiError::bad_problem)?;

    let resp = state.solver.solve(problem).await?;
    Ok(Json(resp))
}

// ============================================================================
// Fallback
// ============================================================================

pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    let mut body = ErrorResponse::new("Endpoint not found");
    body.available_endpoints = Some(ENDPOINTS.iter().map(|s| s.to_string()).collect());
    body.requested_path = Some(
        uri.path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
