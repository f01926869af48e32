//! Origin-reflecting CORS middleware.
//!
//! Credentials are granted per origin, which `tower_http::cors` cannot express,
//! so the headers are written here directly.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Origins that are always granted credentials.
pub const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:3002",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3001",
    "http://127.0.0.1:3002",
    "https://math-solver2.vercel.app",
];

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str =
    "Origin, X-Requested-With, Content-Type, Accept, Authorization";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    permissive: bool,
    allowed: Vec<String>,
}

/// Header values chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsDecision {
    pub allow_origin: String,
    pub allow_credentials: bool,
}

impl CorsPolicy {
    /// A permissive policy reflects any origin with credentials.
    pub fn new<I: IntoIterator<Item = String>>(permissive: bool, extra_origins: I) -> Self {
        let mut allowed: Vec<String> = DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect();
        for origin in extra_origins {
            if !allowed.contains(&origin) {
                allowed.push(origin);
            }
        }
        Self { permissive, allowed }
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.iter().any(|o| o == origin)
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    pub fn decide(&self, origin: Option<&str>) -> CorsDecision {
        match origin {
            // Never pair a wildcard with credentials.
            None if self.permissive => CorsDecision {
                allow_origin: "*".into(),
                allow_credentials: false,
            },
            Some(o) if self.permissive || self.is_allowed(o) => CorsDecision {
                allow_origin: o.into(),
                allow_credentials: true,
            },
            Some(o) => CorsDecision {
                allow_origin: o.into(),
                allow_credentials: false,
            },
            None => CorsDecision {
                allow_origin: "null".into(),
                allow_credentials: false,
            },
        }
    }

    fn apply(&self, decision: &CorsDecision, headers: &mut HeaderMap) {
        if let Ok(v) = HeaderValue::from_str(&decision.allow_origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, v);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static(if decision.allow_credentials {
                "true"
            } else {
                "false"
            }),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
    }
}

/// Writes CORS headers on every response and answers preflight requests directly.
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let decision = policy.decide(origin.as_deref());
    debug!(
        origin = origin.as_deref().unwrap_or("-"),
        allow_origin = %decision.allow_origin,
        credentials = decision.allow_credentials,
        "cors decision"
    );

    let mut resp = if req.method() == Method::OPTIONS {
        debug!(origin = origin.as_deref().unwrap_or("-"), "preflight");
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };
    policy.apply(&decision, resp.headers_mut());
    resp
}
