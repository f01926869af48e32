//! Client for a running solver server.

use crate::api::{ErrorResponse, SolveRequest, SolveResponse};
use crate::fallback::demo_solution;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("please enter a math problem")]
    EmptyProblem,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// The server answered 2xx but flagged the solve as unsuccessful.
    #[error("{0}")]
    Rejected(String),
}

/// HTTP client for the `/health` and `/solve` endpoints.
pub struct SolverClient {
    base_url: String,
    http: reqwest::Client,
}

impl SolverClient {
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mathsolve/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when `/health` answers with a success status.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                debug!(error = %err, "health check failed");
                false
            }
        }
    }

    /// POST /solve. The problem is sent exactly as given.
    pub async fn solve(&self, problem: &str) -> Result<SolveResponse, ClientError> {
        if problem.trim().is_empty() {
            return Err(ClientError::EmptyProblem);
        }
        let url = format!("{}/solve", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&SolveRequest::new(problem))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        if body.get("success").and_then(|v| v.as_bool()) == Some(false) {
            let message = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Failed to solve problem")
                .to_string();
            return Err(ClientError::Rejected(message));
        }
        serde_json::from_value(body).map_err(|e| ClientError::Rejected(e.to_string()))
    }

    /// Like [SolverClient::solve], but answers with the demo solution when the
    /// server cannot produce one. The flag is true when the demo was used.
    pub async fn solve_or_demo(&self, problem: &str) -> Result<(SolveResponse, bool), ClientError> {
        match self.solve(problem).await {
            Ok(resp) => Ok((resp, false)),
            Err(ClientError::EmptyProblem) => Err(ClientError::EmptyProblem),
            Err(err) => {
                warn!(error = %err, server = %self.base_url, "server request failed, using demo solution");
                Ok((demo_solution(problem), true))
            }
        }
    }
}
