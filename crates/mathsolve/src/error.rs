use crate::api::{ErrorResponse, Troubleshooting, SUPPORTED_OPERATIONS};
use crate::solver::SolveError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// An error rendered to the client as a status code and a JSON [ErrorResponse].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, error: S) -> Self {
        Self {
            status,
            body: ErrorResponse::new(error),
        }
    }

    pub fn bad_problem() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Problem statement is required and must be a non-empty string",
        )
    }

    pub fn not_configured() -> Self {
        let mut err = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Gemini AI not properly initialized",
        );
        err.body.details =
            Some("GEMINI_API_KEY environment variable may be missing or invalid".into());
        err.body.troubleshooting = Some(Troubleshooting {
            check_api_key: "Ensure GEMINI_API_KEY is set in environment variables".into(),
            check_problem: None,
            supported_operations: supported_operations(),
        });
        err
    }

    pub fn solve_failed(details: String) -> Self {
        let mut err = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to solve math problem",
        );
        err.body.details = Some(details);
        err.body.troubleshooting = Some(Troubleshooting {
            check_api_key: "Ensure GEMINI_API_KEY is properly configured".into(),
            check_problem: Some("Verify the math problem is clearly stated".into()),
            supported_operations: supported_operations(),
        });
        err
    }
}

fn supported_operations() -> Vec<String> {
    SUPPORTED_OPERATIONS.iter().map(|s| s.to_string()).collect()
}

impl From<SolveError> for ApiError {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::NotConfigured => ApiError::not_configured(),
            SolveError::Failed { details } => ApiError::solve_failed(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
