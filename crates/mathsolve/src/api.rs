//! JSON bodies exchanged with clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current UTC time in the `2024-01-01T00:00:00.000Z` form.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub const SUPPORTED_OPERATIONS: &[&str] = &[
    "derivatives",
    "integrals",
    "factoring",
    "simplification",
    "solving equations",
];

/// Body of `POST /solve`. `problem` stays untyped so a non-string can be
/// rejected with the same message as a missing one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SolveRequest {
    #[serde(default)]
    pub problem: Option<Value>,
}

impl SolveRequest {
    pub fn new<S: Into<String>>(problem: S) -> Self {
        Self {
            problem: Some(Value::String(problem.into())),
        }
    }

    /// The problem text, if it is a non-blank string.
    pub fn problem_text(&self) -> Option<&str> {
        match &self.problem {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub success: bool,
    pub original_problem: String,
    pub analysis: Analysis,
    pub calculation: Calculation,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Milliseconds spent on the model calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub operation: String,
    pub expression: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    #[serde(default)]
    pub method: String,
    pub result: String,
    pub operation: String,
    pub steps: Steps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

/// Steps arrive either as one newline-separated string or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Steps {
    Text(String),
    List(Vec<String>),
}

impl Steps {
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Steps::Text(s) => crate::steps::split_steps(s),
            Steps::List(items) => items
                .iter()
                .flat_map(|s| crate::steps::split_steps(s))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troubleshooting: Option<Troubleshooting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_path: Option<String>,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            error: error.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Troubleshooting {
    pub check_api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_problem: Option<String>,
    pub supported_operations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub services: HealthServices,
    pub configuration: HealthConfiguration,
    pub server: HealthServer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthServices {
    pub gemini: String,
    pub gemini_model: String,
    pub cors: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthConfiguration {
    pub port: u16,
    pub environment: String,
    pub cors_allow_all: bool,
    pub allowed_origins: Vec<String>,
    pub frontend_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthServer {
    pub version: String,
    pub platform: String,
    pub arch: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn problem_text_requires_non_blank_string() {
        let req: SolveRequest = serde_json::from_value(json!({"problem": "Factor x^2 - 4"})).unwrap();
        assert_eq!(req.problem_text(), Some("Factor x^2 - 4"));

        for body in [json!({}), json!({"problem": 42}), json!({"problem": "   "})] {
            let req: SolveRequest = serde_json::from_value(body).unwrap();
            assert_eq!(req.problem_text(), None);
        }
    }

    #[test]
    fn steps_accept_both_shapes() {
        let c: Calculation = serde_json::from_value(json!({
            "result": "x = 4",
            "operation": "solve",
            "steps": ["Simplify: 3x = 12", "Divide both sides by 3: x = 4"]
        }))
        .unwrap();
        assert_eq!(c.steps.to_list().len(), 2);
        assert_eq!(c.method, "");

        let c: Calculation = serde_json::from_value(json!({
            "method": "gemini-ai-enhanced",
            "result": "x = 4",
            "operation": "solve",
            "steps": "1. Simplify: 3x = 12\n\n2. Divide: x = 4"
        }))
        .unwrap();
        assert_eq!(
            c.steps.to_list(),
            vec!["Simplify: 3x = 12".to_string(), "Divide: x = 4".to_string()]
        );
    }

    #[test]
    fn error_response_omits_empty_fields() {
        let v = serde_json::to_value(ErrorResponse::new("Endpoint not found")).unwrap();
        assert_eq!(v, json!({"success": false, "error": "Endpoint not found"}));
    }
}
