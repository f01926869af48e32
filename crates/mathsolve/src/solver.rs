//! The solve flow: structured call, explanation call, and the plain fallback call.

use crate::api::{now_iso, Analysis, Calculation, SolveResponse, Steps};
use crate::extract::Solution;
use crate::prompts;
use gemini_prompt::{CallErr, ModelCaller};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const METHOD_ENHANCED: &str = "gemini-ai-enhanced";
pub const METHOD_FALLBACK: &str = "gemini-fallback";

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("Gemini AI not properly initialized")]
    NotConfigured,
    /// Both the structured attempt and the fallback failed. Carries the first error.
    #[error("failed to solve math problem: {details}")]
    Failed { details: String },
}

/// Solves problems with an optional model caller; without one every solve fails
/// with [SolveError::NotConfigured].
pub struct Solver<C: ModelCaller> {
    caller: Option<C>,
}

impl<C: ModelCaller> Solver<C> {
    pub fn new(caller: Option<C>) -> Self {
        Self { caller }
    }

    pub fn is_available(&self) -> bool {
        self.caller.is_some()
    }

    pub fn model_name(&self) -> Option<String> {
        self.caller
            .as_ref()
            .map(|c| c.get_model().model_str().to_string())
    }

    pub async fn solve(&self, problem: &str) -> Result<SolveResponse, SolveError> {
        let caller = self.caller.as_ref().ok_or(SolveError::NotConfigured)?;
        let started = Instant::now();
        debug!(problem, "solving problem");

        let err = match structured(caller, problem).await {
            Ok((solution, explanation)) => {
                info!(
                    operation = %solution.operation,
                    result = %solution.result,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "solved problem"
                );
                return Ok(enhanced_response(
                    problem,
                    solution,
                    explanation,
                    started.elapsed().as_millis() as u64,
                ));
            }
            Err(err) => err,
        };

        error!(error = %err, "structured solve failed");
        warn!("attempting fallback solution");
        match caller.simple_call(prompts::fallback_prompt(problem)).await {
            Ok(text) => Ok(fallback_response(problem, text)),
            Err(fallback_err) => {
                error!(error = %fallback_err, "fallback also failed");
                Err(SolveError::Failed {
                    details: err.to_string(),
                })
            }
        }
    }
}

async fn structured<C: ModelCaller>(
    caller: &C,
    problem: &str,
) -> Result<(Solution, String), CallErr> {
    let raw = caller.simple_call(prompts::solve_prompt(problem)).await?;
    debug!(response = %raw, "raw model response");

    let solution = Solution::from_response(&raw, problem);
    info!(
        operation = %solution.operation,
        expression = %solution.expression,
        result = %solution.result,
        structured = solution.is_structured(),
        "parsed model response"
    );
    if solution.suspicious_result() {
        warn!(result = %solution.result, "derivative result is a bare number, it might be incorrect");
    }

    let explanation = caller
        .simple_call(prompts::explanation_prompt(problem, &solution))
        .await?;
    Ok((solution, explanation))
}

fn enhanced_response(
    problem: &str,
    solution: Solution,
    explanation: String,
    elapsed_ms: u64,
) -> SolveResponse {
    SolveResponse {
        success: true,
        original_problem: problem.to_string(),
        analysis: Analysis {
            context: format!("Solving {} problem using AI analysis", solution.operation),
            operation: solution.operation.clone(),
            expression: solution.expression,
        },
        calculation: Calculation {
            method: METHOD_ENHANCED.into(),
            result: solution.result,
            operation: solution.operation,
            steps: Steps::Text(solution.steps),
            confidence: Some("high".into()),
        },
        explanation,
        timestamp: Some(now_iso()),
        processing_time: Some(elapsed_ms),
        note: None,
    }
}

fn fallback_response(problem: &str, text: String) -> SolveResponse {
    SolveResponse {
        success: true,
        original_problem: problem.to_string(),
        analysis: Analysis {
            operation: "general_solution".into(),
            expression: problem.to_string(),
            context: "Fallback solution method used".into(),
        },
        calculation: Calculation {
            method: METHOD_FALLBACK.into(),
            result: text,
            operation: "solve".into(),
            steps: Steps::Text("Solution provided directly by AI".into()),
            confidence: None,
        },
        explanation: "Used simplified solution method due to parsing complexity.".into(),
        timestamp: Some(now_iso()),
        processing_time: None,
        note: Some("Fallback method used - solution may be less structured".into()),
    }
}
