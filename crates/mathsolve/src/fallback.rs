//! Canned content: the offline demo answer and the static catalogues.

use crate::api::{Analysis, Calculation, SolveResponse, Steps};
use serde::Serialize;

/// Operations the model is prompted to recognise.
pub const OPERATIONS: &[&str] = &[
    "derivative",
    "integral",
    "simplify",
    "factor",
    "solve",
    "find_zeros",
    "expand",
    "evaluate",
];

/// Example problems offered to users.
pub const SAMPLE_PROBLEMS: &[&str] = &[
    "Find the derivative of x^2 + 3x + 2",
    "Integrate 2x + 3 dx",
    "Factor x^2 + 5x + 6",
    "Simplify (x + 1)^2",
    "Find zeros of x^2 - 4",
];

pub const OPERATION_EXAMPLES: &[&str] = &[
    "Find the derivative of x^2 + 3x + 2",
    "Integrate 2x + 3",
    "Factor x^2 + 5x + 6",
    "Simplify (x + 1)^2",
    "Solve x^2 - 4 = 0",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub problem: &'static str,
    pub expected_operation: &'static str,
    pub expected_result: &'static str,
    pub difficulty: &'static str,
}

pub const EXAMPLES: &[Example] = &[
    Example {
        problem: "Find the derivative of x^2 + 3x + 2",
        expected_operation: "derivative",
        expected_result: "2x + 3",
        difficulty: "basic",
    },
    Example {
        problem: "Integrate 2x + 3 dx",
        expected_operation: "integral",
        expected_result: "x^2 + 3x + C",
        difficulty: "basic",
    },
    Example {
        problem: "Factor x^2 + 5x + 6",
        expected_operation: "factor",
        expected_result: "(x + 2)(x + 3)",
        difficulty: "intermediate",
    },
    Example {
        problem: "Simplify (x^2 + 2x + 1)",
        expected_operation: "simplify",
        expected_result: "(x + 1)^2",
        difficulty: "basic",
    },
    Example {
        problem: "Find the zeros of x^2 - 4",
        expected_operation: "find_zeros",
        expected_result: "x = 2, x = -2",
        difficulty: "basic",
    },
];

/// The answer shown when the server cannot be reached. It does not depend on
/// the problem beyond echoing it back.
pub fn demo_solution(problem: &str) -> SolveResponse {
    SolveResponse {
        success: true,
        original_problem: problem.to_string(),
        analysis: Analysis {
            operation: "solve".into(),
            expression: problem.to_string(),
            context: "Local fallback solution (server unavailable)".into(),
        },
        calculation: Calculation {
            method: "demo".into(),
            result: "x = 4".into(),
            operation: "solve".into(),
            steps: Steps::List(
                [
                    "Server connection failed - showing demo solution",
                    "Subtract 2 from both sides: 3x + 2 - 2 = 14 - 2",
                    "Simplify: 3x = 12",
                    "Divide both sides by 3: 3x/3 = 12/3",
                    "Final answer: x = 4",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ),
            confidence: None,
        },
        explanation: "This is a demo solution since the server is currently unavailable. \
                      The actual server would provide AI-powered solutions using Google Gemini."
            .into(),
        timestamp: None,
        processing_time: None,
        note: None,
    }
}
