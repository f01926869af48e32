//! Pulls the labeled solution fields out of the model's free-text answer.

use gemini_prompt::parse::{
    labeled_block, labeled_line, markdown_codeblock, strip_label_emphasis, unwrap_fenced,
    MarkdownOptions,
};

pub const DEFAULT_OPERATION: &str = "mathematical_operation";
pub const DEFAULT_RESULT: &str = "Solution provided in explanation";
pub const DEFAULT_STEPS: &str = "Detailed steps provided in explanation below";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub operation: String,
    pub expression: String,
    pub result: String,
    pub steps: String,
}

impl Solution {
    /// Parses a model response, substituting defaults for any missing field.
    pub fn from_response(raw: &str, problem: &str) -> Self {
        let mut text = strip_label_emphasis(&unwrap_fenced(raw)).into_owned();
        // Labels inside a fence that sits between prose. A fence without
        // labels is part of the answer and leaves the text alone.
        if labeled_line(&text, "RESULT").is_none() {
            if let Some(block) = markdown_codeblock(raw, &MarkdownOptions::any().leading()) {
                let block = strip_label_emphasis(&block).into_owned();
                if labeled_line(&block, "RESULT").is_some() {
                    text = block;
                }
            }
        }

        Solution {
            operation: labeled_line(&text, "OPERATION")
                .unwrap_or_else(|| DEFAULT_OPERATION.to_string()),
            expression: labeled_line(&text, "EXPRESSION")
                .unwrap_or_else(|| problem.trim().to_string()),
            result: labeled_line(&text, "RESULT").unwrap_or_else(|| DEFAULT_RESULT.to_string()),
            steps: labeled_block(&text, "STEPS").unwrap_or_else(|| DEFAULT_STEPS.to_string()),
        }
    }

    /// True when the answer carried at least an operation and a result.
    pub fn is_structured(&self) -> bool {
        self.operation != DEFAULT_OPERATION && self.result != DEFAULT_RESULT
    }

    /// A derivative whose result is a bare integer is usually a misread answer.
    pub fn suspicious_result(&self) -> bool {
        self.operation.to_lowercase().contains("deriv")
            && !self.result.is_empty()
            && self.result.chars().all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_well_formed_answer() {
        let raw = indoc! {"
            OPERATION: factor
            EXPRESSION: x^2 + 5x + 6
            RESULT: (x + 2)(x + 3)
            STEPS:
            1. Identify the quadratic form: $ax^2 + bx + c$ where $a=1$, $b=5$, $c=6$
            2. Find two numbers that multiply to 6 and add to 5: The numbers are 2 and 3
            3. Write the factored form: $(x + 2)(x + 3)$
        "};
        let s = Solution::from_response(raw, "Factor x^2 + 5x + 6");
        assert_eq!(s.operation, "factor");
        assert_eq!(s.expression, "x^2 + 5x + 6");
        assert_eq!(s.result, "(x + 2)(x + 3)");
        assert!(s.steps.starts_with("1. Identify the quadratic form"));
        assert!(s.steps.ends_with("$(x + 2)(x + 3)$"));
        assert_eq!(s.steps.lines().count(), 3);
        assert!(s.is_structured());
    }

    #[test]
    fn handles_fenced_and_bold_labels() {
        let raw = indoc! {"
            ```
            **OPERATION:** derivative
            **EXPRESSION:** x^2 + 3x + 2
            **RESULT:** 2x + 3
            **STEPS:**
            1. Apply power rule to each term: $2x + 3$
            ```
        "};
        let s = Solution::from_response(raw, "Find the derivative of x^2 + 3x + 2");
        assert_eq!(s.operation, "derivative");
        assert_eq!(s.result, "2x + 3");
        assert_eq!(s.steps, "1. Apply power rule to each term: $2x + 3$");
    }

    #[test]
    fn finds_labels_in_fence_between_prose() {
        let raw = indoc! {"
            Here is the solution:

            ```text
            OPERATION: integral
            RESULT: x^2 + 3x + C
            ```

            Let me know if you need more detail.
        "};
        let s = Solution::from_response(raw, "Integrate 2x + 3 dx");
        assert_eq!(s.operation, "integral");
        assert_eq!(s.result, "x^2 + 3x + C");
        assert_eq!(s.expression, "Integrate 2x + 3 dx");
    }

    #[test]
    fn unlabeled_fence_keeps_surrounding_labels() {
        let raw = indoc! {"
            OPERATION: simplify
            EXPRESSION: (x + 1)^2
            STEPS:
            1. Expand the square: $x^2 + 2x + 1$

            ```
            x^2 + 2x + 1
            ```
        "};
        let s = Solution::from_response(raw, "Simplify (x + 1)^2");
        assert_eq!(s.operation, "simplify");
        assert_eq!(s.expression, "(x + 1)^2");
        assert_eq!(s.result, DEFAULT_RESULT);
        assert_eq!(s.steps, "1. Expand the square: $x^2 + 2x + 1$");
    }

    #[test]
    fn emphasised_result_outside_fence_wins() {
        let raw = indoc! {"
            **OPERATION**: factor
            **RESULT**: (x - 2)(x + 2)

            ```
            RESULT: wrong
            ```
        "};
        let s = Solution::from_response(raw, "Factor x^2 - 4");
        assert_eq!(s.operation, "factor");
        assert_eq!(s.result, "(x - 2)(x + 2)");
    }

    #[test]
    fn falls_back_to_defaults() {
        let s = Solution::from_response("The answer is 4.", "  Solve 3x + 2 = 14 ");
        assert_eq!(
            s,
            Solution {
                operation: DEFAULT_OPERATION.into(),
                expression: "Solve 3x + 2 = 14".into(),
                result: DEFAULT_RESULT.into(),
                steps: DEFAULT_STEPS.into(),
            }
        );
        assert!(!s.is_structured());
    }

    #[test]
    fn flags_numeric_derivative() {
        let mut s = Solution::from_response("OPERATION: Derivative\nRESULT: 12", "d/dx");
        assert!(s.suspicious_result());
        s.result = "2x".into();
        assert!(!s.suspicious_result());
        s.operation = "integral".into();
        s.result = "12".into();
        assert!(!s.suspicious_result());
    }
}
