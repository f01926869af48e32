//! Prompt templates sent to the model.

use crate::extract::Solution;
use indoc::formatdoc;

/// Structured prompt asking for the `OPERATION`/`EXPRESSION`/`RESULT`/`STEPS` format.
pub fn solve_prompt(problem: &str) -> String {
    formatdoc! {"
        You are a mathematical expert. Solve this math problem with clear, well-formatted steps.

        Problem: \"{problem}\"

        CRITICAL FORMATTING RULES:
        1. Provide 3-6 clear steps maximum
        2. Each step MUST be a COMPLETE sentence followed by a colon and the mathematical expression
        3. NEVER leave step descriptions incomplete or hanging
        4. Use proper LaTeX syntax wrapped in $ signs for all math

        Please provide your response in this EXACT format:
        OPERATION: [the mathematical operation - examples: derivative, integral, simplify, factor, solve, find_zeros]
        EXPRESSION: [the mathematical expression]
        RESULT: [the final answer only - just the mathematical expression or value]
        STEPS: [3-6 concise numbered steps]

        Step formatting rules:
        - Format: \"Complete description: $mathematical\\_expression$\"
        - Example: \"Apply the power rule: $d/dx(x^2) = 2x$\"
        - Example: \"Rewrite the middle term using these two numbers: $x^2 + 2x + 3x + 6$\"
        - NEVER end a description with an open parenthesis - always complete the sentence
        - Keep descriptions clear and self-contained
        - Use $ signs around ALL mathematical expressions
        - Maximum 6 steps total

        Example for \"Factor x^2 + 5x + 6\":
        OPERATION: factor
        EXPRESSION: x^2 + 5x + 6
        RESULT: (x + 2)(x + 3)
        STEPS:
        1. Identify the quadratic form: $ax^2 + bx + c$ where $a=1$, $b=5$, $c=6$
        2. Find two numbers that multiply to 6 and add to 5: The numbers are 2 and 3
        3. Write the factored form: $(x + 2)(x + 3)$

        Example for \"Find derivative of x^2 + 3x + 2\":
        OPERATION: derivative
        EXPRESSION: x^2 + 3x + 2
        RESULT: 2x + 3
        STEPS:
        1. Apply the sum rule to separate terms: $d/dx(x^2 + 3x + 2) = d/dx(x^2) + d/dx(3x) + d/dx(2)$
        2. Apply power rule to each term: d/dx(x^2) = 2x, d/dx(3x) = 3, d/dx(2) = 0
        3. Combine results: 2x + 3 + 0 = 2x + 3

        Now solve: \"{problem}\"
        Keep it concise with 3-6 clear steps only.
    "}
}

pub fn explanation_prompt(problem: &str, solution: &Solution) -> String {
    formatdoc! {"
        Create a clear, educational explanation for this mathematical solution:

        Problem: {problem}
        Operation: {operation}
        Mathematical Expression: {expression}
        Final Result: {result}
        Solution Steps: {steps}

        Provide a friendly, conversational explanation that:
        1. Identifies what type of mathematical problem this is
        2. Explains the approach used to solve it
        3. Clarifies why the answer is correct
        4. Mentions any key mathematical concepts or rules involved
        5. Uses clear, educational language suitable for students

        Keep the explanation concise but informative, around 3-4 sentences.
        ",
        operation = solution.operation,
        expression = solution.expression,
        result = solution.result,
        steps = solution.steps,
    }
}

pub fn fallback_prompt(problem: &str) -> String {
    formatdoc! {"
        Solve this math problem clearly and concisely: {problem}

        Provide the solution in a clear format with:
        1. The final answer
        2. Brief explanation of how you got there

        Problem: {problem}
    "}
}
