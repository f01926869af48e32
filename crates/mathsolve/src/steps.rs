//! Presentation of a solution: step splitting, inline LaTeX scanning and a
//! plain-text rendering for terminals.

use crate::api::SolveResponse;
use itertools::Itertools;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn enumerator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?i:step)\s+\d+\s*[:.)]|\d+[.)](?:\s|$)|[-*•]\s)\s*").expect("valid regex")
    })
}

/// Splits a newline-separated steps string into cleaned, non-empty steps.
///
/// Leading enumerators (`1.`, `2)`, `Step 3:`) and bullets are removed.
pub fn split_steps(steps: &str) -> Vec<String> {
    steps
        .lines()
        .map(|line| enumerator().replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// A step divided into its descriptive title and the math that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepParts {
    pub title: String,
    pub math: String,
}

impl StepParts {
    fn whole(step: &str) -> Self {
        StepParts {
            title: step.to_string(),
            math: String::new(),
        }
    }
}

/// Splits on the first `:` outside of inline math.
///
/// A title ending in `(` is an unfinished sentence, so the step is kept whole.
pub fn split_step(step: &str) -> StepParts {
    let step = step.trim();
    let Some(colon) = first_text_colon(step) else {
        return StepParts::whole(step);
    };

    let title = step[..colon].trim_end();
    if title.ends_with('(') {
        return StepParts::whole(step);
    }
    StepParts {
        title: title.to_string(),
        math: step[colon + 1..].trim().to_string(),
    }
}

fn first_text_colon(step: &str) -> Option<usize> {
    tokens(step)
        .into_iter()
        .filter(|t| t.kind == Kind::Text)
        .find_map(|t| step[t.outer.clone()].find(':').map(|i| t.outer.start + i))
}

/// A run of text or math found by [scan_latex]. Math variants hold the source
/// between the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    InlineMath(String),
    DisplayMath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    EscapedDollar,
    Inline,
    Display,
}

#[derive(Debug, Clone)]
struct Token {
    kind: Kind,
    outer: Range<usize>,
    inner: Range<usize>,
}

/// Splits text on `$…$`, `\(…\)`, `$$…$$` and `\[…\]` delimiters.
///
/// `\$` is a literal dollar and an opener without a closer is plain text.
pub fn scan_latex(text: &str) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for t in tokens(text) {
        let piece = match t.kind {
            Kind::Text => Segment::Text(text[t.inner].to_string()),
            Kind::EscapedDollar => Segment::Text("$".into()),
            Kind::Inline => Segment::InlineMath(text[t.inner].to_string()),
            Kind::Display => Segment::DisplayMath(text[t.inner].to_string()),
        };
        if let (Some(Segment::Text(prev)), Segment::Text(s)) = (out.last_mut(), &piece) {
            prev.push_str(s);
            continue;
        }
        out.push(piece);
    }
    out
}

fn tokens(text: &str) -> Vec<Token> {
    let b = text.as_bytes();
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < b.len() {
        let found = match (b[i], b.get(i + 1).copied()) {
            (b'\\', Some(b'$')) => Some((Kind::EscapedDollar, i..i + 2, i..i)),
            (b'\\', Some(b'(')) => find_from(text, i + 2, "\\)")
                .map(|j| (Kind::Inline, i..j + 2, i + 2..j)),
            (b'\\', Some(b'[')) => find_from(text, i + 2, "\\]")
                .map(|j| (Kind::Display, i..j + 2, i + 2..j)),
            (b'$', Some(b'$')) => find_from(text, i + 2, "$$")
                .filter(|&j| j > i + 2)
                .map(|j| (Kind::Display, i..j + 2, i + 2..j)),
            (b'$', _) => closing_dollar(b, i + 1)
                .filter(|&j| j > i + 1)
                .map(|j| (Kind::Inline, i..j + 1, i + 1..j)),
            _ => None,
        };

        match found {
            Some((kind, outer, inner)) => {
                flush(&mut out, text_start, outer.start);
                i = outer.end;
                text_start = i;
                out.push(Token { kind, outer, inner });
            }
            // Skip both bytes of an escape so `\\$` stays escaped text.
            None if b[i] == b'\\' && i + 1 < b.len() && b[i + 1] == b'\\' => i += 2,
            None => i += 1,
        }
    }
    flush(&mut out, text_start, b.len());
    out
}

fn flush(out: &mut Vec<Token>, start: usize, end: usize) {
    if end > start {
        out.push(Token {
            kind: Kind::Text,
            outer: start..end,
            inner: start..end,
        });
    }
}

fn find_from(text: &str, from: usize, pat: &str) -> Option<usize> {
    text.get(from..)?.find(pat).map(|j| from + j)
}

fn closing_dollar(b: &[u8], from: usize) -> Option<usize> {
    (from..b.len()).find(|&j| b[j] == b'$' && b[j - 1] != b'\\')
}

const SYMBOLS: &[(&str, &str)] = &[
    ("cdot", "·"),
    ("times", "×"),
    ("div", "÷"),
    ("pm", "±"),
    ("mp", "∓"),
    ("le", "≤"),
    ("leq", "≤"),
    ("ge", "≥"),
    ("geq", "≥"),
    ("neq", "≠"),
    ("ne", "≠"),
    ("approx", "≈"),
    ("infty", "∞"),
    ("pi", "π"),
    ("theta", "θ"),
    ("alpha", "α"),
    ("beta", "β"),
    ("lambda", "λ"),
    ("Delta", "Δ"),
    ("int", "∫"),
    ("sum", "∑"),
    ("to", "→"),
    ("rightarrow", "→"),
    ("Rightarrow", "⇒"),
    ("implies", "⇒"),
    ("cdots", "…"),
    ("ldots", "…"),
    ("dots", "…"),
    ("circ", "∘"),
    ("quad", " "),
    ("qquad", "  "),
];

/// Best-effort readable form of a LaTeX snippet.
pub fn latex_to_text(latex: &str) -> String {
    let mut out = String::new();
    let mut rest = latex;

    while let Some(c) = rest.chars().next() {
        match c {
            '\\' => {
                let name_len = rest[1..]
                    .chars()
                    .take_while(|c| c.is_ascii_alphabetic())
                    .count();
                if name_len == 0 {
                    let Some(next) = rest[1..].chars().next() else {
                        out.push('\\');
                        break;
                    };
                    match next {
                        ',' | ';' | ' ' | '\\' => out.push(' '),
                        '!' => {}
                        other => out.push(other),
                    }
                    rest = &rest[1 + next.len_utf8()..];
                    continue;
                }

                let name = &rest[1..1 + name_len];
                rest = &rest[1 + name_len..];
                match name {
                    "frac" | "dfrac" | "tfrac" => {
                        let (num, after) = group(rest);
                        let (den, after) = group(after);
                        out.push_str(&format!("({})/({})", latex_to_text(num), latex_to_text(den)));
                        rest = after;
                    }
                    "sqrt" => {
                        let (index, after) = match rest.trim_start().strip_prefix('[') {
                            Some(r) => match r.find(']') {
                                Some(end) => (Some(&r[..end]), &r[end + 1..]),
                                None => (None, rest),
                            },
                            None => (None, rest),
                        };
                        let (radicand, after) = group(after);
                        if let Some(index) = index {
                            out.push_str(&latex_to_text(index));
                        }
                        out.push_str(&format!("√({})", latex_to_text(radicand)));
                        rest = after;
                    }
                    "left" | "right" => {
                        rest = rest.strip_prefix('.').unwrap_or(rest);
                    }
                    "text" | "mathrm" | "mathbf" | "mathit" | "operatorname" => {
                        let (inner, after) = group(rest);
                        out.push_str(&latex_to_text(inner));
                        rest = after;
                    }
                    other => match SYMBOLS.iter().find(|(n, _)| *n == other) {
                        Some((_, sym)) => out.push_str(sym),
                        // Function names such as \sin or \ln read fine bare.
                        None => out.push_str(other),
                    },
                }
            }
            '^' | '_' => {
                out.push(c);
                let (inner, after) = group(&rest[1..]);
                let inner = latex_to_text(inner);
                if inner.chars().count() <= 1 {
                    out.push_str(&inner);
                } else {
                    out.push_str(&format!("({})", inner));
                }
                rest = after;
            }
            '{' | '}' => {
                let (inner, after) = if c == '{' { group(rest) } else { ("", &rest[1..]) };
                out.push_str(&latex_to_text(inner));
                rest = after;
            }
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Reads one argument: a balanced `{…}` group or a single character.
fn group(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let Some(first) = s.chars().next() else {
        return ("", s);
    };
    if first != '{' {
        let len = first.len_utf8();
        return (&s[..len], &s[len..]);
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (&s[1..i], &s[i + 1..]);
                }
            }
            _ => {}
        }
    }
    // Unbalanced; take everything.
    (&s[1..], "")
}

/// Renders text with any embedded math converted by [latex_to_text].
pub fn render_inline(text: &str) -> String {
    scan_latex(text)
        .into_iter()
        .map(|seg| match seg {
            Segment::Text(t) => t,
            Segment::InlineMath(m) | Segment::DisplayMath(m) => latex_to_text(&m),
        })
        .collect()
}

/// Renders one numbered step: the title on the first line, the math indented below.
pub fn render_step(number: usize, step: &str) -> String {
    let parts = split_step(step);
    match (parts.title.is_empty(), parts.math.is_empty()) {
        (_, true) => format!("Step {}: {}", number, render_inline(&parts.title)),
        (true, false) => format!("Step {}: {}", number, render_inline(&parts.math)),
        (false, false) => format!(
            "Step {}: {}\n    {}",
            number,
            render_inline(&parts.title),
            render_inline(&parts.math)
        ),
    }
}

pub fn render_solution(resp: &SolveResponse) -> String {
    let mut sections = vec![
        format!("Problem: {}", resp.original_problem.trim()),
        format!("Result: {}", render_inline(&resp.calculation.result)),
    ];

    let steps = resp.calculation.steps.to_list();
    if !steps.is_empty() {
        sections.push(format!(
            "Let's solve your equation step-by-step.\n{}",
            steps
                .iter()
                .enumerate()
                .map(|(i, s)| render_step(i + 1, s))
                .join("\n")
        ));
    }
    sections.push(format!(
        "Answer: {}",
        render_inline(&resp.calculation.result)
    ));
    if !resp.explanation.trim().is_empty() {
        sections.push(format!("Explanation:\n{}", resp.explanation.trim()));
    }
    if let Some(note) = &resp.note {
        sections.push(format!("Note: {}", note));
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_cleans_steps() {
        let steps = "1. Subtract 2 from both sides: $3x = 12$\n\n  2) Divide by 3: $x = 4$\n- Check: done\nStep 4: Final answer: $x = 4$\n   ";
        assert_eq!(
            split_steps(steps),
            vec![
                "Subtract 2 from both sides: $3x = 12$",
                "Divide by 3: $x = 4$",
                "Check: done",
                "Final answer: $x = 4$",
            ]
        );
    }

    #[test]
    fn enumerator_needs_a_delimiter() {
        assert_eq!(split_steps("2x + 3 = 7"), vec!["2x + 3 = 7"]);
        assert_eq!(split_steps("1.5x = 3"), vec!["1.5x = 3"]);
        assert_eq!(split_steps("-3x = 6"), vec!["-3x = 6"]);
    }

    #[test]
    fn step_title_and_math() {
        assert_eq!(
            split_step("Apply the power rule: $d/dx(x^2) = 2x$"),
            StepParts {
                title: "Apply the power rule".into(),
                math: "$d/dx(x^2) = 2x$".into()
            }
        );
        // A second colon stays in the math part.
        assert_eq!(
            split_step("Check: ratio is 2:3").math,
            "ratio is 2:3"
        );
    }

    #[test]
    fn colon_inside_math_does_not_split() {
        assert_eq!(
            split_step("Define $f: x \\mapsto x^2$ first"),
            StepParts {
                title: "Define $f: x \\mapsto x^2$ first".into(),
                math: String::new()
            }
        );
        assert_eq!(
            split_step("Map $f: A$ onto: $B$"),
            StepParts {
                title: "Map $f: A$ onto".into(),
                math: "$B$".into()
            }
        );
    }

    #[test]
    fn unfinished_title_is_kept_whole() {
        let step = "Rewrite the product (: $x$";
        assert_eq!(split_step(step), StepParts::whole(step));
        assert_eq!(split_step("Simplify"), StepParts::whole("Simplify"));
    }

    #[test]
    fn scans_delimiters() {
        assert_eq!(
            scan_latex("So $x = 4$ and \\(y\\) give $$x + y$$ or \\[z\\]."),
            vec![
                Segment::Text("So ".into()),
                Segment::InlineMath("x = 4".into()),
                Segment::Text(" and ".into()),
                Segment::InlineMath("y".into()),
                Segment::Text(" give ".into()),
                Segment::DisplayMath("x + y".into()),
                Segment::Text(" or ".into()),
                Segment::DisplayMath("z".into()),
                Segment::Text(".".into()),
            ]
        );
    }

    #[test]
    fn escaped_and_unterminated_dollars_are_text() {
        assert_eq!(
            scan_latex("costs \\$5 today"),
            vec![Segment::Text("costs $5 today".into())]
        );
        assert_eq!(
            scan_latex("only $ one"),
            vec![Segment::Text("only $ one".into())]
        );
        assert_eq!(scan_latex(""), vec![]);
    }

    #[test]
    fn latex_readable() {
        assert_eq!(latex_to_text("\\frac{x^2}{2} + C"), "(x^2)/(2) + C");
        assert_eq!(latex_to_text("x^{n+1}"), "x^(n+1)");
        assert_eq!(latex_to_text("x^{2}"), "x^2");
        assert_eq!(latex_to_text("\\sqrt{16} = 4"), "√(16) = 4");
        assert_eq!(latex_to_text("2 \\cdot 3 \\neq 5"), "2 · 3 ≠ 5");
        assert_eq!(latex_to_text("\\left(x + 1\\right)^2"), "(x + 1)^2");
        assert_eq!(latex_to_text("mathematical\\_expression"), "mathematical_expression");
        assert_eq!(latex_to_text("\\sin x"), "sin x");
        assert_eq!(latex_to_text("\\int 2x \\, dx"), "∫ 2x   dx");
    }

    #[test]
    fn renders_steps() {
        assert_eq!(
            render_step(1, "Apply the power rule: $\\frac{d}{dx} x^2 = 2x$"),
            "Step 1: Apply the power rule\n    (d)/(dx) x^2 = 2x"
        );
        assert_eq!(render_step(2, "Simplify"), "Step 2: Simplify");
        assert_eq!(render_step(3, ": $x = 4$"), "Step 3: x = 4");
    }
}
