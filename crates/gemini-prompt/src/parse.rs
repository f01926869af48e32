//! Helpers and utilities for extracting structured data from LLM output.

use markdown::mdast::{Code, Node};
use markdown::{to_mdast, ParseOptions};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
/// Describes how to extract a code section from a block of text.
pub struct MarkdownOptions<'a> {
    from_back: bool,
    require_lang: bool,
    lang: Option<&'a str>,
}

impl<'a> MarkdownOptions<'a> {
    /// Matches any fenced block, preferring the last one.
    pub fn any() -> Self {
        MarkdownOptions {
            from_back: true,
            require_lang: false,
            lang: None,
        }
    }

    pub fn json() -> Self {
        MarkdownOptions {
            from_back: true,
            require_lang: false,
            lang: Some("json"),
        }
    }

    pub fn latex() -> Self {
        MarkdownOptions {
            from_back: true,
            require_lang: true,
            lang: Some("latex"),
        }
    }

    pub fn leading(self) -> Self {
        MarkdownOptions {
            from_back: false,
            ..self
        }
    }
}

/// Extracts a leading or trailing markdown code block using the given opts as configuration.
pub fn markdown_codeblock(text: &str, opts: &MarkdownOptions) -> Option<String> {
    let mut candidates = vec![to_mdast(text, &ParseOptions::default()).ok()?];
    while let Some(node) = candidates.pop() {
        // Enqueue any nested markdown objects for consideration.
        match (node.children(), opts.from_back) {
            (Some(c), false) => {
                c.iter().rev().for_each(|c| candidates.push(c.clone()));
            }
            (Some(c), true) => {
                c.iter().for_each(|c| candidates.push(c.clone()));
            }
            _ => {}
        }

        if let Node::Code(Code { value, lang, .. }) = node {
            match (lang, opts.lang, opts.require_lang) {
                (Some(lang), Some(want_lang), _) => {
                    if lang == want_lang {
                        return Some(value);
                    }
                }
                (Some(_), None, false) | (None, _, false) => {
                    return Some(value);
                }
                _ => {}
            }
        }
    }

    None
}

/// If the whole response is one fenced code block, returns its body; otherwise the input.
///
/// Models sometimes wrap a requested plain-text format in a fence.
pub fn unwrap_fenced(text: &str) -> Cow<'_, str> {
    if !text.trim_start().starts_with("```") && !text.trim_start().starts_with("~~~") {
        return Cow::Borrowed(text);
    }
    let Ok(root) = to_mdast(text, &ParseOptions::default()) else {
        return Cow::Borrowed(text);
    };
    match root.children().map(|c| c.as_slice()) {
        Some([Node::Code(Code { value, .. })]) => Cow::Owned(value.clone()),
        _ => Cow::Borrowed(text),
    }
}

fn emphasis_res() -> &'static [Regex; 2] {
    static RES: OnceLock<[Regex; 2]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // **LABEL:**
            Regex::new(r"(?:\*\*|__)\s*([A-Za-z][A-Za-z_ ]*?)\s*:\s*(?:\*\*|__)").expect("valid regex"),
            // **LABEL**:
            Regex::new(r"(?:\*\*|__)\s*([A-Za-z][A-Za-z_ ]*?)\s*(?:\*\*|__)\s*:").expect("valid regex"),
        ]
    })
}

/// Rewrites emphasised labels such as `**RESULT:**` or `**RESULT**:` to `RESULT:`.
pub fn strip_label_emphasis(text: &str) -> Cow<'_, str> {
    let [inner, outer] = emphasis_res();
    match inner.replace_all(text, "${1}:") {
        Cow::Borrowed(_) => outer.replace_all(text, "${1}:"),
        Cow::Owned(s) => Cow::Owned(outer.replace_all(&s, "${1}:").into_owned()),
    }
}

/// Returns the rest of the line following the first `LABEL:` (case-insensitive).
///
/// Whitespace after the colon may span lines, so a label on its own line picks up
/// the next non-blank line. Empty values yield `None`.
pub fn labeled_line(text: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?i){}:\s*(.+)", regex::escape(label))).ok()?;
    let value = re.captures(text)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn block_terminator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\n\n|\n[A-Z]+:").expect("valid regex"))
}

/// Returns the text following the first `LABEL:` up to a blank line, the next
/// `WORD:` label at the start of a line, or the end of input.
pub fn labeled_block(text: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?i){}:\s*", regex::escape(label))).ok()?;
    let start = re.find(text)?.end();
    let rest = &text[start..];

    // The block always owns at least its first character.
    let first = rest.chars().next()?.len_utf8();
    let end = block_terminator()
        .find_at(rest, first)
        .map(|m| m.start())
        .unwrap_or(rest.len());

    let value = rest[..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn find_markdown_json_trailing() {
        // Empty
        assert_eq!(
            markdown_codeblock(
                r"
            ",
                &MarkdownOptions::json()
            ),
            None
        );
        // Make sure order is respected
        assert_eq!(
            markdown_codeblock(
                indoc! {r#"
                    ```json
                    {"result": "2x + 3"}
                    ```
                    Some random text in between.
                    ```json
                    {"result": "x = 4"}
                    ```
                "#},
                &MarkdownOptions::json()
            ),
            Some(r#"{"result": "x = 4"}"#.into()),
        );
        assert_eq!(
            markdown_codeblock(
                indoc! {r#"
                    ```json
                    {"result": "2x + 3"}
                    ```
                    ```json
                    {"result": "x = 4"}
                    ```
                "#},
                &MarkdownOptions::json().leading()
            ),
            Some(r#"{"result": "2x + 3"}"#.into()),
        );
    }

    #[test]
    fn find_markdown_requires_lang() {
        let text = indoc! {"
            ```
            x^2
            ```
        "};
        assert_eq!(markdown_codeblock(text, &MarkdownOptions::latex()), None);
        assert_eq!(
            markdown_codeblock(text, &MarkdownOptions::any()),
            Some("x^2".into())
        );
    }

    #[test]
    fn unwraps_single_fence() {
        let text = indoc! {"
            ```text
            OPERATION: factor
            RESULT: (x + 2)(x + 3)
            ```
        "};
        assert_eq!(
            unwrap_fenced(text),
            "OPERATION: factor\nRESULT: (x + 2)(x + 3)"
        );

        let plain = "OPERATION: factor\n```\nx\n```";
        assert_eq!(unwrap_fenced(plain), plain);
    }

    #[test]
    fn strips_emphasis() {
        assert_eq!(
            strip_label_emphasis("**OPERATION:** derivative\n**RESULT**: 2x + 3"),
            "OPERATION: derivative\nRESULT: 2x + 3"
        );
        assert_eq!(strip_label_emphasis("$x**2$"), "$x**2$");
    }

    #[test]
    fn line_values() {
        let text = indoc! {"
            operation: derivative
            EXPRESSION:   x^2 + 3x + 2
            RESULT:
            2x + 3
        "};
        assert_eq!(labeled_line(text, "OPERATION").as_deref(), Some("derivative"));
        assert_eq!(labeled_line(text, "EXPRESSION").as_deref(), Some("x^2 + 3x + 2"));
        assert_eq!(labeled_line(text, "RESULT").as_deref(), Some("2x + 3"));
        assert_eq!(labeled_line(text, "STEPS"), None);
        assert_eq!(labeled_line("RESULT:   ", "RESULT"), None);
    }

    #[test]
    fn block_stops_at_blank_line() {
        let text = indoc! {"
            STEPS:
            1. Identify the form: $ax^2 + bx + c$
            2. Write the factored form: $(x + 2)(x + 3)$

            That is all.
        "};
        assert_eq!(
            labeled_block(text, "STEPS").as_deref(),
            Some("1. Identify the form: $ax^2 + bx + c$\n2. Write the factored form: $(x + 2)(x + 3)$")
        );
    }

    #[test]
    fn block_stops_at_next_label() {
        let text = "STEPS: 1. Apply the power rule: $2x$\nRESULT: 2x";
        assert_eq!(
            labeled_block(text, "steps").as_deref(),
            Some("1. Apply the power rule: $2x$")
        );
        // Labels are matched case-insensitively, like the label itself.
        let text = "STEPS:\n1. Expand: $x^2$\nNote: done";
        assert_eq!(labeled_block(text, "STEPS").as_deref(), Some("1. Expand: $x^2$"));
    }

    #[test]
    fn block_runs_to_end() {
        assert_eq!(
            labeled_block("STEPS: only step", "STEPS").as_deref(),
            Some("only step")
        );
        assert_eq!(labeled_block("STEPS:\n", "STEPS"), None);
        assert_eq!(labeled_block("no label here", "STEPS"), None);
    }
}
