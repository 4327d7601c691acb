//! Splits template source into literal text and `{{directive "argument"}}` nodes.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FacadeError, Result};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"^([A-Za-z_][\w.-]*)(?:\s+(?:"((?:[^"\\]|\\.)*)"|'([^']*)'|([^\s"']+)))?$"#,
        )
        .expect("invalid directive regex")
    })
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal output.
    Text(String),
    /// A directive invocation with its optional argument.
    Directive {
        /// Directive name.
        name: String,
        /// Argument text, already unquoted.
        argument: Option<String>,
    },
}

/// A template split into nodes, independent of any compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source.
    ///
    /// `{{! ... }}` tags are comments and produce no output.
    pub fn parse(source: &str) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut cursor = 0;

        while let Some(found) = source[cursor..].find(OPEN) {
            let open = cursor + found;
            push_text(&mut nodes, &source[cursor..open]);

            let body_start = open + OPEN.len();
            let close = source[body_start..]
                .find(CLOSE)
                .map(|offset| body_start + offset)
                .ok_or(FacadeError::TemplateSyntax {
                    offset: open,
                    reason: "unterminated tag",
                })?;

            let body = source[body_start..close].trim();
            if !body.starts_with('!') {
                nodes.push(parse_directive(body, open)?);
            }
            cursor = close + CLOSE.len();
        }

        push_text(&mut nodes, &source[cursor..]);
        Ok(Self { nodes })
    }

    /// Parsed nodes in source order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(previous)) = nodes.last_mut() {
        previous.push_str(text);
        return;
    }
    nodes.push(Node::Text(text.to_string()));
}

fn parse_directive(body: &str, offset: usize) -> Result<Node> {
    let captures = directive_pattern()
        .captures(body)
        .ok_or(FacadeError::TemplateSyntax {
            offset,
            reason: "expected `name` or `name \"argument\"`",
        })?;

    let argument = if let Some(quoted) = captures.get(2) {
        Some(unescape(quoted.as_str()))
    } else {
        captures
            .get(3)
            .or_else(|| captures.get(4))
            .map(|m| m.as_str().to_string())
    };

    Ok(Node::Directive {
        name: captures[1].to_string(),
        argument,
    })
}

fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    result
}
