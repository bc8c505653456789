//! Template tokenization

use super::INIT_TAG;
use crate::error::{DjediError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Regex for matching template delimiters: {{ expression }} and {% tag %}
fn delimiter_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)\{\{(.*?)\}\}|\{%(.*?)%\}").unwrap())
}

/// A lexed piece of template source
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal template text, emitted verbatim
    Text { text: String, line: usize },
    /// A {{ expression }} output
    Output { expr: String, line: usize },
    /// A {% name args %} block tag
    Tag {
        name: String,
        args: String,
        line: usize,
    },
}

impl Token {
    pub fn line(&self) -> usize {
        match self {
            Token::Text { line, .. } | Token::Output { line, .. } | Token::Tag { line, .. } => {
                *line
            }
        }
    }
}

pub struct Lexer;

impl Lexer {
    /// Tokenize template source into text, output and tag tokens
    pub fn tokenize(source: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        for caps in delimiter_regex().captures_iter(source) {
            let whole = caps.get(0).expect("capture 0 always present");

            if whole.start() > cursor {
                let text = &source[cursor..whole.start()];
                push_text(&mut tokens, text, line_at(source, cursor))?;
            }

            let line = line_at(source, whole.start());
            if let Some(expr) = caps.get(1) {
                let expr = expr.as_str().trim();
                if expr.is_empty() {
                    return Err(DjediError::Parse {
                        line,
                        message: "empty output expression".to_string(),
                    });
                }
                tokens.push(Token::Output {
                    expr: expr.to_string(),
                    line,
                });
            } else if let Some(tag) = caps.get(2) {
                let inner = tag.as_str().trim();
                let (name, args) = match inner.split_once(char::is_whitespace) {
                    Some((name, args)) => (name, args.trim()),
                    None => (inner, ""),
                };
                if name.is_empty() {
                    return Err(DjediError::Parse {
                        line,
                        message: "empty tag".to_string(),
                    });
                }
                tokens.push(Token::Tag {
                    name: name.to_string(),
                    args: args.to_string(),
                    line,
                });
            }

            cursor = whole.end();
        }

        if cursor < source.len() {
            push_text(&mut tokens, &source[cursor..], line_at(source, cursor))?;
        }

        Ok(tokens)
    }
}

/// Prepend the synthetic initialization tag to a token stream.
///
/// Guarantees the node lookup table exists before any node tag is reached,
/// regardless of where those tags appear in the template source.
pub fn filter_stream(tokens: Vec<Token>) -> Vec<Token> {
    let mut filtered = Vec::with_capacity(tokens.len() + 1);
    filtered.push(Token::Tag {
        name: INIT_TAG.to_string(),
        args: String::new(),
        line: 0,
    });
    filtered.extend(tokens);
    filtered
}

fn push_text(tokens: &mut Vec<Token>, text: &str, line: usize) -> Result<()> {
    // An opening delimiter surviving into literal text means its closer
    // never matched
    for open in ["{%", "{{"] {
        if let Some(pos) = text.find(open) {
            return Err(DjediError::Parse {
                line: line + text[..pos].matches('\n').count(),
                message: format!("unterminated '{}' delimiter", open),
            });
        }
    }
    tokens.push(Token::Text {
        text: text.to_string(),
        line,
    });
    Ok(())
}

/// 1-based line number of a byte offset in the source
fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}
