//! Node template engine: lexer, parser and renderer

pub mod lexer;
pub mod parser;
pub mod renderer;

/// User-facing inline tag
pub const NODE_TAG: &str = "node";
/// User-facing block tag
pub const BLOCK_TAG: &str = "blocknode";
/// Closing tag of the block form
pub const END_BLOCK_TAG: &str = "endblocknode";
/// Machine-inserted initialization tag, never written by template authors
pub const INIT_TAG: &str = "__djedi__init__";

// Re-export main types
pub use lexer::{filter_stream, Lexer, Token};
pub use parser::{
    Expr, NodeRef, Parser, PendingNode, Statement, TagInvocation, TagKind, Template, Value,
};
pub use renderer::{Context, Renderer};

/// Normalize a block body: strip leading/trailing newlines, then dedent
pub fn normalize_block(text: &str) -> String {
    dedent(text.trim_matches(|c| c == '\n' || c == '\r'))
}

/// Remove the common leading-whitespace prefix from every line.
///
/// Whitespace-only lines are ignored when computing the prefix and come out
/// empty.
pub fn dedent(text: &str) -> String {
    let prefix = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    let mut lines = Vec::new();
    for line in text.lines() {
        if let Some(stripped) = line.strip_prefix(prefix) {
            lines.push(stripped);
        } else {
            // Only whitespace-only lines can miss the common prefix
            lines.push("");
        }
    }
    lines.join("\n")
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let mut end = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        end += ca.len_utf8();
    }
    &a[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_uniform_indent() {
        assert_eq!(dedent("    a\n    b"), "a\nb");
    }

    #[test]
    fn test_dedent_mixed_depths() {
        assert_eq!(dedent("    a\n      b\n    c"), "a\n  b\nc");
    }

    #[test]
    fn test_dedent_no_indent() {
        assert_eq!(dedent("a\nb"), "a\nb");
    }

    #[test]
    fn test_dedent_ignores_blank_lines() {
        assert_eq!(dedent("    a\n\n    b"), "a\n\nb");
    }

    #[test]
    fn test_dedent_whitespace_only_line() {
        // A shorter whitespace-only line must not shrink the prefix
        assert_eq!(dedent("    a\n  \n    b"), "a\n\nb");
    }

    #[test]
    fn test_dedent_tabs() {
        assert_eq!(dedent("\ta\n\tb"), "a\nb");
    }

    #[test]
    fn test_normalize_block_strips_edge_newlines() {
        assert_eq!(normalize_block("\n    Hello\n    World\n"), "Hello\nWorld");
    }

    #[test]
    fn test_normalize_block_keeps_inner_blank_lines() {
        assert_eq!(normalize_block("\na\n\nb\n"), "a\n\nb");
    }

    #[test]
    fn test_normalize_block_empty() {
        assert_eq!(normalize_block(""), "");
        assert_eq!(normalize_block("\n\n"), "");
    }

    #[test]
    fn test_normalize_block_keeps_leading_spaces_on_single_line() {
        // A single line's whole indent is the common prefix
        assert_eq!(normalize_block("   centered   "), "centered   ");
    }
}
