//! Tag parsing into the template AST

use super::lexer::Token;
use super::{normalize_block, BLOCK_TAG, END_BLOCK_TAG, INIT_TAG, NODE_TAG};
use crate::domain::node::{node_id, NodeId};
use crate::error::{DjediError, Result};

/// A literal template value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Int(n) => *n != 0,
            Value::Bool(b) => *b,
            Value::Null => false,
        }
    }

    /// Text form used for output, hashing and parameter substitution.
    /// Null renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }
}

/// An expression in tag arguments or {{ }} output: a literal constant or a
/// runtime context variable
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(Value),
    Var(String),
}

impl Expr {
    fn as_const(&self) -> Option<&Value> {
        match self {
            Expr::Const(value) => Some(value),
            Expr::Var(_) => None,
        }
    }
}

/// The two user-facing tag forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Node,
    BlockNode,
}

/// How a tag occurrence resolves its content node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRef {
    /// Static occurrence: one lookup-table entry shared by every occurrence
    /// with the same identifier
    Lookup(NodeId),
    /// Dynamic occurrence: the uri expression is evaluated and fetched at
    /// render time, never deduplicated
    Uri(Expr),
}

/// A parsed node/blocknode occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct TagInvocation {
    pub kind: TagKind,
    pub node_ref: NodeRef,
    pub default: Expr,
    pub edit: Expr,
    pub params: Vec<(String, Expr)>,
    /// Block body statements; always empty for the inline form
    pub body: Vec<Statement>,
    pub line: usize,
}

/// A renderable template statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Literal text, emitted verbatim
    Text(String),
    /// {{ }} output, HTML-escaped at render time
    Output(Expr),
    /// Construct the node lookup table from the pending entries
    Init,
    /// A node/blocknode occurrence
    NodeTag(TagInvocation),
}

/// A statically-buffered node creation, executed once when the lookup table
/// is constructed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNode {
    pub id: NodeId,
    pub uri: String,
    pub default: String,
}

/// A parsed template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub statements: Vec<Statement>,
    /// Ordered pending entries accumulated by static buffering
    pub pending: Vec<PendingNode>,
}

/// Tag dispatch over the names this engine owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagName {
    Init,
    Node,
    BlockNode,
}

impl TagName {
    fn from_name(name: &str) -> Option<TagName> {
        match name {
            INIT_TAG => Some(TagName::Init),
            NODE_TAG => Some(TagName::Node),
            BLOCK_TAG => Some(TagName::BlockNode),
            _ => None,
        }
    }
}

/// Parse-time state threaded through tag parsing: the ordered pending-node
/// list that static buffering appends to
#[derive(Debug, Default)]
struct ParseContext {
    pending: Vec<PendingNode>,
}

impl ParseContext {
    /// Buffer a static (uri, default) pair, deduplicating on identifier.
    ///
    /// Identical pairs anywhere in one template share a single entry.
    fn buffer(&mut self, uri: &str, default: &str) -> NodeId {
        let id = node_id(uri, default);
        if !self.pending.iter().any(|entry| entry.id == id) {
            self.pending.push(PendingNode {
                id: id.clone(),
                uri: uri.to_string(),
                default: default.to_string(),
            });
        }
        id
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    context: ParseContext,
}

impl Parser {
    /// Parse a token stream into a template
    pub fn parse(tokens: Vec<Token>) -> Result<Template> {
        let mut parser = Parser {
            tokens,
            pos: 0,
            context: ParseContext::default(),
        };
        let statements = parser.parse_statements(None, 0)?;
        Ok(Template {
            statements,
            pending: parser.context.pending,
        })
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse statements until the named end tag (consumed) or end of stream
    fn parse_statements(
        &mut self,
        until: Option<&str>,
        opened_at: usize,
    ) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();

        while let Some(token) = self.next_token() {
            match token {
                Token::Text { text, .. } => statements.push(Statement::Text(text)),

                Token::Output { expr, line } => {
                    let parsed = ArgScanner::parse_single(&expr, line)?;
                    statements.push(Statement::Output(parsed));
                }

                Token::Tag { name, args, line } => {
                    if until == Some(name.as_str()) {
                        return Ok(statements);
                    }

                    match TagName::from_name(&name) {
                        Some(TagName::Init) => statements.push(Statement::Init),
                        Some(TagName::Node) => {
                            statements.push(self.parse_node_tag(TagKind::Node, &args, line)?);
                        }
                        Some(TagName::BlockNode) => {
                            statements.push(self.parse_node_tag(TagKind::BlockNode, &args, line)?);
                        }
                        None => {
                            return Err(DjediError::Parse {
                                line,
                                message: format!("unknown tag '{}'", name),
                            });
                        }
                    }
                }
            }
        }

        match until {
            Some(end) => Err(DjediError::Parse {
                line: opened_at,
                message: format!("missing '{{% {} %}}'", end),
            }),
            None => Ok(statements),
        }
    }

    fn parse_node_tag(&mut self, kind: TagKind, args: &str, line: usize) -> Result<Statement> {
        let mut scanner = ArgScanner::new(args, line);
        let uri = scanner.parse_expression()?;
        let mut params = scanner.parse_params()?;

        let mut body = Vec::new();
        let (default, static_default) = match kind {
            TagKind::Node => {
                let default =
                    pop_param(&mut params, "default").unwrap_or(Expr::Const(Value::Null));
                let static_default = default.as_const().map(Value::to_text);
                (default, static_default)
            }
            TagKind::BlockNode => {
                body = self.parse_statements(Some(END_BLOCK_TAG), line)?;
                match static_body_text(&body) {
                    Some(text) if text.is_empty() => (Expr::Const(Value::Null), Some(String::new())),
                    Some(text) => {
                        let normalized = normalize_block(&text);
                        (
                            Expr::Const(Value::Str(normalized.clone())),
                            Some(normalized),
                        )
                    }
                    // Body contains runtime output, so the default is only
                    // known at render time
                    None => (Expr::Const(Value::Null), None),
                }
            }
        };
        let edit = pop_param(&mut params, "edit").unwrap_or(Expr::Const(Value::Bool(true)));

        // Static occurrences buffer a single creation per identifier; a
        // dynamic uri or default skips buffering entirely.
        let static_uri = uri.as_const().map(Value::to_text);
        let node_ref = match (static_uri, static_default) {
            (Some(uri_text), Some(default_text)) => {
                let id = self.context.buffer(&uri_text, &default_text);
                NodeRef::Lookup(id)
            }
            _ => NodeRef::Uri(uri),
        };

        Ok(Statement::NodeTag(TagInvocation {
            kind,
            node_ref,
            default,
            edit,
            params,
            body,
            line,
        }))
    }
}

/// Remove a reserved parameter, keeping the last occurrence when repeated
fn pop_param(params: &mut Vec<(String, Expr)>, name: &str) -> Option<Expr> {
    let mut found = None;
    while let Some(idx) = params.iter().position(|(key, _)| key == name) {
        found = Some(params.remove(idx).1);
    }
    found
}

/// Concatenated body text when the body is purely literal, None otherwise
fn static_body_text(body: &[Statement]) -> Option<String> {
    let mut text = String::new();
    for statement in body {
        match statement {
            Statement::Text(chunk) => text.push_str(chunk),
            _ => return None,
        }
    }
    Some(text)
}

/// Hand-rolled scanner over a tag's argument text
struct ArgScanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> ArgScanner<'a> {
    fn new(src: &'a str, line: usize) -> Self {
        ArgScanner { src, pos: 0, line }
    }

    /// Parse a lone expression and require nothing to follow it
    fn parse_single(src: &str, line: usize) -> Result<Expr> {
        let mut scanner = ArgScanner::new(src, line);
        let expr = scanner.parse_expression()?;
        scanner.skip_whitespace();
        if !scanner.at_end() {
            return Err(scanner.error("unexpected trailing characters after expression"));
        }
        Ok(expr)
    }

    fn error(&self, message: impl Into<String>) -> DjediError {
        DjediError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}'", expected))),
        }
    }

    /// Parse one expression: a quoted string, an integer, a boolean/none
    /// keyword, or a bare context-variable name
    fn parse_expression(&mut self) -> Result<Expr> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_string(quote)
            }
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_int(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let name = self.parse_name()?;
                Ok(match name.as_str() {
                    "true" => Expr::Const(Value::Bool(true)),
                    "false" => Expr::Const(Value::Bool(false)),
                    "none" => Expr::Const(Value::Null),
                    _ => Expr::Var(name),
                })
            }
            Some(c) => Err(self.error(format!("expected expression, found '{}'", c))),
            None => Err(self.error("expected expression")),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<Expr> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(self.error("unterminated string literal")),
                },
                Some(c) if c == quote => return Ok(Expr::Const(Value::Str(text))),
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    fn parse_int(&mut self) -> Result<Expr> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let digits = &self.src[start..self.pos];
        digits
            .parse::<i64>()
            .map(|n| Expr::Const(Value::Int(n)))
            .map_err(|_| self.error(format!("invalid integer '{}'", digits)))
    }

    fn parse_name(&mut self) -> Result<String> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.bump();
            }
            Some(c) => return Err(self.error(format!("expected name, found '{}'", c))),
            None => return Err(self.error("expected name")),
        }
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        Ok(self.src[start..self.pos].to_string())
    }

    /// Parse the comma-separated name=expression parameters following the
    /// uri expression
    fn parse_params(&mut self) -> Result<Vec<(String, Expr)>> {
        let mut params = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                return Ok(params);
            }
            self.expect(',')?;
            let name = self.parse_name()?;
            self.expect('=')?;
            let value = self.parse_expression()?;
            params.push((name, value));
        }
    }
}
