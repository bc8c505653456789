//! Template rendering against a variable context and a content client

use super::normalize_block;
use super::parser::{Expr, NodeRef, Statement, TagInvocation, TagKind, Template, Value};
use crate::domain::client::ContentClient;
use crate::domain::node::{ContentNode, NodeId, NodeUri};
use crate::domain::render::{escape_html, render_node};
use crate::error::{DjediError, Result};
use std::collections::HashMap;

/// Runtime variables a template is rendered against
pub type Context = HashMap<String, Value>;

/// One render pass over a parsed template.
///
/// The node lookup table lives inside the renderer and is discarded with
/// it; nothing is shared across render passes.
pub struct Renderer<'a> {
    client: &'a dyn ContentClient,
    context: &'a Context,
    /// Globally disables editor affordances regardless of per-tag edit flags
    edit_enabled: bool,
    table: Option<HashMap<NodeId, ContentNode>>,
}

impl<'a> Renderer<'a> {
    pub fn new(client: &'a dyn ContentClient, context: &'a Context) -> Self {
        Renderer {
            client,
            context,
            edit_enabled: true,
            table: None,
        }
    }

    /// Turn editor affordances off for the whole pass
    pub fn without_edit(mut self) -> Self {
        self.edit_enabled = false;
        self
    }

    /// Render a parsed template to output markup
    pub fn render(mut self, template: &Template) -> Result<String> {
        let mut output = String::new();
        self.render_statements(&template.statements, template, &mut output)?;
        Ok(output)
    }

    fn render_statements(
        &mut self,
        statements: &[Statement],
        template: &Template,
        output: &mut String,
    ) -> Result<()> {
        for statement in statements {
            match statement {
                Statement::Text(text) => output.push_str(text),

                Statement::Output(expr) => {
                    output.push_str(&escape_html(&self.eval(expr).to_text()));
                }

                Statement::Init => self.init_table(template)?,

                Statement::NodeTag(invocation) => {
                    let markup = self.render_node_tag(invocation, template)?;
                    output.push_str(&markup);
                }
            }
        }
        Ok(())
    }

    /// Build the lookup table: exactly one client call per buffered entry
    fn init_table(&mut self, template: &Template) -> Result<()> {
        let mut table = HashMap::with_capacity(template.pending.len());
        for entry in &template.pending {
            let node = self
                .client
                .get(&NodeUri::new(&entry.uri), &entry.default, true)?;
            table.insert(entry.id.clone(), node);
        }
        self.table = Some(table);
        Ok(())
    }

    fn eval(&self, expr: &Expr) -> Value {
        match expr {
            Expr::Const(value) => value.clone(),
            // Unbound variables render empty and are falsy
            Expr::Var(name) => self.context.get(name).cloned().unwrap_or(Value::Null),
        }
    }

    fn render_node_tag(
        &mut self,
        invocation: &TagInvocation,
        template: &Template,
    ) -> Result<String> {
        // The block form takes its default from the body rendered at
        // runtime, so embedded expressions are evaluated first
        let default = match invocation.kind {
            TagKind::BlockNode => {
                let mut body = String::new();
                self.render_statements(&invocation.body, template, &mut body)?;
                normalize_block(&body)
            }
            TagKind::Node => self.eval(&invocation.default).to_text(),
        };

        let node = match &invocation.node_ref {
            NodeRef::Lookup(id) => self
                .table
                .as_ref()
                .and_then(|table| table.get(id))
                .cloned()
                .ok_or_else(|| {
                    DjediError::Render(format!(
                        "node lookup table has no entry for the tag at line {}",
                        invocation.line
                    ))
                })?,
            NodeRef::Uri(expr) => {
                let uri = NodeUri::new(self.eval(expr).to_text());
                self.client.get(&uri, &default, false)?
            }
        };

        let edit = self.edit_enabled && self.eval(&invocation.edit).is_truthy();
        let params: Vec<(String, String)> = invocation
            .params
            .iter()
            .map(|(key, expr)| (key.clone(), self.eval(expr).to_text()))
            .collect();

        Ok(render_node(&node, edit, &params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::lexer::{filter_stream, Lexer};
    use crate::domain::template::parser::Parser;
    use std::cell::RefCell;

    /// Counting stub over a fixed node map
    struct StubClient {
        nodes: HashMap<String, String>,
        calls: RefCell<Vec<(String, String, bool)>>,
    }

    impl StubClient {
        fn new(entries: &[(&str, &str)]) -> Self {
            StubClient {
                nodes: entries
                    .iter()
                    .map(|(uri, content)| (uri.to_string(), content.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            StubClient::new(&[])
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ContentClient for StubClient {
        fn get(&self, uri: &NodeUri, default: &str, lazy: bool) -> Result<ContentNode> {
            self.calls
                .borrow_mut()
                .push((uri.as_str().to_string(), default.to_string(), lazy));
            Ok(ContentNode::new(
                uri.clone(),
                self.nodes.get(uri.as_str()).cloned(),
                default,
            ))
        }
    }

    fn render_with(source: &str, client: &StubClient, context: Context) -> String {
        let tokens = filter_stream(Lexer::tokenize(source).unwrap());
        let template = Parser::parse(tokens).unwrap();
        Renderer::new(client, &context)
            .render(&template)
            .unwrap()
    }

    fn render(source: &str, client: &StubClient) -> String {
        render_with(source, client, Context::new())
    }

    #[test]
    fn test_render_plain_text() {
        let client = StubClient::empty();
        assert_eq!(render("hello world", &client), "hello world");
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_render_static_node_from_table() {
        let client = StubClient::new(&[("page/title", "Stored title")]);
        let output = render(r#"{% node "page/title", edit=false %}"#, &client);

        assert_eq!(output, "Stored title");
        // One lazy fetch at table construction, nothing at tag render
        assert_eq!(
            *client.calls.borrow(),
            vec![("page/title".to_string(), "".to_string(), true)]
        );
    }

    #[test]
    fn test_duplicate_static_tags_fetch_once() {
        let client = StubClient::new(&[("page/title", "T")]);
        let output = render(
            r#"{% node "page/title", edit=false %} / {% node "page/title", edit=false %}"#,
            &client,
        );

        assert_eq!(output, "T / T");
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn test_unresolved_node_renders_default() {
        let client = StubClient::empty();
        let output = render(r#"{% node "page/title", default="Welcome", edit=false %}"#, &client);
        assert_eq!(output, "Welcome");
    }

    #[test]
    fn test_bare_node_fetches_empty_default_with_edit() {
        let client = StubClient::empty();
        let output = render(r#"{% node "x.title" %}"#, &client);

        // Empty default, edit enabled by default
        assert_eq!(
            *client.calls.borrow(),
            vec![("x.title".to_string(), "".to_string(), true)]
        );
        assert_eq!(output, r#"<span data-node-uri="x.title"></span>"#);
    }

    #[test]
    fn test_dynamic_uri_resolves_at_render_time() {
        let client = StubClient::new(&[("page/intro", "Intro")]);
        let mut context = Context::new();
        context.insert("uri".to_string(), Value::Str("page/intro".to_string()));

        let output = render_with(
            r#"{% node uri, default="d", edit=false %}"#,
            &client,
            context,
        );

        assert_eq!(output, "Intro");
        // Non-lazy fetch, no table entry involved
        assert_eq!(
            *client.calls.borrow(),
            vec![("page/intro".to_string(), "d".to_string(), false)]
        );
    }

    #[test]
    fn test_blocknode_body_is_runtime_default() {
        let client = StubClient::empty();
        let mut context = Context::new();
        context.insert("name".to_string(), Value::Str("Alice".to_string()));

        let output = render_with(
            "{% blocknode \"page/greeting\", edit=false %}\n    Hi {{ name }}\n{% endblocknode %}",
            &client,
            context,
        );

        assert_eq!(output, "Hi Alice");
        assert_eq!(
            *client.calls.borrow(),
            vec![("page/greeting".to_string(), "Hi Alice".to_string(), false)]
        );
    }

    #[test]
    fn test_static_blocknode_uses_table() {
        let client = StubClient::empty();
        let output = render(
            "{% blocknode \"page/body\", edit=false %}\n    Hello\n    World\n{% endblocknode %}",
            &client,
        );

        assert_eq!(output, "Hello\nWorld");
        assert_eq!(client.call_count(), 1);
        assert!(client.calls.borrow()[0].2, "table entries resolve lazily");
    }

    #[test]
    fn test_blocknode_empty_body() {
        let client = StubClient::empty();
        let output = render(r#"{% blocknode "page/body", edit=false %}{% endblocknode %}"#, &client);
        assert_eq!(output, "");
    }

    #[test]
    fn test_output_is_escaped_node_markup_is_not() {
        let client = StubClient::new(&[("x", "<b>bold</b>")]);
        let mut context = Context::new();
        context.insert("var".to_string(), Value::Str("<i>".to_string()));

        let output = render_with(
            r#"{{ var }}{% node "x", edit=false %}"#,
            &client,
            context,
        );

        assert_eq!(output, "&lt;i&gt;<b>bold</b>");
    }

    #[test]
    fn test_edit_wraps_markup() {
        let client = StubClient::new(&[("x", "v")]);
        let output = render(r#"{% node "x" %}"#, &client);
        assert_eq!(output, r#"<span data-node-uri="x">v</span>"#);
    }

    #[test]
    fn test_edit_flag_from_context() {
        let client = StubClient::new(&[("x", "v")]);
        let mut context = Context::new();
        context.insert("editable".to_string(), Value::Bool(false));

        let output = render_with(r#"{% node "x", edit=editable %}"#, &client, context);
        assert_eq!(output, "v");
    }

    #[test]
    fn test_unbound_edit_variable_is_falsy() {
        let client = StubClient::new(&[("x", "v")]);
        let output = render(r#"{% node "x", edit=missing %}"#, &client);
        assert_eq!(output, "v");
    }

    #[test]
    fn test_without_edit_overrides_tags() {
        let client = StubClient::new(&[("x", "v")]);
        let tokens = filter_stream(Lexer::tokenize(r#"{% node "x", edit=true %}"#).unwrap());
        let template = Parser::parse(tokens).unwrap();
        let context = Context::new();

        let output = Renderer::new(&client, &context)
            .without_edit()
            .render(&template)
            .unwrap();
        assert_eq!(output, "v");
    }

    #[test]
    fn test_params_reach_the_render_helper() {
        let client = StubClient::new(&[("x", "Hi {name}")]);
        let output = render(r#"{% node "x", edit=false, name="Bob" %}"#, &client);
        assert_eq!(output, "Hi Bob");
    }

    #[test]
    fn test_unbound_output_variable_renders_empty() {
        let client = StubClient::empty();
        assert_eq!(render("a{{ missing }}b", &client), "ab");
    }

    #[test]
    fn test_lookup_without_init_statement_fails() {
        // Bypass the stream filter so no init statement exists
        let tokens = Lexer::tokenize(r#"{% node "x" %}"#).unwrap();
        let template = Parser::parse(tokens).unwrap();
        let client = StubClient::empty();
        let context = Context::new();

        let err = Renderer::new(&client, &context)
            .render(&template)
            .unwrap_err();
        assert!(matches!(err, DjediError::Render(_)));
    }

    #[test]
    fn test_markdown_node_renders_html() {
        let client = StubClient::new(&[("page/body.md", "# Heading")]);
        let output = render(r#"{% node "page/body.md", edit=false %}"#, &client);
        assert_eq!(output, "<h1>Heading</h1>");
    }
}
