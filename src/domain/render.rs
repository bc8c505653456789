//! Node markup rendering

use crate::domain::client::ContentClient;
use crate::domain::node::{ContentNode, NodeUri};
use crate::error::Result;
use pulldown_cmark::{html, Parser as MdParser};

/// Render a resolved node to markup.
///
/// Substitutes `{key}` placeholders from the context mapping into the node
/// value, renders markdown-flavored nodes (uri extension `md`) to HTML, and
/// wraps the result in an editor span when edit mode is on. The returned
/// markup is final output and must not be escaped again.
pub fn render_node(node: &ContentNode, edit: bool, context: &[(String, String)]) -> String {
    let mut content = node.value().to_string();
    for (key, value) in context {
        content = content.replace(&format!("{{{}}}", key), value);
    }

    let rendered = match node.uri().extension() {
        Some("md") => markdown_to_html(&content),
        _ => content,
    };

    if edit {
        format!(
            r#"<span data-node-uri="{}">{}</span>"#,
            escape_attr(node.uri().as_str()),
            rendered
        )
    } else {
        rendered
    }
}

/// Render a node directly, outside any template tag machinery.
///
/// Performs an eager (non-lazy) fetch and returns the rendered markup.
pub fn node(
    client: &dyn ContentClient,
    uri: &str,
    default: Option<&str>,
    edit: bool,
    context: &[(String, String)],
) -> Result<String> {
    let node = client.get(&NodeUri::new(uri), default.unwrap_or(""), false)?;
    Ok(render_node(&node, edit, context))
}

fn markdown_to_html(content: &str) -> String {
    let parser = MdParser::new(content);
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);
    rendered.trim_end().to_string()
}

/// Escape text for HTML body output
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}
