//! Template scanning use case
//!
//! Walks a directory of templates and reports every node reference, so
//! content editors can see which uris a project depends on.

use crate::domain::node::NodeId;
use crate::domain::template::{filter_stream, Expr, Lexer, NodeRef, Parser, Statement, Template};
use crate::error::{DjediError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options for scanning
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory to walk
    pub dir: PathBuf,

    /// Template file extension to scan
    pub extension: String,
}

/// A node reference found in a template
#[derive(Debug, Clone, PartialEq)]
pub enum NodeReference {
    /// Static occurrence, one per lookup-table entry
    Static {
        uri: String,
        default: String,
        id: NodeId,
    },
    /// Dynamic occurrence resolved only at render time
    Dynamic { expr: String, line: usize },
}

/// All node references of one template file
#[derive(Debug, Clone)]
pub struct TemplateReport {
    pub template: PathBuf,
    pub nodes: Vec<NodeReference>,
}

/// Service for scanning template directories
pub struct ScanTemplatesService;

impl ScanTemplatesService {
    /// Execute the scan
    ///
    /// Reports are sorted by template path; static entries come in
    /// first-occurrence order followed by dynamic occurrences in document
    /// order.
    pub fn execute(options: ScanOptions) -> Result<Vec<TemplateReport>> {
        let mut paths: Vec<PathBuf> = WalkDir::new(&options.dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == options.extension)
            })
            .collect();
        paths.sort();

        let mut reports = Vec::new();
        for path in paths {
            let source = fs::read_to_string(&path)?;
            let template = parse_source(&source, &path)?;

            let mut nodes: Vec<NodeReference> = template
                .pending
                .iter()
                .map(|entry| NodeReference::Static {
                    uri: entry.uri.clone(),
                    default: entry.default.clone(),
                    id: entry.id.clone(),
                })
                .collect();
            collect_dynamic(&template.statements, &mut nodes);

            reports.push(TemplateReport {
                template: path,
                nodes,
            });
        }

        Ok(reports)
    }
}

fn parse_source(source: &str, path: &Path) -> Result<Template> {
    let tokens = filter_stream(Lexer::tokenize(source).map_err(|e| with_file(e, path))?);
    Parser::parse(tokens).map_err(|e| with_file(e, path))
}

/// Prefix parse errors with the offending template path
fn with_file(err: DjediError, path: &Path) -> DjediError {
    match err {
        DjediError::Parse { line, message } => DjediError::Parse {
            line,
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    }
}

/// Collect dynamic occurrences, descending into block bodies
fn collect_dynamic(statements: &[Statement], out: &mut Vec<NodeReference>) {
    for statement in statements {
        if let Statement::NodeTag(invocation) = statement {
            if let NodeRef::Uri(expr) = &invocation.node_ref {
                out.push(NodeReference::Dynamic {
                    expr: describe_expr(expr),
                    line: invocation.line,
                });
            }
            collect_dynamic(&invocation.body, out);
        }
    }
}

fn describe_expr(expr: &Expr) -> String {
    match expr {
        Expr::Var(name) => name.clone(),
        Expr::Const(value) => format!("\"{}\"", value.to_text()),
    }
}
