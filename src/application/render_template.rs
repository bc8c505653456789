//! Template rendering use case
//!
//! Orchestrates the full workflow of rendering a template file against a
//! content store and a variable context.

use crate::domain::template::{filter_stream, Context, Lexer, Parser, Renderer, Value};
use crate::error::Result;
use crate::infrastructure::{Config, InMemoryClient};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Template file to render
    pub template: PathBuf,

    /// Content file (overrides the configured one)
    pub content: Option<PathBuf>,

    /// Context variables
    pub vars: Vec<(String, String)>,

    /// Explicit config file (default: djedi.toml next to the template)
    pub config: Option<PathBuf>,

    /// Force editor affordances off
    pub no_edit: bool,
}

/// Service for rendering template files
pub struct RenderTemplateService;

impl RenderTemplateService {
    /// Execute the render
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template or content file cannot be read
    /// - The template fails to parse
    /// - Content resolution fails
    pub fn execute(options: RenderOptions) -> Result<String> {
        let template_dir = options
            .template
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        // 1. Load config (explicit file, or djedi.toml next to the template)
        let config = match &options.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::load_or_default(&template_dir)?,
        };

        // 2. Build the content client
        let client = match &options.content {
            Some(path) => InMemoryClient::load_from_file(path)?,
            None => match &config.content {
                Some(path) => {
                    // A relative configured path is anchored at the template
                    let resolved = if path.is_absolute() {
                        path.clone()
                    } else {
                        template_dir.join(path)
                    };
                    InMemoryClient::load_from_file(&resolved)?
                }
                None => InMemoryClient::new(),
            },
        };

        // 3. Lex and parse the template
        let source = fs::read_to_string(&options.template)?;
        let tokens = filter_stream(Lexer::tokenize(&source)?);
        let template = Parser::parse(tokens)?;

        // 4. Build the variable context
        let mut context = Context::new();
        for (key, value) in options.vars {
            context.insert(key, Value::Str(value));
        }

        // 5. Render
        let mut renderer = Renderer::new(&client, &context);
        if options.no_edit || !config.edit {
            renderer = renderer.without_edit();
        }
        renderer.render(&template)
    }
}
