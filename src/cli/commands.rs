//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "djedi")]
#[command(about = "CMS content-node tags for templates", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a template file
    Render {
        /// Template file to render
        template: PathBuf,

        /// Content file (TOML [nodes] table)
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Context variable (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Config file (default: djedi.toml next to the template)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable editor affordances
        #[arg(long)]
        no_edit: bool,
    },

    /// List node references in a directory of templates
    Scan {
        /// Directory to walk (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Template file extension to scan
        #[arg(long, default_value = "html")]
        ext: String,
    },
}
