//! Error types for djedi

use thiserror::Error;

/// Main error type for the djedi template engine
#[derive(Debug, Error)]
pub enum DjediError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl DjediError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DjediError::Parse { .. } => 2,
            DjediError::Render(_) => 3,
            DjediError::Config(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            DjediError::Parse { line, message } => {
                format!(
                    "Parse error at line {}: {}\n\n\
                    Tag syntax:\n\
                    • {{% node \"page/title\" [, default=expr] [, edit=expr] [, name=expr ...] %}}\n\
                    • {{% blocknode \"page/body\" %}} ...default... {{% endblocknode %}}\n\
                    • Parameters are comma-separated name=value pairs\n\
                    • String values need quotes; bare names are context variables",
                    line, message
                )
            }
            DjediError::Config(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Content files are TOML with a [nodes] table of uri = \"content\" entries\n\
                    • Pass one with --content <file> or set it in djedi.toml\n\
                    • Context variables are passed as --var key=value",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using DjediError
pub type Result<T> = std::result::Result<T, DjediError>;
