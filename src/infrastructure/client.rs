//! Content store backends

use crate::domain::client::ContentClient;
use crate::domain::node::{ContentNode, NodeUri};
use crate::error::{DjediError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// TOML shape of a content file: a [nodes] table of uri = "content"
#[derive(Debug, Deserialize)]
struct ContentFile {
    #[serde(default)]
    nodes: HashMap<String, String>,
}

/// Map-backed content store for the CLI and tests.
///
/// Caching, persistence and concurrency belong to real backends; this one
/// is a plain lookup and ignores the lazy flag because its fetches are
/// free.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClient {
    nodes: HashMap<String, String>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        InMemoryClient::default()
    }

    /// Load a [nodes] table from a TOML content file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DjediError::Config(format!("Content file not found: {}", path.display()))
            } else {
                DjediError::Io(e)
            }
        })?;

        let file: ContentFile = toml::from_str(&contents)
            .map_err(|e| DjediError::Config(format!("Failed to parse content file: {}", e)))?;

        Ok(InMemoryClient { nodes: file.nodes })
    }

    pub fn insert(&mut self, uri: impl Into<String>, content: impl Into<String>) {
        self.nodes.insert(uri.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ContentClient for InMemoryClient {
    fn get(&self, uri: &NodeUri, default: &str, _lazy: bool) -> Result<ContentNode> {
        Ok(ContentNode::new(
            uri.clone(),
            self.nodes.get(uri.as_str()).cloned(),
            default,
        ))
    }
}
