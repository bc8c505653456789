//! Content node domain types

use sha2::{Digest, Sha256};
use std::fmt;

/// Content identifier: lowercase hex SHA-256 digest over uri and default text
pub type NodeId = String;

/// Compute the content identifier for a (uri, default) pair.
///
/// Pure function of its inputs: the same pair always hashes to the same
/// identifier, across renders and processes.
pub fn node_id(uri: &str, default: &str) -> NodeId {
    let mut hasher = Sha256::new();
    hasher.update(uri.as_bytes());
    hasher.update(default.as_bytes());
    hex::encode(hasher.finalize())
}

/// Uri-like path identifying a content node (e.g. "page/title.md")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeUri(String);

impl NodeUri {
    pub fn new(uri: impl Into<String>) -> Self {
        NodeUri(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension of the final path segment, ignoring any #fragment suffix.
    ///
    /// Selects the render format: "md" nodes go through the markdown
    /// renderer, everything else is emitted as-is.
    pub fn extension(&self) -> Option<&str> {
        let segment = self.0.rsplit('/').next().unwrap_or(&self.0);
        let segment = segment.split('#').next().unwrap_or(segment);
        match segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

impl fmt::Display for NodeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeUri {
    fn from(uri: &str) -> Self {
        NodeUri::new(uri)
    }
}

/// A resolved content node: uri plus store content, falling back to its
/// default when the store has no entry
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    uri: NodeUri,
    content: Option<String>,
    default: String,
}

impl ContentNode {
    pub fn new(uri: NodeUri, content: Option<String>, default: impl Into<String>) -> Self {
        ContentNode {
            uri,
            content,
            default: default.into(),
        }
    }

    pub fn uri(&self) -> &NodeUri {
        &self.uri
    }

    /// The value to render: store content if present, otherwise the default
    pub fn value(&self) -> &str {
        self.content.as_deref().unwrap_or(&self.default)
    }

    /// Whether the store had content for this uri
    pub fn is_resolved(&self) -> bool {
        self.content.is_some()
    }
}
