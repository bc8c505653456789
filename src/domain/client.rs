//! Content lookup seam

use crate::domain::node::{ContentNode, NodeUri};
use crate::error::Result;

/// Content-lookup service the engine resolves nodes through.
///
/// `lazy` signals that the caller does not need the content until output
/// time, so a backend may defer its IO. The in-memory client resolves
/// immediately since its lookups are free.
pub trait ContentClient {
    fn get(&self, uri: &NodeUri, default: &str, lazy: bool) -> Result<ContentNode>;
}
