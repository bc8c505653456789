//! djedi - CMS content-node tags for templates
//!
//! A small template engine that resolves `{% node %}` and `{% blocknode %}`
//! tags through a content-lookup client and renders the resolved values,
//! optionally wrapped with editor affordances.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::DjediError;
