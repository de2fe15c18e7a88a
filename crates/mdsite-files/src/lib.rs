//! Source file registry and URL path algebra.
//!
//! This crate owns two of the site engine's coordinate spaces: source
//! paths (where content lives under the docs directory) and
//! site-relative URLs (where it ends up in the built site). [`Files`]
//! maps the former to the latter under either URL convention, and
//! [`urls`] computes page-relative URLs between any two points without
//! ever touching the host filesystem.

pub(crate) mod files;
pub mod urls;

pub use files::{ConflictError, Files, MARKDOWN_EXTENSIONS, SourceFile, is_markdown_file};
