//! Markdown rendering for mdsite.
//!
//! This crate turns one page's Markdown body into HTML while resolving
//! cross-page links against the site's file registry.
//!
//! # Architecture
//!
//! Rendering is a pipeline over pulldown-cmark's event stream:
//! - [`rewrite_links`]: maps source-relative link targets (`../guide.md`)
//!   to page-relative URLs, collecting an [`UnresolvedLink`] for every
//!   target that is not a registered file
//! - heading pass: assigns slug ids, builds the table of contents and
//!   captures the first H1 as the page title
//!
//! [`convert`] runs the whole pipeline and returns a [`Rendered`].
//!
//! # Example
//!
//! ```
//! use mdsite_files::Files;
//! use mdsite_render::convert;
//!
//! let mut files = Files::new(true);
//! let page = files.register("index.md").unwrap().clone();
//! let rendered = convert("# Hello\n\n**Bold** text", &page, &files);
//! assert_eq!(rendered.title.as_deref(), Some("Hello"));
//! ```

mod convert;
mod rewrite;
mod toc;
mod util;

pub use convert::{Rendered, convert};
pub use rewrite::{UnresolvedLink, rewrite_links};
pub use toc::TocEntry;
pub use util::escape_html;
