//! Navigation tree, page declarations and title resolution for mdsite.
//!
//! This crate provides:
//! - [`Declaration`]: parsed `pages` configuration entries
//! - [`NavTree`]: the page/section hierarchy with prev/next links and
//!   the active-path cursor for sequential walks
//! - [`meta::extract`]: YAML front matter extraction
//! - [`declarations_from_paths`]: navigation derived from a directory
//!   listing when no `pages` setting exists
//!
//! # Quick Start
//!
//! ```
//! use mdsite_files::Files;
//! use mdsite_nav::{Declaration, NavTree};
//!
//! let mut files = Files::new(true);
//! files.register("index.md").unwrap();
//! files.register("guide/config.md").unwrap();
//!
//! let declarations = vec![
//!     Declaration::Leaf {
//!         path: "index.md".to_owned(),
//!         title: None,
//!         child_title: None,
//!     },
//!     Declaration::Leaf {
//!         path: "guide/config.md".to_owned(),
//!         title: None,
//!         child_title: None,
//!     },
//! ];
//! let tree = NavTree::build(&declarations, &files).unwrap();
//! assert_eq!(tree.page_count(), 2);
//! assert_eq!(tree.page(1).title(), "Config");
//! ```

pub(crate) mod declaration;
pub(crate) mod discover;
pub mod meta;
pub(crate) mod title;
pub(crate) mod tree;

pub use declaration::{Declaration, DeclarationError, PageEntry, leaf_paths};
pub use discover::declarations_from_paths;
pub use meta::Meta;
pub use title::title_from_name;
pub use tree::{NavItem, NavTree, Page, Section, UnregisteredFile};

// Re-export TocEntry from mdsite-render for convenience
pub use mdsite_render::TocEntry;
