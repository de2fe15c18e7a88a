//! Page declaration parsing.
//!
//! The `pages` setting accepts three shapes per entry: a bare path, a
//! record of one to three strings, or a single-key mapping from a
//! section title to a nested entry list. [`Declaration::parse`] sniffs
//! those shapes once and produces the tagged [`Declaration`] form the
//! tree builder consumes, so shape handling never leaks into tree
//! construction.

use std::collections::BTreeMap;

use serde::Deserialize;

use mdsite_files::urls;

/// One raw `pages` entry as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PageEntry {
    /// A bare content-file path.
    Path(String),
    /// `[path]`, `[path, title]` or `[path, title, child_title]`.
    Record(Vec<String>),
    /// `{section_title: [entries...]}`.
    Group(BTreeMap<String, Vec<PageEntry>>),
}

/// A parsed page declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A single content file, optionally with an explicit title and,
    /// for record form, a child title placing it inside a section.
    Leaf {
        path: String,
        title: Option<String>,
        child_title: Option<String>,
    },
    /// An explicitly titled section with nested declarations.
    Group {
        title: String,
        children: Vec<Declaration>,
    },
}

/// A `pages` entry that does not match any accepted shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    /// A record entry with other than 1 to 3 strings.
    #[error("pages entry {index} contains {count} items; expected 1, 2 or 3 strings")]
    RecordArity { index: usize, count: usize },
    /// A mapping entry with other than exactly one section title.
    #[error("pages entry {index} must have exactly one section title, found {count}")]
    GroupShape { index: usize, count: usize },
}

impl Declaration {
    /// Parse raw entries into declarations, validating entry shapes.
    ///
    /// Paths are normalized (`.` and redundant separators removed) so
    /// that later registry lookups are exact.
    pub fn parse(entries: &[PageEntry]) -> Result<Vec<Self>, DeclarationError> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self::parse_entry(index, entry))
            .collect()
    }

    fn parse_entry(index: usize, entry: &PageEntry) -> Result<Self, DeclarationError> {
        match entry {
            PageEntry::Path(path) => Ok(Self::leaf(path, None, None)),
            PageEntry::Record(items) => match items.as_slice() {
                [path] => Ok(Self::leaf(path, None, None)),
                [path, title] => Ok(Self::leaf(path, Some(title), None)),
                [path, title, child] => Ok(Self::leaf(path, Some(title), Some(child))),
                _ => Err(DeclarationError::RecordArity {
                    index,
                    count: items.len(),
                }),
            },
            PageEntry::Group(map) => {
                let Some((title, children)) = map.first_key_value() else {
                    return Err(DeclarationError::GroupShape { index, count: 0 });
                };
                if map.len() != 1 {
                    return Err(DeclarationError::GroupShape {
                        index,
                        count: map.len(),
                    });
                }
                Ok(Self::Group {
                    title: title.clone(),
                    children: Self::parse(children)?,
                })
            }
        }
    }

    fn leaf(path: &str, title: Option<&String>, child_title: Option<&String>) -> Self {
        Self::Leaf {
            path: urls::normalize(path),
            title: title.cloned(),
            child_title: child_title.cloned(),
        }
    }
}

/// All leaf content paths in declaration order.
///
/// This is the order pages are registered, rendered and chained in.
#[must_use]
pub fn leaf_paths(declarations: &[Declaration]) -> Vec<&str> {
    fn collect<'d>(declarations: &'d [Declaration], out: &mut Vec<&'d str>) {
        for declaration in declarations {
            match declaration {
                Declaration::Leaf { path, .. } => out.push(path),
                Declaration::Group { children, .. } => collect(children, out),
            }
        }
    }

    let mut out = Vec::new();
    collect(declarations, &mut out);
    out
}
