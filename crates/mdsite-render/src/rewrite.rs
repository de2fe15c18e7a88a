//! Relative-link rewriting against the file registry.
//!
//! Markdown authors link between pages by source path
//! (`[config](../guide/config.md)`); the built site needs URLs. After
//! parsing, every anchor and image target that looks like a relative
//! file reference is resolved against the registry and replaced with
//! the page-relative URL of its destination. Targets that cannot be
//! resolved are left exactly as written and reported, never dropped.

use std::fmt;

use mdsite_files::{Files, SourceFile, urls};
use percent_encoding::percent_decode_str;
use pulldown_cmark::{CowStr, Event, Tag};

/// A relative link whose target is not a registered file.
///
/// Collected per page; formatting one of these yields the
/// `<source page> -> <target>` report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    /// Source path of the page containing the link.
    pub page: String,
    /// The link target exactly as written.
    pub target: String,
}

impl fmt::Display for UnresolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.page, self.target)
    }
}

/// Rewrite anchor and image targets in a parsed event stream.
///
/// `page` is the file the events were parsed from; its source directory
/// anchors relative targets and its URL is the baseline for the
/// rewritten links. Unresolvable targets stay byte-for-byte unchanged
/// and are returned alongside the stream.
pub fn rewrite_links<'a>(
    events: Vec<Event<'a>>,
    page: &SourceFile,
    files: &Files,
) -> (Vec<Event<'a>>, Vec<UnresolvedLink>) {
    let mut unresolved = Vec::new();
    let events = events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: rewrite_target(dest_url, page, files, &mut unresolved),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: rewrite_target(dest_url, page, files, &mut unresolved),
                title,
                id,
            }),
            other => other,
        })
        .collect();
    (events, unresolved)
}

fn rewrite_target<'a>(
    dest: CowStr<'a>,
    page: &SourceFile,
    files: &Files,
    unresolved: &mut Vec<UnresolvedLink>,
) -> CowStr<'a> {
    let (path, suffix) = split_path_suffix(&dest);
    if !is_eligible(path) {
        return dest;
    }

    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let resolved = urls::resolve(urls::dirname(&page.src_path), &decoded);
    match files.lookup(&resolved) {
        Some(file) => {
            let relative = file.url_relative_to(page);
            CowStr::from(format!("{relative}{suffix}"))
        }
        None => {
            tracing::warn!(
                page = %page.src_path,
                target = %dest,
                "Relative link target not found among the documentation files"
            );
            unresolved.push(UnresolvedLink {
                page: page.src_path.clone(),
                target: dest.to_string(),
            });
            dest
        }
    }
}

/// Whether a target looks like a relative file reference.
///
/// Scheme-qualified links, protocol-relative links, absolute paths,
/// bare anchors, and targets whose final segment has no extension dot
/// are all passed through untouched.
fn is_eligible(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    if has_scheme(path) {
        return false;
    }
    let last = path.rsplit('/').next().unwrap_or(path);
    last.contains('.')
}

fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split off a trailing query string and/or fragment.
fn split_path_suffix(target: &str) -> (&str, &str) {
    match target.find(['?', '#']) {
        Some(idx) => target.split_at(idx),
        None => (target, ""),
    }
}
