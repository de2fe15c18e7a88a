//! Markdown-to-HTML conversion pipeline.
//!
//! Conversion itself is delegated to pulldown-cmark; this module owns
//! the event-stream passes between parsing and HTML emission: link
//! rewriting, heading id assignment, table-of-contents collection, and
//! capture of the first H1 for title resolution. The H1 is taken from
//! the converted stream rather than a pre-scan so it reflects exactly
//! what was rendered, with inline formatting flattened to plain text.

use mdsite_files::{Files, SourceFile};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::rewrite::{UnresolvedLink, rewrite_links};
use crate::toc::{Slugger, TocEntry};
use crate::util::heading_level_to_num;

/// Output of converting one page's Markdown body.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// The converted HTML.
    pub html: String,
    /// Flattened text of the first H1, if any.
    pub title: Option<String>,
    /// All headings in document order.
    pub toc: Vec<TocEntry>,
    /// Relative links that could not be resolved.
    pub unresolved: Vec<UnresolvedLink>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Convert a page's Markdown body (front matter already stripped).
///
/// `page` anchors relative-link resolution; `files` is the registry the
/// targets are validated against.
#[must_use]
pub fn convert(markdown: &str, page: &SourceFile, files: &Files) -> Rendered {
    let events: Vec<Event<'_>> = Parser::new_ext(markdown, parser_options()).collect();
    let (events, unresolved) = rewrite_links(events, page, files);
    let (events, title, toc) = assign_heading_ids(events);

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    Rendered {
        html: out,
        title,
        toc,
        unresolved,
    }
}

/// Give every heading a slug id, collecting the toc and the first H1.
fn assign_heading_ids(
    mut events: Vec<Event<'_>>,
) -> (Vec<Event<'_>>, Option<String>, Vec<TocEntry>) {
    let mut slugger = Slugger::new();
    let mut toc = Vec::new();
    let mut title: Option<String> = None;

    let mut idx = 0;
    while idx < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = events[idx] else {
            idx += 1;
            continue;
        };
        let level = heading_level_to_num(level);

        // Flatten the heading's inline content to plain text.
        let mut text = String::new();
        let mut end = idx + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        let slug = slugger.slug(&text);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[idx] {
            *id = Some(CowStr::from(slug.clone()));
        }
        if level == 1 && title.is_none() && !text.is_empty() {
            title = Some(text.clone());
        }
        toc.push(TocEntry {
            level,
            title: text,
            id: slug,
        });
        idx = end;
    }

    (events, title, toc)
}
