//! Table-of-contents entries and heading id generation.

use std::collections::HashMap;

/// A heading collected from a page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level, 1-6.
    pub level: u8,
    /// Flattened heading text.
    pub title: String,
    /// The id attribute assigned to the heading element.
    pub id: String,
}

/// Assigns unique slug ids to headings within one page.
///
/// Repeated headings get `-1`, `-2`, … suffixes so ids stay unique.
#[derive(Debug, Default)]
pub(crate) struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        match self.seen.get_mut(&base) {
            Some(count) => {
                *count += 1;
                let slug = format!("{base}-{count}");
                self.seen.insert(slug.clone(), 0);
                slug
            }
            None => {
                self.seen.insert(base.clone(), 0);
                base
            }
        }
    }
}

/// Lowercase the text and collapse non-alphanumeric runs into single `-`.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "section".to_owned()
    } else {
        slug
    }
}
