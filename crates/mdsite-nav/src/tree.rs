//! Navigation tree construction and traversal state.
//!
//! Provides the ordered page/section hierarchy built from parsed
//! declarations, with prev/next chaining and the active-path cursor
//! used while walking pages in render order.
//!
//! # Architecture
//!
//! Pages and sections are stored in flat arenas addressed by index;
//! tree shape lives in [`NavItem`] child lists. A page carries its
//! ancestor section chain as an immutable index list computed at build
//! time, so activating a page never follows parent pointers: the
//! cursor move in [`NavTree::set_current`] deactivates the old chain
//! and activates the new one, keeping exactly one root-to-leaf path
//! active during a sequential walk.

use std::collections::HashMap;

use mdsite_files::{Files, SourceFile};
use mdsite_render::{Rendered, TocEntry};

use crate::declaration::Declaration;
use crate::meta::Meta;
use crate::title;

/// Reference to a node in the tree's arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    /// Index into the page arena.
    Page(usize),
    /// Index into the section arena.
    Section(usize),
}

/// A renderable page at its position in the navigation.
#[derive(Debug, Clone)]
pub struct Page {
    file: SourceFile,
    declared_title: Option<String>,
    meta_title: Option<String>,
    heading_title: Option<String>,
    ancestors: Vec<usize>,
    previous: Option<usize>,
    next: Option<usize>,
    active: bool,
    markdown: String,
    content: String,
    meta: Meta,
    toc: Vec<TocEntry>,
}

impl Page {
    fn new(file: SourceFile, declared_title: Option<String>, ancestors: Vec<usize>) -> Self {
        Self {
            file,
            declared_title,
            meta_title: None,
            heading_title: None,
            ancestors,
            previous: None,
            next: None,
            active: false,
            markdown: String::new(),
            content: String::new(),
            meta: Meta::new(),
            toc: Vec::new(),
        }
    }

    /// The registered source file backing this page.
    #[must_use]
    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    /// Resolve the page title.
    ///
    /// Priority: declaration title, front matter `title` key, first H1
    /// of the rendered content, `Home` for the site home page, then a
    /// title derived from the filename. The first three become known
    /// progressively, so the result may upgrade once the page source
    /// and rendered content are attached.
    #[must_use]
    pub fn title(&self) -> String {
        if let Some(declared) = &self.declared_title {
            return declared.clone();
        }
        if let Some(from_meta) = &self.meta_title {
            return from_meta.clone();
        }
        if let Some(heading) = &self.heading_title {
            return heading.clone();
        }
        if self.file.is_home() {
            return "Home".to_owned();
        }
        title::title_from_name(&self.file.name)
    }

    /// Ancestor section indices, root first.
    #[must_use]
    pub fn ancestors(&self) -> &[usize] {
        &self.ancestors
    }

    /// Index of the enclosing section, if the page is nested.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.ancestors.last().copied()
    }

    /// Index of the previous page in traversal order.
    #[must_use]
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Index of the next page in traversal order.
    #[must_use]
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    /// Whether this page is the current traversal cursor.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Raw Markdown body, front matter removed.
    #[must_use]
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Rendered HTML content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Front matter metadata.
    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Table of contents of the rendered content.
    #[must_use]
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }
}

/// A navigation grouping node. Sections never render to a file.
#[derive(Debug, Clone)]
pub struct Section {
    title: String,
    children: Vec<NavItem>,
    active: bool,
}

impl Section {
    fn new(title: String) -> Self {
        Self {
            title,
            children: Vec::new(),
            active: false,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Child nodes in declaration order.
    #[must_use]
    pub fn children(&self) -> &[NavItem] {
        &self.children
    }

    /// Whether any descendant page is the current cursor.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// A page path that was never registered with the file registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("page '{0}' is not a registered content file")]
pub struct UnregisteredFile(pub String);

/// The site navigation tree.
///
/// Top-level order and nesting mirror the declarations; the page arena
/// holds every page in traversal order, which drives prev/next links
/// and full-site iteration.
#[derive(Debug, Clone)]
pub struct NavTree {
    items: Vec<NavItem>,
    pages: Vec<Page>,
    sections: Vec<Section>,
    current: Option<usize>,
    path_index: HashMap<String, usize>,
}

impl NavTree {
    /// Build the tree from parsed declarations.
    ///
    /// Every leaf path must already be registered in `files`; building
    /// fixes each page's position and URL before any content is read.
    pub fn build(declarations: &[Declaration], files: &Files) -> Result<Self, UnregisteredFile> {
        let mut builder = TreeBuilder {
            files,
            pages: Vec::new(),
            sections: Vec::new(),
        };
        let items = builder.build_level(declarations, &[], true)?;

        let count = builder.pages.len();
        for (idx, page) in builder.pages.iter_mut().enumerate() {
            page.previous = idx.checked_sub(1);
            page.next = (idx + 1 < count).then_some(idx + 1);
        }

        let mut path_index = HashMap::new();
        for (idx, page) in builder.pages.iter().enumerate() {
            // First occurrence wins when a file is declared twice.
            path_index.entry(page.file.src_path.clone()).or_insert(idx);
        }

        let tree = Self {
            items,
            pages: builder.pages,
            sections: builder.sections,
            current: None,
            path_index,
        };
        debug_assert!(tree.page_links_consistent());
        Ok(tree)
    }

    /// Top-level navigation nodes in declaration order.
    #[must_use]
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// All pages in traversal order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn page(&self, idx: usize) -> &Page {
        &self.pages[idx]
    }

    #[must_use]
    pub fn section(&self, idx: usize) -> &Section {
        &self.sections[idx]
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Look up a page by its source path.
    #[must_use]
    pub fn get_page(&self, src_path: &str) -> Option<&Page> {
        self.path_index.get(src_path).map(|&idx| &self.pages[idx])
    }

    /// The first page in traversal order.
    #[must_use]
    pub fn homepage(&self) -> Option<&Page> {
        self.pages.first()
    }

    /// Index of the page the cursor is on, if any.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Move the traversal cursor.
    ///
    /// Deactivates the previous page and its ancestor chain before
    /// activating the new one; `None` clears the cursor entirely.
    pub fn set_current(&mut self, page: Option<usize>) {
        if let Some(old) = self.current.take() {
            self.pages[old].active = false;
            for &section in &self.pages[old].ancestors {
                self.sections[section].active = false;
            }
        }
        if let Some(new) = page {
            self.pages[new].active = true;
            for &section in &self.pages[new].ancestors {
                self.sections[section].active = true;
            }
            self.current = Some(new);
        }
        debug_assert!(self.active_path_is_exclusive());
    }

    /// Attach a page's raw source and front matter.
    pub fn set_page_source(&mut self, idx: usize, markdown: String, meta: Meta) {
        let page = &mut self.pages[idx];
        page.meta_title = meta.get("title").and_then(|values| values.first()).cloned();
        page.markdown = markdown;
        page.meta = meta;
    }

    /// Attach a page's conversion output.
    ///
    /// Unresolved-link warnings in `rendered` are the caller's to
    /// report; they are not stored on the page.
    pub fn set_page_rendered(&mut self, idx: usize, rendered: Rendered) {
        let page = &mut self.pages[idx];
        page.heading_title = rendered.title;
        page.content = rendered.html;
        page.toc = rendered.toc;
    }

    /// Exactly the current page and its ancestor chain are active.
    fn active_path_is_exclusive(&self) -> bool {
        match self.current {
            None => {
                self.pages.iter().all(|page| !page.active)
                    && self.sections.iter().all(|section| !section.active)
            }
            Some(current) => {
                let single_page = self
                    .pages
                    .iter()
                    .enumerate()
                    .all(|(idx, page)| page.active == (idx == current));
                let chain = &self.pages[current].ancestors;
                let chain_only = self
                    .sections
                    .iter()
                    .enumerate()
                    .all(|(idx, section)| section.active == chain.contains(&idx));
                single_page && chain_only
            }
        }
    }

    /// Prev/next links form one chain over the page arena order.
    fn page_links_consistent(&self) -> bool {
        self.pages.iter().enumerate().all(|(idx, page)| {
            let prev_ok = match page.previous {
                Some(prev) => self.pages.get(prev).is_some_and(|p| p.next == Some(idx)),
                None => idx == 0,
            };
            let next_ok = match page.next {
                Some(next) => self.pages.get(next).is_some_and(|p| p.previous == Some(idx)),
                None => idx + 1 == self.pages.len(),
            };
            prev_ok && next_ok
        })
    }
}

struct TreeBuilder<'f> {
    files: &'f Files,
    pages: Vec<Page>,
    sections: Vec<Section>,
}

impl TreeBuilder<'_> {
    fn build_level(
        &mut self,
        declarations: &[Declaration],
        ancestors: &[usize],
        top_level: bool,
    ) -> Result<Vec<NavItem>, UnregisteredFile> {
        let mut items = Vec::new();
        for declaration in declarations {
            match declaration {
                Declaration::Leaf {
                    path,
                    title,
                    child_title,
                } => self.place_leaf(
                    &mut items,
                    ancestors,
                    top_level,
                    path,
                    title.as_deref(),
                    child_title.as_deref(),
                )?,
                Declaration::Group { title, children } => {
                    let section = self.section_at_end(&mut items, title.clone());
                    let mut chain = ancestors.to_vec();
                    chain.push(section);
                    let child_items = self.build_level(children, &chain, false)?;
                    self.sections[section].children.extend(child_items);
                }
            }
        }
        Ok(items)
    }

    /// Place one leaf declaration, creating or reusing a section.
    ///
    /// A child title always forces a section. A nested path at the top
    /// level is nested under a section titled by the declaration or by
    /// its leading directory. Anything else is a plain page; inside an
    /// explicit group, paths are taken as given and never auto-nested.
    fn place_leaf(
        &mut self,
        items: &mut Vec<NavItem>,
        ancestors: &[usize],
        top_level: bool,
        path: &str,
        title: Option<&str>,
        child_title: Option<&str>,
    ) -> Result<(), UnregisteredFile> {
        let nests = child_title.is_some() || (top_level && path.contains('/'));
        if nests {
            let section_title = title
                .map(str::to_owned)
                .unwrap_or_else(|| derive_section_title(path));
            let section = self.section_at_end(items, section_title);
            let mut chain = ancestors.to_vec();
            chain.push(section);
            let page = self.add_page(path, child_title, &chain)?;
            self.sections[section].children.push(NavItem::Page(page));
        } else {
            let page = self.add_page(path, title, ancestors)?;
            items.push(NavItem::Page(page));
        }
        Ok(())
    }

    /// Reuse the trailing section when it carries the same title, so
    /// consecutive declarations resolving to one title share a section.
    fn section_at_end(&mut self, items: &mut Vec<NavItem>, title: String) -> usize {
        let trailing = match items.last() {
            Some(&NavItem::Section(idx)) if self.sections[idx].title == title => Some(idx),
            _ => None,
        };
        if let Some(idx) = trailing {
            return idx;
        }
        let idx = self.sections.len();
        self.sections.push(Section::new(title));
        items.push(NavItem::Section(idx));
        idx
    }

    fn add_page(
        &mut self,
        path: &str,
        declared_title: Option<&str>,
        ancestors: &[usize],
    ) -> Result<usize, UnregisteredFile> {
        let file = self
            .files
            .lookup(path)
            .ok_or_else(|| UnregisteredFile(path.to_owned()))?
            .clone();
        let idx = self.pages.len();
        self.pages.push(Page::new(
            file,
            declared_title.map(str::to_owned),
            ancestors.to_vec(),
        ));
        Ok(idx)
    }
}

/// Section title for an auto-nested path, from its leading directory.
fn derive_section_title(path: &str) -> String {
    let component = match path.find('/') {
        Some(idx) => &path[..idx],
        None => path,
    };
    let stem = match component.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => component,
    };
    title::title_from_name(stem)
}
