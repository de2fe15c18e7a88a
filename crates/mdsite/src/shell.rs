//! HTML document shell for built pages.
//!
//! Wraps one page's rendered body in a complete HTML document: site
//! header, navigation tree with active markers, the page's table of
//! contents and prev/next footer links. Every href is page-relative so
//! the built site works from any mount point.

use std::fmt::Write;

use mdsite_config::Config;
use mdsite_files::{SourceFile, urls};
use mdsite_nav::{NavItem, NavTree};
use mdsite_render::{TocEntry, escape_html};

/// Render the complete HTML document for one page.
///
/// The tree cursor must already be on `idx` so active markers land on
/// the right navigation path.
pub(crate) fn render_page(tree: &NavTree, idx: usize, config: &Config) -> String {
    let page = tree.page(idx);
    let origin = page.file();
    let site_name = &config.site.name;

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if let Some(description) = &config.site.description {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description),
        );
    }
    if let Some(author) = &config.site.author {
        let _ = writeln!(
            html,
            "<meta name=\"author\" content=\"{}\">",
            escape_html(author),
        );
    }
    if let Some(canonical) = config.site.canonical_url(&origin.url) {
        let _ = writeln!(
            html,
            "<link rel=\"canonical\" href=\"{}\">",
            escape_html(&canonical),
        );
    }
    let title = if origin.is_home() {
        site_name.clone()
    } else {
        format!("{} - {site_name}", page.title())
    };
    let _ = writeln!(html, "<title>{}</title>", escape_html(&title));
    html.push_str("</head>\n<body>\n");

    // Site header linking back to the home page.
    let home_href = urls::relative(&origin.url, "/");
    let _ = writeln!(
        html,
        "<header><a class=\"site-name\" href=\"{}\">{}</a></header>",
        escape_html(&home_href),
        escape_html(site_name),
    );

    html.push_str("<nav class=\"site-nav\">\n<ul>\n");
    render_nav_items(&mut html, tree, tree.items(), origin);
    html.push_str("</ul>\n</nav>\n");

    render_toc(&mut html, page.toc());

    html.push_str("<main>\n");
    html.push_str(page.content());
    html.push_str("</main>\n");

    render_footer(&mut html, tree, idx, origin);

    html.push_str("</body>\n</html>\n");
    html
}

/// Render navigation nodes recursively.
fn render_nav_items(html: &mut String, tree: &NavTree, items: &[NavItem], origin: &SourceFile) {
    for item in items {
        match *item {
            NavItem::Page(page_idx) => {
                let page = tree.page(page_idx);
                let class = if page.is_active() { " class=\"active\"" } else { "" };
                let _ = writeln!(
                    html,
                    "<li{class}><a href=\"{}\">{}</a></li>",
                    escape_html(&page.file().url_relative_to(origin)),
                    escape_html(&page.title()),
                );
            }
            NavItem::Section(section_idx) => {
                let section = tree.section(section_idx);
                let class = if section.is_active() { " class=\"active\"" } else { "" };
                let _ = writeln!(
                    html,
                    "<li{class}><span>{}</span>",
                    escape_html(section.title()),
                );
                html.push_str("<ul>\n");
                render_nav_items(html, tree, section.children(), origin);
                html.push_str("</ul>\n</li>\n");
            }
        }
    }
}

/// Render the page's table of contents.
fn render_toc(html: &mut String, toc: &[TocEntry]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<nav class=\"toc\">\n<ul>\n");
    for entry in toc {
        let _ = writeln!(
            html,
            "<li class=\"level-{}\"><a href=\"#{}\">{}</a></li>",
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.title),
        );
    }
    html.push_str("</ul>\n</nav>\n");
}

/// Render prev/next links between neighboring pages.
fn render_footer(html: &mut String, tree: &NavTree, idx: usize, origin: &SourceFile) {
    let page = tree.page(idx);
    let previous = page.previous().map(|prev| tree.page(prev));
    let next = page.next().map(|next| tree.page(next));
    if previous.is_none() && next.is_none() {
        return;
    }

    html.push_str("<footer>\n");
    if let Some(previous) = previous {
        let _ = writeln!(
            html,
            "<a rel=\"prev\" href=\"{}\">&laquo; {}</a>",
            escape_html(&previous.file().url_relative_to(origin)),
            escape_html(&previous.title()),
        );
    }
    if let Some(next) = next {
        let _ = writeln!(
            html,
            "<a rel=\"next\" href=\"{}\">{} &raquo;</a>",
            escape_html(&next.file().url_relative_to(origin)),
            escape_html(&next.title()),
        );
    }
    html.push_str("</footer>\n");
}
