//! Declaration discovery from an unordered file listing.
//!
//! When no `pages` setting is configured, the navigation is derived
//! from the content directory itself: directories become sections and
//! files order alphabetically, with index files leading their
//! directory and the root index leading the whole site.

use mdsite_files::urls;

use crate::declaration::Declaration;
use crate::title;

/// Build declarations from walked source paths.
///
/// Paths are content-root-relative with forward slashes. The input
/// order does not matter; the result is deterministic.
#[must_use]
pub fn declarations_from_paths(paths: &[String]) -> Vec<Declaration> {
    let mut ordered: Vec<&str> = paths.iter().map(String::as_str).collect();
    // Compare directories component-wise rather than as flat strings, so
    // a directory's subtree stays contiguous even when a sibling's name
    // extends its own ("api-reference" beside "api").
    ordered.sort_by(|a, b| {
        dir_components(a)
            .cmp(dir_components(b))
            .then_with(|| (!is_index_file(a)).cmp(&!is_index_file(b)))
            .then_with(|| a.cmp(b))
    });

    let mut items = Vec::new();
    for path in ordered {
        let dirs: Vec<&str> = dir_components(path).collect();
        insert_nested(&mut items, &dirs, path);
    }
    items
}

/// Directory components of a path, outermost first.
fn dir_components(path: &str) -> impl Iterator<Item = &str> + '_ {
    urls::dirname(path)
        .split('/')
        .filter(|component| !component.is_empty())
}

/// Whether a path names its directory's index document.
fn is_index_file(path: &str) -> bool {
    let filename = path.rsplit('/').next().unwrap_or(path);
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    stem == "index" || stem == "README"
}

fn insert_nested(items: &mut Vec<Declaration>, dirs: &[&str], path: &str) {
    let Some((first, rest)) = dirs.split_first() else {
        items.push(Declaration::Leaf {
            path: path.to_owned(),
            title: None,
            child_title: None,
        });
        return;
    };

    // Sorted input keeps one directory's files consecutive, so only
    // the trailing group can ever match.
    let section_title = title::title_from_name(first);
    let reuse = matches!(
        items.last(),
        Some(Declaration::Group { title, .. }) if *title == section_title
    );
    if !reuse {
        items.push(Declaration::Group {
            title: section_title,
            children: Vec::new(),
        });
    }
    if let Some(Declaration::Group { children, .. }) = items.last_mut() {
        insert_nested(children, rest, path);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn paths(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    fn leaf(path: &str) -> Declaration {
        Declaration::Leaf {
            path: path.to_owned(),
            title: None,
            child_title: None,
        }
    }

    #[test]
    fn test_root_index_comes_first() {
        let declarations =
            declarations_from_paths(&paths(&["about.md", "index.md", "contact.md"]));
        assert_eq!(
            declarations,
            [leaf("index.md"), leaf("about.md"), leaf("contact.md")]
        );
    }

    #[test]
    fn test_directories_become_sections() {
        let declarations = declarations_from_paths(&paths(&[
            "guide/usage.md",
            "about.md",
            "index.md",
            "guide/config.md",
        ]));
        assert_eq!(
            declarations,
            [
                leaf("index.md"),
                leaf("about.md"),
                Declaration::Group {
                    title: "Guide".to_owned(),
                    children: vec![leaf("guide/config.md"), leaf("guide/usage.md")],
                },
            ]
        );
    }

    #[test]
    fn test_deep_directories_nest() {
        let declarations = declarations_from_paths(&paths(&[
            "guide/advanced/tuning.md",
            "guide/config.md",
            "index.md",
        ]));
        assert_eq!(
            declarations,
            [
                leaf("index.md"),
                Declaration::Group {
                    title: "Guide".to_owned(),
                    children: vec![
                        leaf("guide/config.md"),
                        Declaration::Group {
                            title: "Advanced".to_owned(),
                            children: vec![leaf("guide/advanced/tuning.md")],
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_directory_index_leads_its_section() {
        let declarations =
            declarations_from_paths(&paths(&["guide/alpha.md", "guide/index.md"]));
        assert_eq!(
            declarations,
            [Declaration::Group {
                title: "Guide".to_owned(),
                children: vec![leaf("guide/index.md"), leaf("guide/alpha.md")],
            }]
        );
    }

    #[test]
    fn test_readme_counts_as_index() {
        let declarations = declarations_from_paths(&paths(&["about.md", "README.md"]));
        assert_eq!(declarations, [leaf("README.md"), leaf("about.md")]);
    }

    #[test]
    fn test_directory_stays_one_section_beside_prefix_named_sibling() {
        // "api-reference" sorts between "api" and "api/advanced" as a
        // flat string; it must not split the api subtree in two.
        let declarations = declarations_from_paths(&paths(&[
            "api-reference/endpoints.md",
            "api/advanced/tuning.md",
            "api/index.md",
        ]));
        assert_eq!(
            declarations,
            [
                Declaration::Group {
                    title: "Api".to_owned(),
                    children: vec![
                        leaf("api/index.md"),
                        Declaration::Group {
                            title: "Advanced".to_owned(),
                            children: vec![leaf("api/advanced/tuning.md")],
                        },
                    ],
                },
                Declaration::Group {
                    title: "Api reference".to_owned(),
                    children: vec![leaf("api-reference/endpoints.md")],
                },
            ]
        );
    }

    #[test]
    fn test_section_titles_from_directory_names() {
        let declarations = declarations_from_paths(&paths(&["user-guide/setup.md"]));
        assert_eq!(
            declarations,
            [Declaration::Group {
                title: "User guide".to_owned(),
                children: vec![leaf("user-guide/setup.md")],
            }]
        );
    }

    #[test]
    fn test_empty_listing() {
        assert!(declarations_from_paths(&[]).is_empty());
    }
}
