//! Registry of source content files and their computed output locations.
//!
//! The registry is the single source of truth for "does this target
//! exist": it is populated once from the declared file set before any
//! page is rendered and is read-only afterwards, so it can be consulted
//! freely during rendering.

use std::collections::HashMap;

use crate::urls;

/// File extensions recognized as Markdown content, lowercase.
pub const MARKDOWN_EXTENSIONS: [&str; 5] = ["md", "markdown", "mdown", "mkdn", "mkd"];

/// Whether a path names a Markdown content file (case-insensitive).
///
/// Anything else is a static asset: it is never registered and passes
/// through a build untouched.
#[must_use]
pub fn is_markdown_file(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.as_str()))
}

/// A registered content file with its computed output location.
///
/// Destination path and URL are pure functions of the source path and
/// the URL-convention flag, fixed at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Source-relative path, normalized to forward slashes.
    pub src_path: String,
    /// Filename stem used for URLs and title derivation. A `README`
    /// file takes the name `index`.
    pub name: String,
    /// Output location relative to the site directory.
    pub dest_path: String,
    /// Site-relative URL, rooted at `/`.
    pub url: String,
}

impl SourceFile {
    fn new(src_path: String, directory_urls: bool) -> Self {
        let dir = urls::dirname(&src_path).to_owned();
        let filename = match src_path.rfind('/') {
            Some(idx) => &src_path[idx + 1..],
            None => src_path.as_str(),
        };
        let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
        let name = if stem == "README" {
            "index".to_owned()
        } else {
            stem.to_owned()
        };

        let (dest_path, url) = if directory_urls {
            if name == "index" {
                let dest = join_dir(&dir, "index.html");
                let url = if dir.is_empty() {
                    "/".to_owned()
                } else {
                    format!("/{dir}/")
                };
                (dest, url)
            } else {
                let dest = join_dir(&dir, &format!("{name}/index.html"));
                let url = if dir.is_empty() {
                    format!("/{name}/")
                } else {
                    format!("/{dir}/{name}/")
                };
                (dest, url)
            }
        } else {
            let dest = join_dir(&dir, &format!("{name}.html"));
            let url = if dest == "index.html" {
                "/".to_owned()
            } else {
                format!("/{dest}")
            };
            (dest, url)
        };

        Self {
            src_path,
            name,
            dest_path,
            url,
        }
    }

    /// Whether this file is the site home page.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.url == "/"
    }

    /// This file's URL relative to the page at `origin`.
    #[must_use]
    pub fn url_relative_to(&self, origin: &SourceFile) -> String {
        urls::relative(&origin.url, &self.url)
    }
}

fn join_dir(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_owned()
    } else {
        format!("{dir}/{rest}")
    }
}

/// Two sources computed the same output location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("files '{first}' and '{second}' both map to destination '{dest}'")]
pub struct ConflictError {
    pub dest: String,
    pub first: String,
    pub second: String,
}

/// Registry mapping normalized source paths to [`SourceFile`] entries.
///
/// Iteration order is registration order. Registration is idempotent
/// for an already-known source path; two distinct sources mapping to
/// the same destination are rejected.
#[derive(Debug, Clone)]
pub struct Files {
    directory_urls: bool,
    files: Vec<SourceFile>,
    by_src: HashMap<String, usize>,
    by_dest: HashMap<String, usize>,
}

impl Files {
    #[must_use]
    pub fn new(directory_urls: bool) -> Self {
        Self {
            directory_urls,
            files: Vec::new(),
            by_src: HashMap::new(),
            by_dest: HashMap::new(),
        }
    }

    /// Compute and store the destination path and URL for a source path.
    pub fn register(&mut self, src_path: &str) -> Result<&SourceFile, ConflictError> {
        let src = urls::normalize(src_path);
        if let Some(&idx) = self.by_src.get(&src) {
            return Ok(&self.files[idx]);
        }

        let file = SourceFile::new(src.clone(), self.directory_urls);
        if let Some(&existing) = self.by_dest.get(&file.dest_path) {
            return Err(ConflictError {
                dest: file.dest_path,
                first: self.files[existing].src_path.clone(),
                second: src,
            });
        }

        let idx = self.files.len();
        self.by_dest.insert(file.dest_path.clone(), idx);
        self.by_src.insert(src, idx);
        self.files.push(file);
        Ok(&self.files[idx])
    }

    /// Look up a file by source path, normalizing the query first.
    #[must_use]
    pub fn lookup(&self, src_path: &str) -> Option<&SourceFile> {
        self.by_src
            .get(&urls::normalize(src_path))
            .map(|&idx| &self.files[idx])
    }

    #[must_use]
    pub fn directory_urls(&self) -> bool {
        self.directory_urls
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Files: Send, Sync);

    fn registered(files: &mut Files, path: &str) -> SourceFile {
        files.register(path).expect("registration failed").clone()
    }

    #[test]
    fn test_directory_url_mappings() {
        let cases = [
            ("index.md", "index.html", "/"),
            ("api-guide.md", "api-guide/index.html", "/api-guide/"),
            ("api-guide/index.md", "api-guide/index.html", "/api-guide/"),
            (
                "api-guide/testing.md",
                "api-guide/testing/index.html",
                "/api-guide/testing/",
            ),
        ];
        for (src, dest, url) in cases {
            // Fresh registry per case: two of these intentionally share
            // a destination with each other.
            let mut files = Files::new(true);
            let file = registered(&mut files, src);
            assert_eq!(file.dest_path, dest, "dest for {src}");
            assert_eq!(file.url, url, "url for {src}");
        }
    }

    #[test]
    fn test_flat_url_mappings() {
        let mut files = Files::new(false);
        assert_eq!(registered(&mut files, "index.md").dest_path, "index.html");
        assert_eq!(registered(&mut files, "index.md").url, "/");

        let about = registered(&mut files, "about.md");
        assert_eq!(about.dest_path, "about.html");
        assert_eq!(about.url, "/about.html");

        let config = registered(&mut files, "guide/config.md");
        assert_eq!(config.dest_path, "guide/config.html");
        assert_eq!(config.url, "/guide/config.html");
    }

    #[test]
    fn test_readme_maps_to_index() {
        let mut files = Files::new(true);
        let readme = registered(&mut files, "README.md");
        assert_eq!(readme.name, "index");
        assert_eq!(readme.dest_path, "index.html");
        assert_eq!(readme.url, "/");
        assert!(readme.is_home());

        let nested = registered(&mut files, "guide/README.md");
        assert_eq!(nested.dest_path, "guide/index.html");
        assert_eq!(nested.url, "/guide/");
        assert!(!nested.is_home());
    }

    #[test]
    fn test_home_detection() {
        let mut files = Files::new(true);
        assert!(registered(&mut files, "index.md").is_home());
        assert!(!registered(&mut files, "about.md").is_home());
        assert!(!registered(&mut files, "guide/index.md").is_home());

        let mut flat = Files::new(false);
        assert!(registered(&mut flat, "index.md").is_home());
        assert!(!registered(&mut flat, "about.md").is_home());
    }

    #[test]
    fn test_conflicting_destinations_rejected() {
        let mut files = Files::new(true);
        registered(&mut files, "index.md");
        let err = files.register("README.md").unwrap_err();
        assert_eq!(err.dest, "index.html");
        assert_eq!(err.first, "index.md");
        assert_eq!(err.second, "README.md");
    }

    #[test]
    fn test_conflicting_directory_forms_rejected() {
        let mut files = Files::new(true);
        registered(&mut files, "api-guide.md");
        let err = files.register("api-guide/index.md").unwrap_err();
        assert_eq!(err.dest, "api-guide/index.html");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut files = Files::new(true);
        registered(&mut files, "about.md");
        registered(&mut files, "about.md");
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_lookup_normalizes() {
        let mut files = Files::new(true);
        registered(&mut files, "guide/config.md");
        assert!(files.lookup("guide/config.md").is_some());
        assert!(files.lookup("./guide/config.md").is_some());
        assert!(files.lookup("guide/../guide/config.md").is_some());
        assert!(files.lookup("guide/missing.md").is_none());
    }

    #[test]
    fn test_iteration_order_is_registration_order() {
        let mut files = Files::new(true);
        registered(&mut files, "index.md");
        registered(&mut files, "about.md");
        registered(&mut files, "guide/config.md");
        let order: Vec<&str> = files.iter().map(|f| f.src_path.as_str()).collect();
        assert_eq!(order, ["index.md", "about.md", "guide/config.md"]);
    }

    #[test]
    fn test_url_relative_to() {
        let mut files = Files::new(true);
        let config = registered(&mut files, "guide/config.md");
        let usage = registered(&mut files, "guide/usage.md");
        let home = registered(&mut files, "index.md");
        assert_eq!(usage.url_relative_to(&config), "../usage/");
        assert_eq!(home.url_relative_to(&usage), "../..");
        assert_eq!(config.url_relative_to(&home), "guide/config/");
    }

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file("index.md"));
        assert!(is_markdown_file("index.markdown"));
        assert!(is_markdown_file("index.MARKDOWN"));
        assert!(is_markdown_file("guide/page.mkd"));
        assert!(!is_markdown_file("index.txt"));
        assert!(!is_markdown_file("indexmd"));
        assert!(!is_markdown_file("style.css"));
    }
}
