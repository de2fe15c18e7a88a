//! Pure path algebra over site-relative URLs and source paths.
//!
//! Everything in this module works on forward-slash strings and never
//! touches the host filesystem, so results are identical on every
//! platform. Site-relative URLs are rooted at `/` (`/guide/config/`);
//! source paths are rooted at the docs directory with no leading slash
//! (`guide/config.md`).

/// Compute the relative path from the page at `from` to `to`.
///
/// Both arguments are site-relative URLs rooted at `/`. The result is
/// relative to the directory containing `from`: for a directory-style
/// URL (`/guide/config/`) that is the URL itself minus its final
/// segment, for a flat URL (`/guide/config.html`) it is the enclosing
/// directory.
///
/// A trailing `/` on `to` is preserved unless the result collapses to
/// the current directory, which is returned as `.`.
///
/// # Examples
///
/// ```
/// use mdsite_files::urls::relative;
///
/// assert_eq!(relative("/a/b/", "/a/c/"), "../c/");
/// assert_eq!(relative("/", "/x/"), "x/");
/// assert_eq!(relative("/a/", "/a/"), ".");
/// assert_eq!(relative("/guide/config.html", "/about.html"), "../about.html");
/// ```
#[must_use]
pub fn relative(from: &str, to: &str) -> String {
    let base = parent_dir(from);
    if base == "/" {
        if to == "/" {
            return ".".to_owned();
        }
        return to.trim_start_matches('/').to_owned();
    }

    let base_segs: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = base_segs
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = "../".repeat(base_segs.len() - common);
    let down = to_segs[common..].join("/");

    let joined = format!("{ups}{down}");
    let path = joined.trim_end_matches('/');
    if path.is_empty() {
        return ".".to_owned();
    }
    if to.ends_with('/') && to.len() > 1 {
        format!("{path}/")
    } else {
        path.to_owned()
    }
}

/// The directory containing a site-relative URL.
///
/// `/a/b/` and `/a/b.html` both live in `/a`; anything at the top level
/// lives in `/`.
fn parent_dir(url: &str) -> &str {
    match url.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &url[..idx],
    }
}

/// The directory part of a source-relative path, `""` for the top level.
///
/// ```
/// use mdsite_files::urls::dirname;
///
/// assert_eq!(dirname("guide/usage.md"), "guide");
/// assert_eq!(dirname("about.md"), "");
/// ```
#[must_use]
pub fn dirname(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

/// Collapse `.` and `..` segments without consulting the filesystem.
///
/// Leading `..` segments that would escape the root are kept verbatim,
/// so an over-reaching link normalizes to a path that cannot match any
/// registered file instead of silently re-anchoring at the root.
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if matches!(stack.last(), Some(&"..")) || stack.is_empty() {
                    stack.push("..");
                } else {
                    stack.pop();
                }
            }
            seg => stack.push(seg),
        }
    }
    stack.join("/")
}

/// Resolve `target` against a source directory and normalize the result.
///
/// `base_dir` is the directory of the linking page's source path
/// (`""` for top-level pages), `target` the raw relative reference.
#[must_use]
pub fn resolve(base_dir: &str, target: &str) -> String {
    if base_dir.is_empty() {
        normalize(target)
    } else {
        normalize(&format!("{base_dir}/{target}"))
    }
}
