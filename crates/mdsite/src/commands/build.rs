//! `mdsite build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_files::{Files, is_markdown_file};
use mdsite_nav::{Declaration, NavTree, declarations_from_paths, leaf_paths, meta};
use mdsite_render::convert;

use crate::error::CliError;
use crate::output::Output;
use crate::shell;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Output directory for the built site (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Remove existing output directory contents before building.
    #[arg(long)]
    clean: bool,

    /// Treat unresolved links as errors.
    #[arg(long)]
    strict: bool,

    /// Write per-page JSON documents instead of HTML pages.
    #[arg(long)]
    json: bool,

    /// Enable verbose output (per-page progress logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir.clone(),
            strict: self.strict.then_some(true),
        };
        let config = Config::load(self.config_file.as_deref(), Some(&cli_settings))?;

        let docs_dir = config.build_resolved.docs_dir.clone();
        let site_dir = config.build_resolved.site_dir.clone();
        if !docs_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "docs directory not found: {}",
                docs_dir.display()
            )));
        }

        output.info(&format!("mdsite v{version}"));
        output.info(&format!("Source: {}", docs_dir.display()));
        output.info(&format!("Output: {}", site_dir.display()));

        let source_paths = collect_source_paths(&docs_dir, &site_dir)?;
        let content_paths: Vec<String> = source_paths
            .iter()
            .filter(|path| is_markdown_file(path))
            .cloned()
            .collect();

        let declarations = match &config.pages {
            Some(entries) => Declaration::parse(entries)?,
            None => declarations_from_paths(&content_paths),
        };

        let mut files = Files::new(config.build_resolved.directory_urls);
        for path in leaf_paths(&declarations) {
            files.register(path)?;
        }
        // The registry is read-only once the tree is built.
        let files = files;
        let mut tree = NavTree::build(&declarations, &files)?;

        if self.clean && site_dir.exists() {
            std::fs::remove_dir_all(&site_dir)?;
        }
        std::fs::create_dir_all(&site_dir)?;

        let mut unresolved = 0usize;
        let mut skipped = 0usize;
        for idx in 0..tree.page_count() {
            tree.set_current(Some(idx));

            let file = tree.page(idx).file().clone();
            let source = match read_page_source(&docs_dir.join(&file.src_path)) {
                Ok(source) => source,
                Err(err) => {
                    tracing::error!(
                        page = %file.src_path,
                        error = %err,
                        "Cannot read page source, skipping"
                    );
                    skipped += 1;
                    continue;
                }
            };

            let (page_meta, markdown) = meta::extract(&source);
            let mut rendered = convert(markdown, &file, &files);
            unresolved += rendered.unresolved.len();
            rendered.unresolved.clear();
            tree.set_page_source(idx, markdown.to_owned(), page_meta);
            tree.set_page_rendered(idx, rendered);

            let dest = site_dir.join(&file.dest_path);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            if self.json {
                let document = serde_json::json!({
                    "content": tree.page(idx).content(),
                    "title": tree.page(idx).title(),
                    "url": file.url,
                });
                std::fs::write(
                    dest.with_extension("json"),
                    serde_json::to_string_pretty(&document)?,
                )?;
            } else {
                std::fs::write(&dest, shell::render_page(&tree, idx, &config))?;
            }
            tracing::debug!(page = %file.src_path, dest = %file.dest_path, "Rendered page");
        }
        tree.set_current(None);

        let assets = copy_assets(&source_paths, &docs_dir, &site_dir)?;
        if assets > 0 {
            output.info(&format!("Copied {assets} static files"));
        }

        if skipped > 0 {
            output.warning(&format!("Skipped {skipped} unreadable pages"));
        }
        if unresolved > 0 {
            output.warning(&format!(
                "{unresolved} link targets could not be resolved"
            ));
        }
        output.success(&format!(
            "Built {} pages to {}",
            tree.page_count() - skipped,
            site_dir.display()
        ));

        if config.build_resolved.strict && unresolved > 0 {
            return Err(CliError::Validation(format!(
                "strict mode: {unresolved} unresolved links"
            )));
        }
        Ok(())
    }
}

/// Collect every file under the docs directory as sorted forward-slash
/// relative paths, skipping dotfiles and the output directory.
fn collect_source_paths(docs_dir: &Path, site_dir: &Path) -> Result<Vec<String>, CliError> {
    let mut paths = Vec::new();
    walk_directory(docs_dir, site_dir, "", &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn walk_directory(
    dir: &Path,
    site_dir: &Path,
    prefix: &str,
    paths: &mut Vec<String>,
) -> Result<(), CliError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if entry.file_type()?.is_dir() {
            let path = entry.path();
            if path == site_dir {
                continue;
            }
            walk_directory(&path, site_dir, &rel, paths)?;
        } else {
            paths.push(rel);
        }
    }
    Ok(())
}

/// Read one page source, tolerating a UTF-8 byte order mark.
fn read_page_source(path: &Path) -> Result<String, std::io::Error> {
    let text = std::fs::read_to_string(path)?;
    if let Some(stripped) = text.strip_prefix('\u{feff}') {
        return Ok(stripped.to_owned());
    }
    Ok(text)
}

/// Copy non-content files through to the output directory unchanged.
fn copy_assets(
    source_paths: &[String],
    docs_dir: &Path,
    site_dir: &Path,
) -> Result<usize, CliError> {
    let mut copied = 0;
    for rel in source_paths {
        if is_markdown_file(rel) {
            continue;
        }
        let to = site_dir.join(rel);
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(docs_dir.join(rel), &to)?;
        copied += 1;
    }
    Ok(copied)
}
