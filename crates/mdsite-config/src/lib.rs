//! Configuration management for mdsite.
//!
//! Parses `mdsite.toml` with serde and, when no path is given, walks parent
//! directories to discover one.
//!
//! Command-line overrides are merged in during load via [`CliSettings`].

use mdsite_nav::PageEntry;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line overrides applied on top of the loaded configuration.
///
/// Every field is optional; `None` leaves the configured value untouched.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the output directory.
    pub site_dir: Option<PathBuf>,
    /// Override strict mode (unresolved link warnings fail the build).
    pub strict: Option<bool>,
}

/// Filename looked for during discovery.
const CONFIG_FILENAME: &str = "mdsite.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity configuration.
    pub site: SiteConfig,
    /// Build configuration (paths are relative strings from TOML).
    #[serde(default)]
    build: BuildConfigRaw,
    /// Explicit page declarations. When absent, the content directory is
    /// walked and pages are discovered from the filesystem.
    pub pages: Option<Vec<PageEntry>>,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Where the configuration was loaded from, if it came from a file.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name, shown in the page shell and document titles.
    pub name: String,
    /// Canonical base URL of the deployed site.
    ///
    /// Normalized to end with a trailing slash after loading.
    pub url: Option<String>,
    /// Site description for the HTML meta tag.
    pub description: Option<String>,
    /// Site author for the HTML meta tag.
    pub author: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Documentation".to_owned(),
            url: None,
            description: None,
            author: None,
        }
    }
}

impl SiteConfig {
    /// Canonical URL for a page, when a base URL is configured.
    ///
    /// `page_url` is the site-relative URL and starts with `/`.
    #[must_use]
    pub fn canonical_url(&self, page_url: &str) -> Option<String> {
        let base = self.url.as_deref()?;
        Some(format!("{}{page_url}", base.trim_end_matches('/')))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    docs_dir: Option<String>,
    site_dir: Option<String>,
    directory_urls: Option<bool>,
    strict: Option<bool>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Source directory holding the content files.
    pub docs_dir: PathBuf,
    /// Output directory for the built site.
    pub site_dir: PathBuf,
    /// Whether pages map to directory URLs (`guide/` vs. `guide.html`).
    pub directory_urls: bool,
    /// Whether unresolved link warnings fail the build.
    pub strict: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Reject empty string fields.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject URL fields outside the http(s) schemes.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must be an http:// or https:// URL"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration, optionally merging command-line overrides.
    ///
    /// With an explicit `config_path` the file must exist. Without one,
    /// `mdsite.toml` is searched for in the current directory and its
    /// parents, falling back to defaults when nothing is found.
    ///
    /// Overrides are merged after loading and path resolution, so they win
    /// over anything the file sets.
    ///
    /// # Errors
    ///
    /// Returns an error when an explicit `config_path` is missing or the
    /// file fails to parse.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Merge command-line overrides into the resolved build settings.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_dir) = &settings.site_dir {
            self.build_resolved.site_dir.clone_from(site_dir);
        }
        if let Some(strict) = settings.strict {
            self.build_resolved.strict = strict;
        }
    }

    /// Walk up from the current directory looking for `mdsite.toml`.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Defaults anchored at the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Defaults anchored at `base`, with `docs/` in and `site/` out.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            build: BuildConfigRaw::default(),
            pages: None,
            build_resolved: BuildConfig {
                docs_dir: base.join("docs"),
                site_dir: base.join("site"),
                directory_urls: true,
                strict: false,
            },
            config_path: None,
        }
    }

    /// Parse one TOML file and resolve its paths against its directory.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validation runs on resolved values, not the raw TOML strings.
        config.validate()?;

        Ok(config)
    }

    /// Check the loaded values for consistency.
    ///
    /// Pure value checks only; nothing here touches the filesystem. Runs
    /// automatically when loading from a file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_build()?;
        Ok(())
    }

    /// Validate site identity configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.name, "site.name")?;

        if let Some(url) = &self.site.url {
            require_non_empty(url, "site.url")?;
            require_http_url(url, "site.url")?;
        }

        Ok(())
    }

    /// Validate build configuration.
    fn validate_build(&self) -> Result<(), ConfigError> {
        if self.build_resolved.docs_dir == self.build_resolved.site_dir {
            return Err(ConfigError::Validation(
                "build.docs_dir and build.site_dir cannot be the same directory".to_owned(),
            ));
        }
        Ok(())
    }

    /// Anchor the raw TOML path strings at the config file's directory.
    ///
    /// Also normalizes `site.url` to carry a trailing slash so joining it
    /// with site-relative URLs never doubles or drops a separator.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            docs_dir: resolve(self.build.docs_dir.as_deref(), "docs"),
            site_dir: resolve(self.build.site_dir.as_deref(), "site"),
            directory_urls: self.build.directory_urls.unwrap_or(true),
            strict: self.build.strict.unwrap_or(false),
        };

        if let Some(url) = &mut self.site.url
            && !url.ends_with('/')
        {
            url.push('/');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.name, "Documentation");
        assert!(config.site.url.is_none());
        assert!(config.pages.is_none());
        assert_eq!(config.build_resolved.docs_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.build_resolved.site_dir, PathBuf::from("/test/site"));
        assert!(config.build_resolved.directory_urls);
        assert!(!config.build_resolved.strict);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.name, "Documentation");
        assert!(config.pages.is_none());
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
name = "Example Docs"
url = "https://docs.example.com"
description = "Example project documentation"
author = "Example Team"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.name, "Example Docs");
        assert_eq!(config.site.url.as_deref(), Some("https://docs.example.com"));
        assert_eq!(
            config.site.description.as_deref(),
            Some("Example project documentation")
        );
        assert_eq!(config.site.author.as_deref(), Some("Example Team"));
    }

    #[test]
    fn test_parse_pages_declarations() {
        let toml = r#"
pages = [
    "index.md",
    ["about.md", "About"],
    { Guide = ["guide/config.md", "guide/usage.md"] },
]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let pages = config.pages.unwrap();
        assert_eq!(pages.len(), 3);
        assert!(matches!(&pages[0], PageEntry::Path(p) if p == "index.md"));
        assert!(matches!(&pages[1], PageEntry::Record(r) if r.len() == 2));
        assert!(matches!(&pages[2], PageEntry::Group(g) if g.contains_key("Guide")));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[build]
docs_dir = "content"
site_dir = "public"
directory_urls = false
strict = true
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.docs_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(
            config.build_resolved.site_dir,
            PathBuf::from("/project/public")
        );
        assert!(!config.build_resolved.directory_urls);
        assert!(config.build_resolved.strict);
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.docs_dir,
            PathBuf::from("/project/docs")
        );
        assert_eq!(
            config.build_resolved.site_dir,
            PathBuf::from("/project/site")
        );
        assert!(config.build_resolved.directory_urls);
        assert!(!config.build_resolved.strict);
    }

    #[test]
    fn test_site_url_gains_trailing_slash() {
        let toml = r#"
[site]
url = "https://docs.example.com"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.site.url.as_deref(),
            Some("https://docs.example.com/")
        );
    }

    #[test]
    fn test_site_url_trailing_slash_kept() {
        let toml = r#"
[site]
url = "https://docs.example.com/manual/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.site.url.as_deref(),
            Some("https://docs.example.com/manual/")
        );
    }

    #[test]
    fn test_canonical_url() {
        let mut config: Config = toml::from_str(
            r#"
[site]
url = "https://docs.example.com"
"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.site.canonical_url("/guide/config/"),
            Some("https://docs.example.com/guide/config/".to_owned())
        );
        assert_eq!(
            config.site.canonical_url("/"),
            Some("https://docs.example.com/".to_owned())
        );
    }

    #[test]
    fn test_canonical_url_without_base() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.canonical_url("/guide/"), None);
    }

    #[test]
    fn test_apply_cli_settings_site_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            site_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.build_resolved.site_dir,
            PathBuf::from("/custom/out")
        );
        assert_eq!(config.build_resolved.docs_dir, PathBuf::from("/test/docs")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_strict() {
        let mut config = Config::default_with_base(Path::new("/test"));
        assert!(!config.build_resolved.strict);

        let overrides = CliSettings {
            strict: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(config.build_resolved.strict);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(
            config.build_resolved.site_dir,
            config_before.build_resolved.site_dir
        );
        assert_eq!(config.build_resolved.strict, config_before.build_resolved.strict);
    }

    // Validation tests

    /// Assert validation fails and the message mentions every given substring.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_site_name_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.name = String::new();
        assert_validation_error(&config, &["site.name", "empty"]);
    }

    #[test]
    fn test_validate_site_url_invalid_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.url = Some("ftp://docs.example.com/".to_owned());
        assert_validation_error(&config, &["site.url", "http"]);
    }

    #[test]
    fn test_validate_site_url_valid_http() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.url = Some("http://localhost:8000/".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_matching_dirs_rejected() {
        let toml = r#"
[build]
docs_dir = "out"
site_dir = "out"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_validation_error(&config, &["docs_dir", "site_dir", "same"]);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/mdsite.toml")), None);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("/nonexistent/mdsite.toml"));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &config_path,
            r#"
[site]
name = "Demo"

[build]
docs_dir = "content"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(config.site.name, "Demo");
        assert_eq!(config.build_resolved.docs_dir, dir.path().join("content"));
        assert_eq!(config.build_resolved.site_dir, dir.path().join("site"));
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn test_load_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "site = \"not a table\"").unwrap();

        let err = Config::load(Some(&config_path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_applies_cli_settings_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &config_path,
            r#"
[build]
site_dir = "public"
"#,
        )
        .unwrap();

        let settings = CliSettings {
            site_dir: Some(PathBuf::from("/override/out")),
            strict: Some(true),
        };
        let config = Config::load(Some(&config_path), Some(&settings)).unwrap();

        assert_eq!(config.build_resolved.site_dir, PathBuf::from("/override/out"));
        assert!(config.build_resolved.strict);
    }
}
