//! Site configuration management for `site.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── pages      # [[pages]] navigation entries
//! ├── toc        # [toc] table-of-contents settings
//! ├── types/     # Utility types
//! │   ├── error  # ConfigError, ConfigDiagnostics
//! │   ├── field  # FieldPath
//! │   └── handle # Global config handle
//! ├── util       # URL/path helpers
//! └── mod.rs     # SiteConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key       | Purpose                                        |
//! |-----------|------------------------------------------------|
//! | `title`   | Site title (required)                          |
//! | `head`    | Raw markup injected into every document head   |
//! | `root`    | Page source directory, relative (required)     |
//! | `base`    | Canonical site URL                             |
//! | `output`  | Output directory for the generated site        |
//! | `pager`   | Previous/next links between pages              |
//! | `search`  | Client-side search index                       |
//! | `[toc]`   | Table-of-contents settings                     |
//! | `[[pages]]` | Ordered navigation entries                   |

mod pages;
mod toc;
pub mod types;
mod util;

use util::{find_config_file, url_path_component};

// Re-export from pages/ and toc/
pub use pages::{Page, PageEntry, PageSection, ValidateLevel, flatten};
pub use toc::TocConfig;

// Re-export from types/
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result, bail};
use macros::Config;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing site.toml.
///
/// All keys live at the top level, mirroring the configuration object the
/// rendering framework consumes.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "")]
pub struct SiteConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    #[config(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    #[config(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    #[config(skip)]
    pub project_dir: PathBuf,

    /// How to treat duplicate page paths (internal, set from CLI)
    #[serde(skip)]
    #[config(skip)]
    pub duplicates: ValidateLevel,

    /// Site title, shown in navigation and document metadata.
    #[config(inline_doc)]
    pub title: String,

    /// Raw markup injected verbatim into every page's document head.
    #[config(inline_doc)]
    pub head: String,

    /// Directory containing page sources, relative to the project root.
    #[config(default = "src")]
    pub root: PathBuf,

    /// Canonical site URL; its path component becomes the base path
    /// for subdirectory deployments.
    pub base: Option<String>,

    /// Output directory for the generated site, relative to the project root.
    #[config(default = "dist")]
    pub output: PathBuf,

    /// Enable previous/next pager links between pages.
    pub pager: bool,

    /// Enable the client-side search index.
    pub search: bool,

    /// Table-of-contents settings.
    #[config(sub)]
    pub toc: TocConfig,

    /// Ordered navigation entries; declaration order is display order.
    #[config(skip)]
    pub pages: Vec<PageEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cli: None,
            config_path: PathBuf::new(),
            project_dir: PathBuf::new(),
            duplicates: ValidateLevel::default(),
            title: String::new(),
            head: String::new(),
            root: PathBuf::new(),
            base: None,
            output: PathBuf::from("dist"),
            pager: true,
            search: false,
            toc: TocConfig::default(),
            pages: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find config file.
    /// The project root is determined by the config file's parent directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        // Validate config existence (skip for init)
        if !cli.is_init() && !exists {
            log!(
                "error";
                "Config file '{}' not found. Run 'siteconf init' to create a new site.",
                cli.config.display()
            );
            std::process::exit(1);
        }

        // Load or create default config
        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        // Validate raw paths before normalization
        if !cli.is_init() {
            config.validate_paths()?;
        }

        // Set paths and apply CLI options
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        // Full validation (skip for init: no config file yet)
        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        match &cli.command {
            Commands::Init {
                name: Some(name), ..
            } => {
                let path = cwd.join(name).join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            Commands::Init { name: None, .. } => {
                let path = cwd.join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            _ => {
                // Search upward from cwd
                match find_config_file(&cli.config) {
                    Some(path) => Ok((path, true)),
                    None => Ok((cwd.join(&cli.config), false)),
                }
            }
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        // Resolve project directory
        let project_dir = match &cli.command {
            Commands::Init {
                name: Some(name), ..
            } => std::env::current_dir().unwrap_or_default().join(name),
            Commands::Init { name: None, .. } => std::env::current_dir().unwrap_or_default(),
            _ => self
                .config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        self.project_dir = crate::utils::path::normalize_path(&project_dir);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);
        self.apply_command_options(cli);
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
            if !Self::prompt_continue()? {
                bail!("Aborted due to unknown config fields");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // Show only filename (site.toml) since it's always at the project root
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        // Default no (empty input), explicit "y" or "yes" to continue
        Ok(input == "y" || input == "yes")
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Get the project directory (parent of the config file)
    pub fn get_project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Absolute path of the page source directory (`root`).
    pub fn source_dir(&self) -> PathBuf {
        crate::utils::path::normalize_path(&self.project_dir.join(&self.root))
    }

    /// Absolute path of the output directory.
    pub fn output_dir(&self) -> PathBuf {
        crate::utils::path::normalize_path(&self.project_dir.join(&self.output))
    }

    /// Base path derived from the `base` URL, for subdirectory deployments.
    ///
    /// `base = "https://example.github.io/my-talk"` yields `Some("my-talk")`.
    pub fn base_path(&self) -> Option<String> {
        self.base
            .as_deref()
            .and_then(url_path_component)
            .filter(|path| !path.is_empty())
    }

    /// All page paths in navigation order, sections flattened.
    pub fn page_paths(&self) -> Vec<String> {
        flatten(&self.pages)
            .iter()
            .map(|page| page.path.trim_start_matches('/').to_string())
            .collect()
    }

    /// Get CLI arguments reference
    pub const fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Validate { args } => {
                crate::logger::set_verbose(args.verbose);
                if args.strict {
                    self.duplicates = ValidateLevel::Error;
                }
            }
            Commands::Init { .. } => {}
            // Query command doesn't modify config
            Commands::Query { .. } => {}
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    ///
    /// This must be called before `finalize()`: once the project directory
    /// is resolved it is no longer possible to tell whether the user wrote
    /// an absolute path in the config.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.root.is_absolute() {
            diag.error_with_hint(
                Self::FIELDS.root,
                format!("'{}' is absolute; root must be relative", self.root.display()),
                "use a path relative to the project root, e.g.: \"src\"",
            );
        }
        if self.output.is_absolute() {
            diag.error_with_hint(
                Self::FIELDS.output,
                format!(
                    "'{}' is absolute; output must be relative",
                    self.output.display()
                ),
                "use a path relative to the project root, e.g.: \"dist\"",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate the configuration.
    ///
    /// Collects all validation errors and returns them at once; warnings
    /// are printed in one grouped batch.
    pub fn validate(&self) -> Result<()> {
        let diag = self.collect_diagnostics();

        // Print collected warnings (grouped display)
        diag.print_warnings();

        // Return all collected errors
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Run all checks and return the raw findings.
    fn collect_diagnostics(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();

        self.validate_required(&mut diag);
        self.validate_base(&mut diag);
        self.toc.validate(&mut diag);
        pages::validate(&self.pages, self.duplicates, &mut diag);

        diag
    }

    /// Check required fields (`title`, `root`).
    fn validate_required(&self, diag: &mut ConfigDiagnostics) {
        if self.title.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.title,
                "required field is missing or empty",
                "set title, e.g.: \"2024 Miller Introduction\"",
            );
        }
        if self.root.as_os_str().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.root,
                "required field is missing or empty",
                "set root to the page source directory, e.g.: \"src\"",
            );
        }
    }

    /// Check `base` is a well-formed http(s) URL.
    fn validate_base(&self, diag: &mut ConfigDiagnostics) {
        let Some(base) = &self.base else { return };

        match url::Url::parse(base) {
            Ok(parsed) => {
                // Must be http or https
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.base,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                // Must have a valid host
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::FIELDS.base,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::FIELDS.base,
                    format!("invalid URL: {}", e),
                    "use format like https://example.com",
                );
            }
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with the minimal required top-level fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("title = \"Test\"\nroot = \"src\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_literal() {
        let config = SiteConfig::from_str(
            r#"title = "2024 Miller Introduction"
root = "src"

[[pages]]
name = "About This Presentation"
path = "about"
"#,
        )
        .unwrap();

        assert_eq!(config.title, "2024 Miller Introduction");
        assert_eq!(config.root, PathBuf::from("src"));
        assert_eq!(config.pages.len(), 1);
        match &config.pages[0] {
            PageEntry::Page(page) => {
                assert_eq!(page.name, "About This Presentation");
                assert_eq!(page.path, "about");
            }
            PageEntry::Section(_) => panic!("expected page"),
        }
        assert!(config.collect_diagnostics().into_result().is_ok());
    }

    #[test]
    fn test_pages_order_preserved() {
        let config = test_parse_config(
            r#"[[pages]]
name = "Inverse Scattering Problem"
path = "inverse-scattering-problem"

[[pages]]
name = "Proximal Gradient Methods"
path = "proximal-gradient-methods"

[[pages]]
name = "Iterative Ptychography"
path = "iterative-ptychography"

[[pages]]
name = "About This Presentation"
path = "about"
"#,
        );

        assert_eq!(
            config.page_paths(),
            [
                "inverse-scattering-problem",
                "proximal-gradient-methods",
                "iterative-ptychography",
                "about"
            ]
        );
    }

    #[test]
    fn test_missing_title_fails() {
        let config = SiteConfig::from_str("root = \"src\"").unwrap();
        let diag = config.collect_diagnostics();
        assert!(diag.has_errors());
        assert!(diag.errors().iter().any(|e| e.field.as_str() == "title"));
    }

    #[test]
    fn test_missing_root_fails() {
        let config = SiteConfig::from_str("title = \"Test\"").unwrap();
        let diag = config.collect_diagnostics();
        assert!(diag.has_errors());
        assert!(diag.errors().iter().any(|e| e.field.as_str() == "root"));
    }

    #[test]
    fn test_empty_pages_ok() {
        let config = test_parse_config("pages = []");
        assert!(config.pages.is_empty());
        assert!(config.collect_diagnostics().into_result().is_ok());
    }

    #[test]
    fn test_head_defaults_to_empty() {
        let config = test_parse_config("");
        assert_eq!(config.head, "");
    }

    #[test]
    fn test_head_passed_through_verbatim() {
        let config = test_parse_config(
            "head = '<link rel=\"icon\" type=\"image/png\" href=\"/assets/favicon.png\">'",
        );
        assert_eq!(
            config.head,
            "<link rel=\"icon\" type=\"image/png\" href=\"/assets/favicon.png\">"
        );
    }

    #[test]
    fn test_duplicate_paths_warn_by_default() {
        let config = test_parse_config(
            "[[pages]]\nname = \"A\"\npath = \"x\"\n\n[[pages]]\nname = \"B\"\npath = \"x\"",
        );
        assert_eq!(config.duplicates, ValidateLevel::Warn);

        let diag = config.collect_diagnostics();
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
        // Both entries retained
        assert_eq!(config.page_paths(), ["x", "x"]);
    }

    #[test]
    fn test_duplicate_paths_fail_in_strict_mode() {
        let mut config = test_parse_config(
            "[[pages]]\nname = \"A\"\npath = \"x\"\n\n[[pages]]\nname = \"B\"\npath = \"x\"",
        );
        config.duplicates = ValidateLevel::Error;

        let diag = config.collect_diagnostics();
        assert!(diag.has_errors());
    }

    #[test]
    fn test_absolute_root_rejected() {
        let config = SiteConfig::from_str("title = \"Test\"\nroot = \"/srv/site\"").unwrap();
        assert!(config.validate_paths().is_err());
    }

    #[test]
    fn test_base_path_extraction() {
        let config = test_parse_config("base = \"https://example.github.io/my-talk\"");
        assert!(config.collect_diagnostics().into_result().is_ok());
        assert_eq!(config.base_path(), Some("my-talk".to_string()));

        // Root deployment: no base path
        let config = test_parse_config("base = \"https://example.com\"");
        assert_eq!(config.base_path(), None);
    }

    #[test]
    fn test_invalid_base_rejected() {
        let config = test_parse_config("base = \"ftp://example.com\"");
        let diag = config.collect_diagnostics();
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("scheme"));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result: Result<SiteConfig, _> = toml::from_str("[toc\nshow = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();

        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.title, "");
        assert_eq!(config.head, "");
        assert_eq!(config.output, PathBuf::from("dist"));
        assert!(config.pager);
        assert!(!config.search);
        assert_eq!(config.duplicates, ValidateLevel::Warn);
    }

    #[test]
    fn test_strict_flag_raises_duplicate_level() {
        use clap::Parser;

        let cli: &'static Cli =
            Box::leak(Box::new(Cli::parse_from(["siteconf", "validate", "--strict"])));
        let mut config = test_parse_config("");
        config.apply_command_options(cli);
        assert_eq!(config.duplicates, ValidateLevel::Error);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "title = \"Test\"\nroot = \"src\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        // Config should parse successfully
        assert_eq!(config.title, "Test");

        // Unknown fields should be collected
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "title = \"Test\"\nroot = \"src\"";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }
}
