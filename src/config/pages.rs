//! `[[pages]]` navigation entries.
//!
//! The navigation is an ordered list; declaration order is the display
//! order the framework renders. An entry is either a page or a section
//! grouping further entries:
//!
//! ```toml
//! [[pages]]
//! name = "About This Presentation"
//! path = "about"
//!
//! [[pages]]
//! name = "Methods"
//! open = true
//! pages = [
//!     { name = "Proximal Gradient Methods", path = "proximal-gradient-methods" },
//! ]
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConfigDiagnostics, FieldPath};

// ============================================================================
// Entry types
// ============================================================================

/// One navigation entry: a page link or a collapsible section.
///
/// Untagged: a table with a `pages` key is a section, otherwise a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageEntry {
    Section(PageSection),
    Page(Page),
}

/// A single page link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Label shown to site visitors.
    pub name: String,
    /// Source location relative to `root`, without leading slash or
    /// file extension.
    pub path: String,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
        }
    }
}

/// A named group of entries, rendered as a collapsible nav section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSection {
    /// Section label shown to site visitors.
    #[serde(default)]
    pub name: String,
    /// Whether the section starts expanded.
    #[serde(default = "default_open")]
    pub open: bool,
    /// Entries inside the section, in display order.
    pub pages: Vec<PageEntry>,
}

const fn default_open() -> bool {
    true
}

// ============================================================================
// Validation level
// ============================================================================

/// How to treat non-fatal navigation findings (duplicate paths).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidateLevel {
    /// Treat findings as errors (load fails).
    Error,
    /// Report findings as warnings and keep the entries.
    #[default]
    Warn,
}

// ============================================================================
// Validation
// ============================================================================

/// Validate the whole navigation tree.
///
/// # Checks
/// - every page `path` is non-empty (error)
/// - duplicate paths across the tree (error or warning per `level`;
///   the duplicate entry is retained either way)
/// - leading slashes and file extensions in paths (warning)
/// - unnamed entries and empty sections (warning)
pub(crate) fn validate(pages: &[PageEntry], level: ValidateLevel, diag: &mut ConfigDiagnostics) {
    let mut seen = FxHashSet::default();
    walk(pages, "pages", level, &mut seen, diag);
}

fn walk(
    entries: &[PageEntry],
    prefix: &str,
    level: ValidateLevel,
    seen: &mut FxHashSet<String>,
    diag: &mut ConfigDiagnostics,
) {
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            PageEntry::Page(page) => {
                validate_page(page, &format!("{prefix}[{i}]"), level, seen, diag);
            }
            PageEntry::Section(section) => {
                if section.name.is_empty() {
                    diag.warn(
                        FieldPath::indexed(format!("{prefix}[{i}].name")),
                        "navigation section has no display name",
                    );
                }
                if section.pages.is_empty() {
                    diag.warn(
                        FieldPath::indexed(format!("{prefix}[{i}].pages")),
                        "navigation section is empty",
                    );
                }
                walk(
                    &section.pages,
                    &format!("{prefix}[{i}].pages"),
                    level,
                    seen,
                    diag,
                );
            }
        }
    }
}

fn validate_page(
    page: &Page,
    at: &str,
    level: ValidateLevel,
    seen: &mut FxHashSet<String>,
    diag: &mut ConfigDiagnostics,
) {
    let path_field = FieldPath::indexed(format!("{at}.path"));

    if page.name.is_empty() {
        diag.warn(
            FieldPath::indexed(format!("{at}.name")),
            "navigation entry has no display name",
        );
    }

    if page.path.is_empty() {
        diag.error_with_hint(
            path_field,
            "page path must not be empty",
            "set path to the page's source location, e.g.: \"about\"",
        );
        return;
    }

    if page.path.starts_with('/') {
        diag.warn(
            path_field,
            "leading slash is ignored; paths are resolved relative to `root`",
        );
    }

    if Path::new(&page.path).extension().is_some() {
        diag.warn(
            path_field,
            format!(
                "page paths are extension-less; did you mean \"{}\"?",
                page.path
                    .rsplit_once('.')
                    .map(|(stem, _)| stem)
                    .unwrap_or(&page.path)
            ),
        );
    }

    // Duplicates are matched on the normalized path; the entry stays in
    // the navigation regardless of level.
    let key = page.path.trim_start_matches('/').to_string();
    if !seen.insert(key) {
        let message = format!("duplicate page path '{}' produces ambiguous navigation", page.path);
        match level {
            ValidateLevel::Error => diag.error(path_field, message),
            ValidateLevel::Warn => diag.warn(path_field, message),
        }
    }
}

// ============================================================================
// Flattening
// ============================================================================

/// All page links in navigation order, sections flattened depth-first.
pub fn flatten(entries: &[PageEntry]) -> Vec<&Page> {
    let mut pages = Vec::new();
    collect(entries, &mut pages);
    pages
}

fn collect<'a>(entries: &'a [PageEntry], out: &mut Vec<&'a Page>) {
    for entry in entries {
        match entry {
            PageEntry::Page(page) => out.push(page),
            PageEntry::Section(section) => collect(&section.pages, out),
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_page_entry_parsing() {
        let config = test_parse_config(
            r#"[[pages]]
name = "Inverse Scattering Problem"
path = "inverse-scattering-problem"

[[pages]]
name = "Methods"
pages = [
    { name = "Proximal Gradient Methods", path = "proximal-gradient-methods" },
    { name = "Iterative Ptychography", path = "iterative-ptychography" },
]
"#,
        );

        assert_eq!(config.pages.len(), 2);
        assert!(matches!(config.pages[0], PageEntry::Page(_)));
        match &config.pages[1] {
            PageEntry::Section(section) => {
                assert_eq!(section.name, "Methods");
                assert!(section.open);
                assert_eq!(section.pages.len(), 2);
            }
            PageEntry::Page(_) => panic!("expected section"),
        }
    }

    #[test]
    fn test_flatten_preserves_order() {
        let config = test_parse_config(
            r#"[[pages]]
name = "A"
path = "a"

[[pages]]
name = "Group"
pages = [
    { name = "B", path = "b" },
    { name = "C", path = "c" },
]

[[pages]]
name = "D"
path = "d"
"#,
        );

        let order: Vec<_> = flatten(&config.pages).iter().map(|p| p.path.as_str()).collect();
        assert_eq!(order, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_path_is_error() {
        let mut diag = ConfigDiagnostics::new();
        let pages = vec![PageEntry::Page(Page {
            name: "About".into(),
            path: String::new(),
        })];

        validate(&pages, ValidateLevel::Warn, &mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].field.as_str().contains("pages[0].path"));
    }

    #[test]
    fn test_duplicate_path_warn_level() {
        let mut diag = ConfigDiagnostics::new();
        let pages = vec![
            PageEntry::Page(Page {
                name: "First".into(),
                path: "x".into(),
            }),
            PageEntry::Page(Page {
                name: "Second".into(),
                path: "x".into(),
            }),
        ];

        validate(&pages, ValidateLevel::Warn, &mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
        assert!(diag.warnings()[0].1.contains("duplicate"));
    }

    #[test]
    fn test_duplicate_path_error_level() {
        let mut diag = ConfigDiagnostics::new();
        let pages = vec![
            PageEntry::Page(Page {
                name: "First".into(),
                path: "x".into(),
            }),
            PageEntry::Page(Page {
                name: "Second".into(),
                path: "x".into(),
            }),
        ];

        validate(&pages, ValidateLevel::Error, &mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("duplicate"));
    }

    #[test]
    fn test_duplicate_detected_across_sections() {
        let mut diag = ConfigDiagnostics::new();
        let pages = vec![
            PageEntry::Page(Page {
                name: "Top".into(),
                path: "about".into(),
            }),
            PageEntry::Section(PageSection {
                name: "Group".into(),
                open: true,
                pages: vec![PageEntry::Page(Page {
                    name: "Nested".into(),
                    path: "about".into(),
                })],
            }),
        ];

        validate(&pages, ValidateLevel::Error, &mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].field.as_str().contains("pages[1].pages[0].path"));
    }

    #[test]
    fn test_leading_slash_and_extension_warn() {
        let mut diag = ConfigDiagnostics::new();
        let pages = vec![
            PageEntry::Page(Page {
                name: "A".into(),
                path: "/about".into(),
            }),
            PageEntry::Page(Page {
                name: "B".into(),
                path: "notes.md".into(),
            }),
        ];

        validate(&pages, ValidateLevel::Warn, &mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 2);
        assert!(diag.warnings()[0].1.contains("leading slash"));
        assert!(diag.warnings()[1].1.contains("\"notes\""));
    }

    #[test]
    fn test_empty_section_warns() {
        let mut diag = ConfigDiagnostics::new();
        let pages = vec![PageEntry::Section(PageSection {
            name: "Empty".into(),
            open: true,
            pages: Vec::new(),
        })];

        validate(&pages, ValidateLevel::Warn, &mut diag);
        assert!(!diag.has_errors());
        assert!(diag.warnings().iter().any(|(_, m)| m.contains("empty")));
    }
}
