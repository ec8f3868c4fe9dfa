//! Validate command implementation.
//!
//! Config-level validation already runs during load; this command adds the
//! filesystem checks: the source directory exists and every navigation
//! entry has a page source under it.

use std::fmt;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::args::ValidateArgs;
use crate::config::{SiteConfig, flatten};
use crate::utils::{plural_count, plural_s};
use crate::{debug, log};

/// Source file extension the framework renders.
const PAGE_EXT: &str = "md";

/// Execute validate command
pub fn run_validate(config: &SiteConfig, args: &ValidateArgs) -> Result<()> {
    let pages = flatten(&config.pages);
    log!("validate"; "checking {}", plural_count(pages.len(), "page"));

    let mut report = SourceReport::default();

    if args.pages {
        let source_dir = config.source_dir();
        if !source_dir.is_dir() {
            log!(
                "error";
                "source directory '{}' does not exist",
                config.root.display()
            );
            std::process::exit(1);
        }

        for page in &pages {
            let rel = format!("{}.{}", page.path.trim_start_matches('/'), PAGE_EXT);
            let file = source_dir.join(&rel);
            debug!("validate"; "checking {}", file.display());
            if !file.exists() {
                report.add(&page.name, rel);
            }
        }
    }

    report.print();
    log!("validate"; "{report}");

    if !report.is_empty() && args.strict {
        std::process::exit(1);
    }

    Ok(())
}

// ============================================================================
// Report
// ============================================================================

/// Missing page sources, keyed by navigation label.
#[derive(Debug, Default)]
struct SourceReport {
    missing: Vec<(String, String)>,
}

impl SourceReport {
    fn add(&mut self, name: &str, source: String) {
        self.missing.push((name.to_string(), source));
    }

    fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// Print the full report to stderr.
    fn print(&self) {
        if self.missing.is_empty() {
            return;
        }
        eprintln!();

        let count = self.missing.len();
        eprintln!(
            "{} {}",
            "sources".red().bold(),
            format!("({count} missing file{})", plural_s(count)).dimmed()
        );

        for (name, source) in &self.missing {
            eprintln!("{}{}{}", "[".dimmed(), name.cyan(), "]".dimmed());
            eprintln!("{} {}", "→".red(), source);
        }
        eprintln!();
    }
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.missing.len();
        if count == 0 {
            write!(f, "{}", "all checks passed".green())
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                count.to_string().red().bold(),
                format!("missing source{}", plural_s(count)).dimmed()
            )
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display_empty() {
        let report = SourceReport::default();
        assert!(report.is_empty());
        assert!(format!("{report}").contains("all checks passed"));
    }

    #[test]
    fn test_report_display_missing() {
        let mut report = SourceReport::default();
        report.add("About This Presentation", "about.md".to_string());
        assert!(!report.is_empty());

        let display = format!("{report}");
        assert!(display.contains("1"));
        assert!(display.contains("missing source"));
    }
}
