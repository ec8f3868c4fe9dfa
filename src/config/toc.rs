//! `[toc]` table-of-contents configuration.

use macros::Config;
use serde::{Deserialize, Serialize};

/// Table-of-contents settings, passed through to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "toc")]
pub struct TocConfig {
    /// Show the table of contents on each page.
    pub show: bool,

    /// Heading displayed above the table of contents.
    #[config(default = "Contents")]
    pub label: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            show: true,
            label: "Contents".into(),
        }
    }
}

impl TocConfig {
    /// Validate table-of-contents settings.
    pub fn validate(&self, diag: &mut crate::config::ConfigDiagnostics) {
        if self.show && self.label.is_empty() {
            diag.warn(
                Self::FIELDS.label,
                "empty label; the table of contents will render without a heading",
            );
        }
    }
}
