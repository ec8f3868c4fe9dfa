//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// A type-safe wrapper for config field paths.
///
/// Used with `#[derive(Config)]` to generate compile-time checked
/// field path accessors.
///
/// # Example
///
/// ```ignore
/// #[derive(Config)]
/// #[config(section = "toc")]
/// pub struct TocConfig {
///     pub label: String,
/// }
///
/// // Generated:
/// impl TocConfig {
///     pub const FIELDS: TocConfigFields = ...;
/// }
///
/// // Usage:
/// diag.error(TocConfig::FIELDS.label, "must not be empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Build a field path at runtime (e.g. an indexed `pages[3].path`).
    ///
    /// Leaks the string; only used for diagnostics on failing loads.
    pub fn indexed(path: String) -> Self {
        Self(Box::leak(path.into_boxed_str()))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
