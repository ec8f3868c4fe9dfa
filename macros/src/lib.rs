//! Proc macros for siteconf.
//!
//! # Config derive macro
//!
//! Generates field path accessors and a TOML template for a config struct.
//!
//! ```ignore
//! #[derive(Config)]
//! #[config(section = "toc")]
//! /// Table-of-contents settings.
//! pub struct TocConfig {
//!     /// Show the table of contents.
//!     pub show: bool,
//!
//!     /// Heading above the table of contents.
//!     #[config(default = "Contents")]
//!     pub label: String,
//! }
//!
//! // Generates:
//! // - TocConfig::FIELDS.show -> FieldPath("toc.show")
//! // - TocConfig::template() -> TOML string with comments
//! // - TocConfig::template_with_header() -> with [section] header
//! ```
//!
//! # Attributes
//!
//! Struct-level:
//! - `#[config(section = "path")]` - TOML section path (empty string for
//!   top-level keys)
//!
//! Field-level:
//! - `#[config(skip)]` - Skip entirely (internal bookkeeping fields)
//! - `#[config(hidden)]` - Keep in FIELDS but hide from template output
//! - `#[config(name = "x")]` - Custom TOML key name
//! - `#[config(default = "x")]` - Value shown in the generated template
//! - `#[config(sub)]` - Nested config struct, templated with its own header
//! - `#[config(inline_doc)]` - Render the doc comment inline after the value
//!
//! # Section inference
//!
//! Without `section` attribute, inferred from struct name:
//! - `TocConfig` → `toc`
//! - `PagesConfig` → `pages`

mod config;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro that generates FIELDS and template().
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    config::derive(&input).into()
}
