//! Utility modules.

pub mod path;
pub mod plural;

pub use plural::{plural_count, plural_s};
