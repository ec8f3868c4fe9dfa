//! Command-line interface module.

mod args;
pub mod init;
pub mod query;
pub mod validate;

pub use args::{Cli, Commands, QueryArgs, ValidateArgs};
