//! siteconf - configuration front-end for a static-site framework.
//!
//! Loads and validates `site.toml`, then exposes the normalized config to
//! the rendering pipeline and to external tooling.

#![allow(dead_code)]

mod cli;
mod config;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(SiteConfig::load(cli)?);

    match &cli.command {
        Commands::Init { name, dry } => cli::init::new_site(&config, name.is_some(), *dry),
        Commands::Validate { args } => cli::validate::run_validate(&config, args),
        Commands::Query { args } => cli::query::run_query(args, &config),
    }
}
