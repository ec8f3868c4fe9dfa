//! Query command implementation.
//!
//! Serializes the normalized configuration to JSON so external tooling
//! (or the rendering framework itself) can consume it. Page order is
//! preserved end-to-end.

use std::fs;
use std::io::Write;

use anyhow::Result;
use serde_json::{Map, Value as JsonValue};

use crate::cli::args::QueryArgs;
use crate::config::SiteConfig;
use crate::log;

/// Execute query command
pub fn run_query(args: &QueryArgs, config: &SiteConfig) -> Result<()> {
    let value = serde_json::to_value(config)?;

    let output = match &args.fields {
        Some(fields) => filter_fields(&value, fields),
        None => value,
    };

    let formatted = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    // Output to file or stdout
    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)?;
        writeln!(file, "{}", formatted)?;
        log!("query"; "wrote output to {}", output_path.display());
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

/// Filter to specific top-level keys, in requested order.
///
/// A requested key that doesn't exist is shown as null so callers can
/// tell "absent" from "empty".
fn filter_fields(value: &JsonValue, fields: &[String]) -> JsonValue {
    let mut obj = Map::new();

    if let JsonValue::Object(map) = value {
        for field in fields {
            obj.insert(
                field.clone(),
                map.get(field).cloned().unwrap_or(JsonValue::Null),
            );
        }
    }

    JsonValue::Object(obj)
}

// ============================================================================
// tests
// ============================================================================
