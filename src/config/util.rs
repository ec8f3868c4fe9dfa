//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Extract the path component from a URL string
///
/// Uses the `url` crate for proper parsing, handling edge cases like
/// port numbers, auth info, and query strings.
///
/// Returns `None` if the URL is invalid
///
/// # Examples
/// ```ignore
/// url_path_component("https://example.github.io/my-talk/") -> Some("my-talk")
/// url_path_component("https://example.com")                -> Some("")
/// url_path_component("invalid")                            -> None
/// ```
pub fn url_path_component(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;

    // Trim leading/trailing slashes so "/talk/" and "talk" compare equal
    let path = parsed.path().trim_matches('/');

    Some(path.to_string())
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/talk/src/notes/   ← cwd
/// /home/user/talk/site.toml    ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // First check if config_name is an absolute path or exists in cwd
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
