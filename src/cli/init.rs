//! Site initialization command.
//!
//! Creates a new site skeleton: starter `site.toml` generated from the
//! config structs, the page source directory, and ignore files.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::config::SiteConfig;
use crate::log;

/// Default config filename
const CONFIG_FILE: &str = "site.toml";

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Standard site directory structure.
///
/// Matches the template's `root = "src"`.
const SITE_DIRS: &[&str] = &["src", "src/assets"];

/// Create a new site with default structure
///
/// # Steps
/// 1. Validate target directory
/// 2. Create directory structure
/// 3. Write configuration and ignore files
///
/// If `dry_run` is true, only prints the config template to stdout
pub fn new_site(config: &SiteConfig, has_name: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{}", generate_config_template());
        return Ok(());
    }

    let root = config.get_project_dir();
    let mode = if has_name {
        InitMode::NewDir
    } else {
        InitMode::CurrentDir
    };

    if let Err(e) = validate_target(root, mode) {
        log!("error"; "{}", e);
        std::process::exit(1);
    }

    create_structure(root)?;
    write_config(root)?;
    write_ignore_files(root, &config.output)?;

    log!("init"; "Site initialized successfully");
    Ok(())
}

// ============================================================================
// Target validation
// ============================================================================

/// Initialization mode determines validation rules.
#[derive(Debug, Clone, Copy)]
pub enum InitMode {
    /// `siteconf init` - initialize in current directory (must be empty)
    CurrentDir,
    /// `siteconf init <name>` - create new subdirectory (must not exist)
    NewDir,
}

/// Validate target directory for initialization.
///
/// # Rules
/// - `CurrentDir`: directory must be empty (or not exist)
/// - `NewDir`: directory must not exist
fn validate_target(root: &Path, mode: InitMode) -> Result<()> {
    match mode {
        InitMode::CurrentDir => {
            if !is_empty(root)? {
                bail!(
                    "Current directory is not empty.\n\
                     Use `siteconf init <name>` to create in a new subdirectory."
                );
            }
        }
        InitMode::NewDir => {
            if root.exists() {
                bail!(
                    "Directory '{}' already exists.\n\
                     Choose a different name or remove the existing directory.",
                    root.display()
                );
            }
        }
    }
    Ok(())
}

/// Check if directory is empty or doesn't exist.
fn is_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let is_empty = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory '{}'", path.display()))?
        .next()
        .is_none();
    Ok(is_empty)
}

// ============================================================================
// File generation
// ============================================================================

/// Generate site.toml content with comments
pub fn generate_config_template() -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "# siteconf configuration file (v{})\n\n",
        env!("CARGO_PKG_VERSION")
    ));

    // Top-level keys and [toc] section
    out.push_str(&SiteConfig::template());
    out.push('\n');

    // [[pages]] cannot be derived from a struct default; append an example
    out.push_str(PAGES_TEMPLATE);

    out
}

const PAGES_TEMPLATE: &str = "\
# Navigation entries, in display order.
# [[pages]]
# name = \"About This Presentation\"
# path = \"about\"
";

/// Create site directory structure at the given root.
fn create_structure(root: &Path) -> Result<()> {
    if !root.exists() {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create root directory '{}'", root.display()))?;
    }

    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    }

    Ok(())
}

/// Write default site.toml configuration
fn write_config(root: &Path) -> Result<()> {
    let content = generate_config_template();

    let path = root.join(CONFIG_FILE);
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    Ok(())
}

/// Write .gitignore and .ignore files with standard patterns
///
/// Patterns include the output directory and OS-specific files.
fn write_ignore_files(root: &Path, output_dir: &Path) -> Result<()> {
    let output_pattern = Path::new("/").join(output_dir);
    let patterns = [
        output_pattern.to_string_lossy().into_owned(),
        ".DS_Store".to_string(),
    ];

    let content = patterns.join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        // Only create if doesn't exist (don't overwrite user's ignore files)
        if !path.exists() {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
        }
    }

    Ok(())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_contents() {
        let template = generate_config_template();
        assert!(template.contains("title = \"\""));
        assert!(template.contains("root = \"src\""));
        assert!(template.contains("output = \"dist\""));
        assert!(template.contains("[toc]"));
        assert!(template.contains("# [[pages]]"));
        // Starter template must itself parse
        let parsed = SiteConfig::from_str(&template).unwrap();
        assert_eq!(parsed.root, std::path::PathBuf::from("src"));
    }

    #[test]
    fn test_write_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path()).unwrap();

        let config_path = temp.path().join("site.toml");
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("root = \"src\""));
        assert!(content.contains("[toc]"));
    }

    #[test]
    fn test_create_structure() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("my_site");

        create_structure(&root).unwrap();

        assert!(root.join("src").is_dir());
        assert!(root.join("src/assets").is_dir());
    }

    #[test]
    fn test_write_ignore_files() {
        let temp = TempDir::new().unwrap();
        write_ignore_files(temp.path(), Path::new("dist")).unwrap();

        let gitignore = temp.path().join(".gitignore");
        assert!(gitignore.exists());

        let content = fs::read_to_string(&gitignore).unwrap();
        assert!(content.contains("/dist"));
        assert!(content.contains(".DS_Store"));
    }

    #[test]
    fn test_ignore_files_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let gitignore = temp.path().join(".gitignore");
        fs::write(&gitignore, "custom content").unwrap();

        write_ignore_files(temp.path(), Path::new("dist")).unwrap();

        let content = fs::read_to_string(&gitignore).unwrap();
        assert_eq!(content, "custom content");
    }

    #[test]
    fn test_empty_dir_current_mode() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_ok());
    }

    #[test]
    fn test_non_empty_dir_current_mode() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file.txt"), "content").unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_err());
    }

    #[test]
    fn test_existing_dir_new_mode() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::NewDir).is_err());
    }

    #[test]
    fn test_non_existing_dir_new_mode() {
        let temp = TempDir::new().unwrap();
        let new_path = temp.path().join("new_site");
        assert!(validate_target(&new_path, InitMode::NewDir).is_ok());
    }
}
