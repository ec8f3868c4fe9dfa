//! Global read-only config handle.
//!
//! The config is loaded once at startup and never mutated afterwards, so a
//! `OnceLock<Arc<SiteConfig>>` is enough: any number of threads may read the
//! handle without synchronization.

use crate::config::SiteConfig;
use std::sync::{Arc, OnceLock};

/// Global config storage, set once by [`init_config`].
static CONFIG: OnceLock<Arc<SiteConfig>> = OnceLock::new();

/// Install the loaded config as the process-wide handle.
///
/// The first call wins; later calls return the already-installed config.
pub fn init_config(config: SiteConfig) -> Arc<SiteConfig> {
    let arc = Arc::new(config);
    match CONFIG.set(Arc::clone(&arc)) {
        Ok(()) => arc,
        Err(_) => cfg(),
    }
}

/// Shared handle to the loaded config.
///
/// Falls back to the default config when called before [`init_config`]
/// (only reachable from tests).
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG
        .get_or_init(|| Arc::new(SiteConfig::default()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_first_call_wins() {
        let first = init_config(SiteConfig {
            title: "first".into(),
            ..SiteConfig::default()
        });
        let second = init_config(SiteConfig {
            title: "second".into(),
            ..SiteConfig::default()
        });

        assert_eq!(first.title, second.title);
        assert_eq!(cfg().title, first.title);
    }
}
