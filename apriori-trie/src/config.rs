//! Run configuration read from `.apriori_config`.
//!
//! ```toml
//! quiet = false
//! store_input = true
//! size_threshold = 0   # 0 means unbounded
//! ```
//!
//! Nothing here is fatal: a missing file, invalid TOML or a value of the
//! wrong type is reported with a warning and the default is used instead.
//!
//! The older positional layout (two comment lines followed by the quiet,
//! store_input and size_threshold values, one per line) is not TOML. Such a
//! file is reported like any other parse error and every value falls back
//! to its default; rewrite it with the keys above.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::AprioriError;

pub const DEFAULT_CONFIG_FILE: &str = ".apriori_config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningConfig {
    /// Suppress progress messages.
    pub quiet: bool,
    /// Keep the reduced baskets in memory between passes.
    pub store_input: bool,
    /// Largest itemset size to mine.
    pub size_threshold: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            store_input: true,
            size_threshold: None,
        }
    }
}

/// File contents before type checking, so one bad value does not discard
/// the others.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    quiet: Option<toml::Value>,
    store_input: Option<toml::Value>,
    size_threshold: Option<toml::Value>,
}

impl MiningConfig {
    /// Loads `path`, warning about and replacing anything unusable.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_lossy(&content, &path.display().to_string()),
            Err(_) => {
                warn!(
                    path = %path.display(),
                    "There is no configuration file, default values are used!"
                );
                Self::default()
            }
        }
    }

    /// Parses `content`, falling back to defaults value by value.
    pub fn from_toml_lossy(content: &str, origin: &str) -> Self {
        let raw: RawConfig = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(e) => {
                let error = AprioriError::Config {
                    path: origin.to_string(),
                    message: e.to_string(),
                };
                warn!(
                    %error,
                    "default values are used; the configuration file must be TOML \
                     with `quiet`, `store_input` and `size_threshold` keys"
                );
                return Self::default();
            }
        };

        let defaults = Self::default();
        Self {
            quiet: read_bool(raw.quiet, "quiet", defaults.quiet),
            store_input: read_bool(raw.store_input, "store_input", defaults.store_input),
            size_threshold: read_size(raw.size_threshold),
        }
    }
}

fn read_bool(value: Option<toml::Value>, key: &str, default: bool) -> bool {
    match value {
        None => default,
        Some(toml::Value::Boolean(flag)) => flag,
        Some(toml::Value::Integer(0)) => false,
        Some(toml::Value::Integer(1)) => true,
        Some(other) => {
            warn!(key, value = %other, default, "Failed to read value from the configuration file!");
            default
        }
    }
}

fn read_size(value: Option<toml::Value>) -> Option<usize> {
    match value {
        None => None,
        Some(toml::Value::Integer(size)) if size >= 0 => usize::try_from(size)
            .ok()
            .filter(|&size| size > 0),
        Some(other) => {
            warn!(
                key = "size_threshold",
                value = %other,
                "Failed to read value from the configuration file! Size is unbounded."
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config =
            MiningConfig::from_toml_lossy("quiet = true\nstore_input = false\nsize_threshold = 3\n", "test");
        assert_eq!(
            config,
            MiningConfig {
                quiet: true,
                store_input: false,
                size_threshold: Some(3),
            }
        );
    }

    #[test]
    fn test_malformed_value_keeps_others() {
        let config =
            MiningConfig::from_toml_lossy("quiet = \"loud\"\nstore_input = 0\nsize_threshold = -2\n", "test");
        assert!(!config.quiet);
        assert!(!config.store_input);
        assert_eq!(config.size_threshold, None);
    }

    #[test]
    fn test_invalid_toml_uses_defaults() {
        let config = MiningConfig::from_toml_lossy("quiet = = true", "test");
        assert_eq!(config, MiningConfig::default());
    }

    #[test]
    fn test_positional_layout_falls_back_to_defaults() {
        let positional = "This is the configuration file of APRIORI\n\
                          quiet store_input size_threshold\n1\n0\n3\n";
        assert_eq!(
            MiningConfig::from_toml_lossy(positional, "test"),
            MiningConfig::default()
        );
    }

    #[test]
    fn test_zero_size_is_unbounded() {
        let config = MiningConfig::from_toml_lossy("size_threshold = 0", "test");
        assert_eq!(config.size_threshold, None);
    }
}
