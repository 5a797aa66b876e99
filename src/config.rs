//! Layered registry configuration.
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. A TOML file (explicit path, or `directive-registry.toml` in the
//!    working directory when present)
//! 3. Environment variables with the `DIRECTIVE_REGISTRY_` prefix, `__`
//!    separating nested keys (`DIRECTIVE_REGISTRY_INCLUDE_BUILTINS=false`)
//!
//! ```toml
//! include_builtins = true
//!
//! [[discovery]]
//! paths = ["schema/directives"]
//! namespace_prefix = "app"
//! namespace_root = "schema"
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "directive-registry.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DIRECTIVE_REGISTRY_";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Register the built-in directives before scanning discovery roots.
    #[serde(default = "default_include_builtins")]
    pub include_builtins: bool,
    /// Extra discovery roots, merged after the built-ins.
    #[serde(default)]
    pub discovery: Vec<DiscoveryRoot>,
}

fn default_include_builtins() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            include_builtins: default_include_builtins(),
            discovery: Vec::new(),
        }
    }
}

/// A set of directories sharing one namespace mapping.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DiscoveryRoot {
    pub paths: Vec<PathBuf>,
    #[serde(default)]
    pub namespace_prefix: String,
    /// Directory type identifiers are computed relative to.
    pub namespace_root: PathBuf,
}

impl RegistryConfig {
    /// Load configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if `path` is given but missing,
    /// or `ConfigError::Figment` if a source cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(path)?.extract().map_err(ConfigError::from)
    }

    /// Build the provider chain.
    pub fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.to_path_buf(),
                    });
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_include_builtins() {
        let config = RegistryConfig::default();
        assert!(config.include_builtins);
        assert!(config.discovery.is_empty());
    }

    #[test]
    fn loads_local_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                include_builtins = true

                [[discovery]]
                paths = ["schema/directives"]
                namespace_prefix = "app"
                namespace_root = "schema"
                "#,
            )?;
            jail.set_env("DIRECTIVE_REGISTRY_INCLUDE_BUILTINS", "false");

            let config = RegistryConfig::load(None).map_err(|e| e.to_string())?;
            assert!(!config.include_builtins);
            assert_eq!(config.discovery.len(), 1);
            assert_eq!(config.discovery[0].namespace_prefix, "app");
            assert_eq!(
                config.discovery[0].paths,
                vec![PathBuf::from("schema/directives")]
            );
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_errors() {
        let result = RegistryConfig::load(Some(Path::new("/nonexistent/registry.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
