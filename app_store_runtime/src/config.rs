//! Runtime configuration.
//!
//! Read from an optional YAML file, then overridden by environment
//! variables. Every field has a default, so an empty file (or no file)
//! is a valid configuration.
//!
//! | Field        | Env override         | Default      |
//! |--------------|----------------------|--------------|
//! | `app_key`    | `APP_STORE_KEY`      | `app-store`  |
//! | `data_dir`   | `APP_STORE_DATA_DIR` | `./data`     |
//! | `environment`| `APP_STORE_ENV`      | `development`|
//! | `log_filter` | `APP_STORE_LOG`      | `info`       |

use std::path::{Path, PathBuf};

use serde::Deserialize;

use app_store_kernel::StoreOptions;

use crate::error::ConfigError;

pub const ENV_KEY: &str = "APP_STORE_KEY";
pub const ENV_DATA_DIR: &str = "APP_STORE_DATA_DIR";
pub const ENV_ENVIRONMENT: &str = "APP_STORE_ENV";
pub const ENV_LOG: &str = "APP_STORE_LOG";

/// Deployment environment. Everything except production runs strict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Invalid(format!(
                "unknown environment {:?}",
                other
            ))),
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Record key in the persistence backend; also the record file stem.
    pub app_key: String,
    /// Directory holding persisted records.
    pub data_dir: PathBuf,
    pub environment: Environment,
    /// `tracing-subscriber` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            app_key: "app-store".to_string(),
            data_dir: PathBuf::from("./data"),
            environment: Environment::Development,
            log_filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load from a YAML file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML text and validate. Blank text yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `APP_STORE_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any lookup; `apply_env_overrides` passes the
    /// process environment.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(key) = lookup(ENV_KEY) {
            self.app_key = key;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            self.environment = Environment::parse(&env)?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_key.trim().is_empty() {
            return Err(ConfigError::Invalid("app_key must not be empty".to_string()));
        }
        if self
            .app_key
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
        {
            return Err(ConfigError::Invalid(format!(
                "app_key {:?} must match [A-Za-z0-9._-]+",
                self.app_key
            )));
        }
        Ok(())
    }

    /// Store options implied by the environment.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            strict: !self.environment.is_production(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_yaml_is_all_defaults() {
        assert_eq!(RuntimeConfig::from_yaml("").unwrap(), RuntimeConfig::default());
        assert!(RuntimeConfig::default().store_options().strict);
    }

    #[test]
    fn yaml_fields_override_defaults() {
        let config = RuntimeConfig::from_yaml(
            "app_key: desktop-client\nenvironment: production\ndata_dir: /var/lib/client\n",
        )
        .unwrap();
        assert_eq!(config.app_key, "desktop-client");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/client"));
        assert_eq!(config.log_filter, "info");
        assert!(!config.store_options().strict);
    }

    #[test]
    fn unknown_fields_and_bad_keys_are_rejected() {
        assert!(matches!(
            RuntimeConfig::from_yaml("colour: blue\n"),
            Err(ConfigError::Yaml { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("app_key: \"../escape\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("app_key: \"\"\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = RuntimeConfig::default()
            .apply_overrides(|name| match name {
                ENV_ENVIRONMENT => Some("prod".to_string()),
                ENV_KEY => Some("other-app".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.app_key, "other-app");

        let err = RuntimeConfig::default()
            .apply_overrides(|name| (name == ENV_ENVIRONMENT).then(|| "staging".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
