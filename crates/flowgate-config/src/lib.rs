//! Shared configuration for the flowgate CLI.
//!
//! A TOML file under the platform config directory, overridable through
//! `FLOWGATE_*` environment variables, translated into
//! `flowgate_core::ControllerConfig`. The CLI layers its own flag
//! overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowgate_core::{ControllerConfig, DEFAULT_FLOW_PRIORITY, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// How to reach the SDN controller.
    #[serde(default)]
    pub controller: ControllerSection,

    /// Presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Catalog YAML loaded when no `--catalog` flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ControllerSection {
    /// REST root, e.g. "http://10.20.12.1:8080".
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Priority of installed flow rules.
    #[serde(default = "default_flow_priority")]
    pub flow_priority: u16,

    /// Accept self-signed certificates on https controllers.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
            flow_priority: default_flow_priority(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_flow_priority() -> u16 {
    DEFAULT_FLOW_PRIORITY
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Build the core's runtime configuration from the `[controller]`
    /// table.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let section = &self.controller;
        let url: url::Url = section.url.parse().map_err(|_| ConfigError::Validation {
            field: "controller.url".into(),
            reason: format!("invalid URL: {}", section.url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "controller.url".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if section.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "controller.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let tls = if section.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = section.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(ControllerConfig {
            url,
            tls,
            timeout: Duration::from_secs(section.timeout),
            flow_priority: section.flow_priority,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "flowgate", "flowgate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("flowgate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file yields the
/// defaults.
///
/// Nested keys use a double underscore (`FLOWGATE_CONTROLLER__URL`). The
/// flat `FLOWGATE_CONTROLLER`, `FLOWGATE_TIMEOUT`, and `FLOWGATE_CATALOG`
/// variables belong to the CLI flags and are skipped here.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("FLOWGATE_")
                .ignore(&["controller", "timeout", "catalog", "output"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.controller.url, "http://127.0.0.1:8080");
        assert_eq!(config.controller.timeout, 10);
        assert_eq!(config.controller.flow_priority, 40_000);
        assert_eq!(config.defaults.output, "table");
        assert!(config.catalog.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
catalog = "/srv/flowgate/catalog.yaml"

[controller]
url = "http://10.20.12.1:8080"
flow_priority = 45000

[defaults]
output = "json"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.controller.url, "http://10.20.12.1:8080");
        assert_eq!(config.controller.timeout, 10);
        assert_eq!(config.defaults.output, "json");
        assert_eq!(
            config.catalog.as_deref(),
            Some(Path::new("/srv/flowgate/catalog.yaml"))
        );

        let runtime = config.controller_config().unwrap();
        assert_eq!(runtime.url.host_str(), Some("10.20.12.1"));
        assert_eq!(runtime.flow_priority, 45_000);
        assert_eq!(runtime.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn bad_url_fails_validation() {
        let mut config = Config::default();
        config.controller.url = "not a url".into();
        assert!(matches!(
            config.controller_config(),
            Err(ConfigError::Validation { .. })
        ));

        config.controller.url = "ftp://10.0.0.1".into();
        assert!(matches!(
            config.controller_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = Config::default();
        config.controller.timeout = 0;
        assert!(matches!(
            config.controller_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.controller.insecure = true;
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(loaded.controller.insecure);
        assert_eq!(
            loaded.controller_config().unwrap().tls,
            TlsVerification::DangerAcceptInvalid
        );
    }
}
