//! CLI configuration: a thin wrapper around `flowgate_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--controller, --timeout, --catalog, ...).

use std::path::PathBuf;
use std::time::Duration;

use flowgate_core::{Catalog, ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use flowgate_config::{Config, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Translate the config file + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over file values.
pub fn resolve_controller(cfg: &Config, global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let mut resolved = cfg.controller_config()?;

    if let Some(ref url_str) = global.controller {
        resolved.url = url_str.parse().map_err(|_| CliError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        resolved.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        resolved.tls = TlsVerification::DangerAcceptInvalid;
    }

    Ok(resolved)
}

/// The catalog file to use: `--catalog` / `FLOWGATE_CATALOG` first, then
/// the config file.
pub fn catalog_path(cfg: &Config, global: &GlobalOpts) -> Option<PathBuf> {
    global.catalog.clone().or_else(|| cfg.catalog.clone())
}

/// Load the configured catalog, failing when none is configured.
pub fn load_catalog(cfg: &Config, global: &GlobalOpts) -> Result<Catalog, CliError> {
    let path = catalog_path(cfg, global).ok_or_else(|| CliError::NoCatalog {
        path: config_path().display().to_string(),
    })?;
    Ok(Catalog::load(&path)?)
}
