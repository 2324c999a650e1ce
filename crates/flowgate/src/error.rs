//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use flowgate_config::ConfigError;
use flowgate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAUTHORIZED: i32 = 5;
    pub const PARTIAL_INSTALL: i32 = 6;
    pub const CONTROLLER_UNAVAILABLE: i32 = 7;
    pub const NO_ROUTE: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller unavailable: {reason}")]
    #[diagnostic(
        code(flowgate::controller_unavailable),
        help(
            "Check that the controller is running and reachable.\n\
             Override the URL with --controller or set [controller] url in the config."
        )
    )]
    ControllerUnavailable { reason: String },

    #[error("No route between {src} and {dst}")]
    #[diagnostic(
        code(flowgate::no_route),
        help("The controller knows no path between these attachment points. Check the links between their switches.")
    )]
    NoRoute { src: String, dst: String },

    #[error("{failed} of {total} flow rules failed to install")]
    #[diagnostic(
        code(flowgate::partial_install),
        help("The connection was recorded; part of the path may be missing rules.")
    )]
    PartialInstall { failed: usize, total: usize },

    // ── Policy ───────────────────────────────────────────────────────
    #[error("Student '{student}' is not authorized")]
    #[diagnostic(
        code(flowgate::unauthorized),
        help("Enroll the student in an active course that grants this server and service.")
    )]
    Unauthorized { student: String },

    #[error("Service '{service}' is not offered by server '{server}'")]
    #[diagnostic(
        code(flowgate::service_not_offered),
        help("Run: flowgate catalog servers to see available services")
    )]
    ServiceNotOffered { service: String, server: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(flowgate::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("Catalog error: {message}")]
    #[diagnostic(code(flowgate::catalog))]
    Catalog { message: String },

    #[error("No catalog file given")]
    #[diagnostic(
        code(flowgate::no_catalog),
        help(
            "Pass --catalog <FILE>, set FLOWGATE_CATALOG, or set catalog in {path}"
        )
    )]
    NoCatalog { path: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(flowgate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(flowgate::config),
        help("Check the config file. Run: flowgate config path")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(flowgate::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ControllerUnavailable { .. } => exit_code::CONTROLLER_UNAVAILABLE,
            Self::NoRoute { .. } => exit_code::NO_ROUTE,
            Self::PartialInstall { .. } => exit_code::PARTIAL_INSTALL,
            Self::Unauthorized { .. } => exit_code::UNAUTHORIZED,
            Self::NotFound { .. } | Self::ServiceNotOffered { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NoCatalog { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Catalog { .. } | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, identifier } => CliError::NotFound {
                resource_type: entity,
                identifier,
            },
            CoreError::ConnectionNotFound { handler } => CliError::NotFound {
                resource_type: "connection".into(),
                identifier: handler,
            },
            CoreError::NoRoute { src, dst } => CliError::NoRoute { src, dst },
            CoreError::ControllerUnavailable { reason } => {
                CliError::ControllerUnavailable { reason }
            }
            CoreError::Unauthorized { student } => CliError::Unauthorized { student },
            CoreError::ServiceNotOffered { service, server } => {
                CliError::ServiceNotOffered { service, server }
            }
            CoreError::PartialInstall { failed, total } => {
                CliError::PartialInstall { failed, total }
            }
            CoreError::Catalog { message } => CliError::Catalog { message },
            CoreError::Config { message } => CliError::Validation {
                field: "controller".into(),
                reason: message,
            },
            CoreError::Io(e) => CliError::Io(e),
        }
    }
}
