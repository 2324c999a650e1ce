// ── Core error types ──
//
// User-facing errors from flowgate-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<flowgate_api::Error>`
// impl folds every transport-layer failure into `ControllerUnavailable`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution ───────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("No route between {src} and {dst}")]
    NoRoute { src: String, dst: String },

    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller unavailable: {reason}")]
    ControllerUnavailable { reason: String },

    // ── Policy ───────────────────────────────────────────────────────
    #[error("Student '{student}' is not authorized")]
    Unauthorized { student: String },

    #[error("Service '{service}' is not offered by server '{server}'")]
    ServiceNotOffered { service: String, server: String },

    // ── Provisioning ─────────────────────────────────────────────────
    #[error("{failed} of {total} flow rules failed to install")]
    PartialInstall { failed: usize, total: usize },

    #[error("Connection not found: {handler}")]
    ConnectionNotFound { handler: String },

    // ── Catalog / configuration ──────────────────────────────────────
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn not_found(entity: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Returns `true` when re-invoking the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ControllerUnavailable { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<flowgate_api::Error> for CoreError {
    fn from(err: flowgate_api::Error) -> Self {
        match err {
            flowgate_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                CoreError::ControllerUnavailable {
                    reason: format!("{url}: {e}"),
                }
            }
            flowgate_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            flowgate_api::Error::ClientBuild(message) => CoreError::Config { message },
            flowgate_api::Error::Timeout { timeout_secs } => CoreError::ControllerUnavailable {
                reason: format!("request timed out after {timeout_secs}s"),
            },
            flowgate_api::Error::Status { status, body } => CoreError::ControllerUnavailable {
                reason: format!("HTTP {status}: {body}"),
            },
            flowgate_api::Error::FlowRejected { name, message } => {
                CoreError::ControllerUnavailable {
                    reason: format!("flow '{name}' rejected: {message}"),
                }
            }
            flowgate_api::Error::Deserialization { message, body: _ } => {
                CoreError::ControllerUnavailable {
                    reason: format!("unexpected response: {message}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_maps_to_controller_unavailable() {
        let err: CoreError = flowgate_api::Error::Timeout { timeout_secs: 10 }.into();
        assert!(matches!(err, CoreError::ControllerUnavailable { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn non_success_status_maps_to_controller_unavailable() {
        let err: CoreError = flowgate_api::Error::Status {
            status: 502,
            body: "bad gateway".into(),
        }
        .into();
        match err {
            CoreError::ControllerUnavailable { reason } => assert!(reason.contains("502")),
            other => panic!("expected ControllerUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn not_found_is_permanent() {
        let err = CoreError::not_found("host", "aa:bb:cc:00:00:01");
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "host not found: aa:bb:cc:00:00:01");
    }
}
