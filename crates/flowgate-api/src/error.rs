use thiserror::Error;

/// Top-level error type for the `flowgate-api` crate.
///
/// Covers every failure mode when talking to the controller: transport,
/// HTTP status, rejected flow entries, and malformed payloads.
/// `flowgate-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be built (bad CA file, TLS backend failure).
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Controller responses ────────────────────────────────────────
    /// Non-2xx status from the controller.
    #[error("Controller returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The static flow pusher answered but refused the entry.
    #[error("Flow '{name}' rejected by controller: {message}")]
    FlowRejected { name: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
