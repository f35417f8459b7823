use thiserror::Error;

/// Errors surfaced while constructing geocoding clients.
///
/// Runtime provider failures are deliberately not represented here: the
/// adapters swallow and log them, reporting `Unresolved` instead, because
/// the orchestrator's fallback chain is the recovery path.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A base URL override did not parse.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
