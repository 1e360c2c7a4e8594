use thiserror::Error;

/// Errors that abort a run.
///
/// Per-ticket problems (ticket not found, ticket in the wrong status) are not
/// errors; they are reported through [`crate::model::outcome::TicketOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required configuration [{field}]")]
    MissingConfig { field: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown operation '{0}'\n  hint: valid operations are: release, verify")]
    UnknownOperation(String),

    #[error("Jira request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed Jira response from {path}: {reason}")]
    MalformedResponse { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
