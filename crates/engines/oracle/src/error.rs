use thiserror::Error;

/// Why the advisor could not provide an answer.
///
/// Every variant is recoverable: the caller falls back to local play or to
/// canned commentary.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// No API key in the environment or configuration
    #[error("no API key configured (set one of {vars})")]
    MissingApiKey { vars: String },

    /// Advisor deliberately disabled
    #[error("advisor unavailable")]
    Unavailable,

    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("advisor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no text
    #[error("advisor returned an empty response")]
    EmptyResponse,

    /// Response text was not the expected JSON
    #[error("malformed advice: {0}")]
    Malformed(#[from] serde_json::Error),

    /// JSON parsed but one of the endpoints is missing
    #[error("advice is missing its {0} square")]
    MissingEndpoint(&'static str),
}
