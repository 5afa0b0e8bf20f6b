use thiserror::Error;

/// Everything that can go wrong between building a request and holding a
/// parsed answer. Missing selections are not errors; see
/// `RecommendationOutcome::Skipped`.
#[derive(Debug, Error)]
pub enum StylistError {
    #[error("request to the Gemini API failed: {0}")]
    Transport(reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini API returned no text")]
    EmptyResponse,

    #[error("recommendation did not match the expected schema: {0}")]
    MalformedRecommendation(String),
}

impl StylistError {
    /// True for failures that happened before any usable reply came back.
    pub fn is_transport(&self) -> bool {
        matches!(self, StylistError::Transport(_) | StylistError::Api { .. })
    }
}

// Request URLs never make it into the message, so nothing that ends up in a
// URL can leak through the logs.
impl From<reqwest::Error> for StylistError {
    fn from(err: reqwest::Error) -> Self {
        StylistError::Transport(err.without_url())
    }
}

pub type StylistResult<T> = Result<T, StylistError>;
