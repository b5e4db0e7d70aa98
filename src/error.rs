use serde::Serialize;

/// How a condition should be presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Exception,
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("not a valid YouTube or website URL: {0:?}")]
    InvalidUrl(String),

    #[error("GROQ_API_KEY is not set (add it to .env or the environment)")]
    MissingCredential,

    #[error("could not load content from {url}: {reason}")]
    ExtractionFailed { url: String, reason: String },

    #[error("no content found to summarize")]
    NoContent,

    #[error("an unexpected error occurred: {0}")]
    Unexpected(eyre::Report),
}

impl SummarizeError {
    pub fn severity(&self) -> Severity {
        match self {
            SummarizeError::InvalidUrl(_) | SummarizeError::MissingCredential => Severity::Error,
            SummarizeError::ExtractionFailed { .. } | SummarizeError::NoContent => Severity::Warning,
            SummarizeError::Unexpected(_) => Severity::Exception,
        }
    }

    /// Full diagnostic text, including the cause chain for unexpected errors
    pub fn detail(&self) -> String {
        match self {
            SummarizeError::Unexpected(report) => format!("{report:?}"),
            other => other.to_string(),
        }
    }
}
