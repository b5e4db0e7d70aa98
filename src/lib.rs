pub mod classify;
pub mod config;
pub mod error;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod prompt;
pub mod summarize;
pub mod transcript;

pub use classify::{SourceKind, classify};
pub use config::{Credential, Settings};
pub use error::{Severity, SummarizeError};
pub use pipeline::{Outcome, Pipeline, Stage};

use serde::Serialize;

/// A single timed utterance from a caption track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Extracted text paired with the URL it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    text: String,
    source: String,
}

impl Document {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accessors() {
        let doc = Document::new("some text", "https://example.com/");
        assert_eq!(doc.text(), "some text");
        assert_eq!(doc.source(), "https://example.com/");
        assert!(!doc.is_blank());
    }

    #[test]
    fn test_document_blank() {
        assert!(Document::new("  \n\t ", "https://example.com/").is_blank());
        assert!(Document::new("", "https://example.com/").is_blank());
    }
}
