use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::page::{self, PageFetcher};
use crate::prompt::{build_prompt, combine};
use crate::summarize::CompletionClient;
use crate::transcript::{self, TranscriptService};
use crate::{Document, Settings, SourceKind, SummarizeError, classify};

/// Where a single request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Idle,
    Validating,
    Extracting,
    Prompting,
    Summarizing,
    Succeeded,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed)
    }

    /// Legal forward transitions; any active stage may fail
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        match (self, next) {
            (Idle, Validating)
            | (Validating, Extracting)
            | (Extracting, Prompting)
            | (Prompting, Summarizing)
            | (Summarizing, Succeeded) => true,
            (Validating | Extracting | Prompting | Summarizing, Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Extracting => "extracting",
            Stage::Prompting => "prompting",
            Stage::Summarizing => "summarizing",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Per-trigger state; a fresh one is created for every run
#[derive(Debug)]
struct Request {
    url: String,
    stage: Stage,
    prompt: Option<String>,
    notices: Vec<SummarizeError>,
}

impl Request {
    fn new(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            stage: Stage::Idle,
            prompt: None,
            notices: Vec::new(),
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal transition {} -> {next}",
            self.stage
        );
        debug!("[{}] {} -> {next}", self.url, self.stage);
        self.stage = next;
    }
}

/// Terminal result of one request
#[derive(Debug)]
pub struct Outcome {
    pub url: String,
    pub stage: Stage,
    /// Prompt sent to the completion service, if summarization was reached
    pub prompt: Option<String>,
    /// Conditions that were recovered from along the way
    pub notices: Vec<SummarizeError>,
    pub result: Result<String, SummarizeError>,
}

impl Outcome {
    pub fn summary(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }

    pub fn error(&self) -> Option<&SummarizeError> {
        self.result.as_ref().err()
    }

    pub fn succeeded(&self) -> bool {
        self.stage == Stage::Succeeded
    }
}

/// URL in, summary out
pub struct Pipeline<T, P, C> {
    settings: Settings,
    transcripts: T,
    pages: P,
    completions: C,
}

impl<T, P, C> Pipeline<T, P, C>
where
    T: TranscriptService,
    P: PageFetcher,
    C: CompletionClient,
{
    pub fn new(settings: Settings, transcripts: T, pages: P, completions: C) -> Self {
        Self {
            settings,
            transcripts,
            pages,
            completions,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one request to a terminal stage; never panics on remote failures
    pub async fn run(&self, url: &str) -> Outcome {
        let mut request = Request::new(url);
        request.advance(Stage::Validating);

        let result = self.drive(&mut request).await;
        match &result {
            Ok(summary) => {
                request.advance(Stage::Succeeded);
                info!("[{}] summary generated ({} chars)", request.url, summary.len());
            }
            Err(e) => {
                request.advance(Stage::Failed);
                match e {
                    SummarizeError::Unexpected(report) => warn!("[{}] failed: {report:?}", request.url),
                    other => info!("[{}] failed: {other}", request.url),
                }
            }
        }

        Outcome {
            url: request.url,
            stage: request.stage,
            prompt: request.prompt,
            notices: request.notices,
            result,
        }
    }

    async fn drive(&self, request: &mut Request) -> Result<String, SummarizeError> {
        let credential = self
            .settings
            .credential
            .as_ref()
            .ok_or(SummarizeError::MissingCredential)?;
        let source = classify(&request.url)?;

        request.advance(Stage::Extracting);
        let documents = match self.extract(&source).await {
            Ok(doc) if doc.is_blank() => {
                debug!("[{}] extracted text is blank", request.url);
                Vec::new()
            }
            Ok(doc) => vec![doc],
            Err(report) => {
                warn!("[{}] extraction failed: {report:#}", request.url);
                request.notices.push(SummarizeError::ExtractionFailed {
                    url: request.url.clone(),
                    reason: format!("{report:#}"),
                });
                Vec::new()
            }
        };
        if documents.is_empty() {
            return Err(SummarizeError::NoContent);
        }

        request.advance(Stage::Prompting);
        let prompt = build_prompt(&combine(&documents));
        request.prompt = Some(prompt.clone());

        request.advance(Stage::Summarizing);
        self.completions
            .complete(credential, &prompt)
            .await
            .map_err(|e| SummarizeError::Unexpected(e.wrap_err("summarization failed")))
    }

    async fn extract(&self, source: &SourceKind) -> eyre::Result<Document> {
        match source {
            SourceKind::Video(url) => transcript::extract(&self.transcripts, url, &self.settings.languages).await,
            SourceKind::Generic(url) => page::extract(&self.pages, url).await,
        }
    }
}
