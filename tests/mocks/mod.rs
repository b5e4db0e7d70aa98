use std::sync::{Arc, Mutex};

use url::Url;
use urlsum::page::PageFetcher;
use urlsum::summarize::CompletionClient;
use urlsum::transcript::TranscriptService;
use urlsum::{Credential, Fragment};

#[derive(Clone, Default)]
pub struct MockTranscripts {
    pub fragments: Vec<String>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub fail_with: Option<String>,
}

impl MockTranscripts {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl TranscriptService for MockTranscripts {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> eyre::Result<Vec<Fragment>> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));
        if let Some(ref msg) = self.fail_with {
            return Err(eyre::eyre!("{}", msg));
        }
        Ok(self
            .fragments
            .iter()
            .enumerate()
            .map(|(i, text)| Fragment {
                text: text.clone(),
                start: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockPages {
    pub html: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockPages {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl PageFetcher for MockPages {
    async fn fetch(&self, url: &Url) -> eyre::Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(eyre::eyre!("{}", msg));
        }
        Ok(self.html.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockCompletions {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockCompletions {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl CompletionClient for MockCompletions {
    async fn complete(&self, _credential: &Credential, prompt: &str) -> eyre::Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(eyre::eyre!("{}", msg));
        }
        Ok(self.reply.clone())
    }
}
