use std::future::Future;

use eyre::{Result, bail};
use log::debug;

use crate::Credential;

/// A remote model that turns a prompt into generated text
pub trait CompletionClient {
    fn complete(&self, credential: &Credential, prompt: &str) -> impl Future<Output = Result<String>>;
}

/// OpenAI-compatible chat completions endpoint (Groq by default)
pub struct ChatCompletions {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl ChatCompletions {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionClient for ChatCompletions {
    async fn complete(&self, credential: &Credential, prompt: &str) -> Result<String> {
        debug!("Requesting completion from {} with model {}", self.base_url, self.model);

        let body = request_body(&self.model, prompt);

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(credential.expose())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("completion API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        extract_completion_text(&json)
    }
}

/// The prompt goes out as a single user message
fn request_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ]
    })
}

fn extract_completion_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    if let Some(message) = json.pointer("/error/message").and_then(|m| m.as_str()) {
        bail!("completion API error: {message}");
    }
    bail!("unexpected completion API response format");
}
