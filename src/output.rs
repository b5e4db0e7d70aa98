use crate::{Outcome, Severity, SummarizeError};

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "❌",
        Severity::Warning => "⚠️",
        Severity::Exception => "🚨",
    }
}

fn render_condition(err: &SummarizeError) -> String {
    match err {
        SummarizeError::Unexpected(_) => format!(
            "{} An unexpected error occurred.\n\n{}",
            icon(err.severity()),
            err.detail()
        ),
        other => format!("{} {other}", icon(other.severity())),
    }
}

/// Render an outcome for the terminal: notices first, then the summary or the failure
pub fn render_text(outcome: &Outcome) -> String {
    let mut blocks: Vec<String> = outcome.notices.iter().map(render_condition).collect();

    match &outcome.result {
        Ok(summary) => blocks.push(format!("✅ Summary generated!\n\n{summary}")),
        Err(err) => blocks.push(render_condition(err)),
    }

    blocks.join("\n\n")
}

/// Render an outcome as a single JSON object
pub fn render_json(outcome: &Outcome) -> String {
    let notices: Vec<serde_json::Value> = outcome
        .notices
        .iter()
        .map(|n| {
            serde_json::json!({
                "severity": n.severity(),
                "message": n.to_string(),
            })
        })
        .collect();

    let error = outcome.error().map(|e| {
        serde_json::json!({
            "severity": e.severity(),
            "message": e.to_string(),
            "detail": e.detail(),
        })
    });

    let value = serde_json::json!({
        "url": outcome.url,
        "state": outcome.stage,
        "summary": outcome.summary(),
        "prompt": outcome.prompt,
        "notices": notices,
        "error": error,
    });

    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
