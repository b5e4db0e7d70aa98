use crate::Document;

pub const PROMPT_TEMPLATE: &str = "Summarize the following content in approximately 300 words:\n\n{text}";

/// Separator used when more than one document is stuffed into a prompt
const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Fill the template with `text`; no validation or truncation
pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replace("{text}", text)
}

/// Concatenate document texts for single-pass summarization
pub fn combine(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.text())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}
