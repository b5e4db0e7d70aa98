use std::future::Future;

use eyre::Result;
use log::debug;
use scraper::{Html, Node};
use url::Url;

use crate::Document;

/// Elements whose text is never visible on the rendered page
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "figcaption", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "nav", "ol", "p", "pre", "section",
    "table", "td", "th", "tr", "ul",
];

/// Void elements that end the current line of text
const LINE_BREAKS: &[&str] = &["br", "hr"];

/// Anything that can fetch the raw HTML of a page
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>>;
}

/// Plain HTTP GET that tolerates broken TLS setups and identifies as a browser
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Fetching page: {url}");
        let html = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!("Fetched {} bytes from {url}", html.len());
        Ok(html)
    }
}

/// Fetch a page and reduce it to its visible text
pub async fn extract<P: PageFetcher>(fetcher: &P, url: &Url) -> Result<Document> {
    let html = fetcher.fetch(url).await?;
    Ok(Document::new(visible_text(&html), url.as_str()))
}

/// Visible text of an HTML document, one whitespace-collapsed line per block element
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut runs: Vec<(Option<_>, String)> = Vec::new();
    let mut line_break = false;

    for node in doc.tree.root().descendants() {
        let text = match node.value() {
            Node::Text(text) => text,
            Node::Element(el) if LINE_BREAKS.contains(&el.name()) => {
                line_break = true;
                continue;
            }
            _ => continue,
        };
        if node.ancestors().any(|a| element_in(a.value(), HIDDEN_ELEMENTS)) {
            continue;
        }
        let block = node
            .ancestors()
            .find(|a| element_in(a.value(), BLOCK_ELEMENTS))
            .map(|a| a.id());
        match runs.last_mut() {
            Some((last, run)) if *last == block && !line_break => run.push_str(text),
            _ => runs.push((block, text.to_string())),
        }
        line_break = false;
    }

    title(&doc)
        .into_iter()
        .chain(runs.iter().map(|(_, run)| collapse_whitespace(run)))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn element_in(node: &Node, names: &[&str]) -> bool {
    matches!(node, Node::Element(el) if names.contains(&el.name()))
}

fn title(doc: &Html) -> Option<String> {
    let sel = scraper::Selector::parse("head > title").ok()?;
    doc.select(&sel)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticPage(&'static str);

    impl PageFetcher for StaticPage {
        async fn fetch(&self, _url: &Url) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = r#"<html>
<head><title>My  Page</title><style>body { color: red; }</style></head>
<body>
  <h1>Heading</h1>
  <script>var hidden = 1;</script>
  <p>First   paragraph
     continues.</p>
  <noscript>enable js</noscript>
</body>
</html>"#;
        assert_eq!(visible_text(html), "My Page\nHeading\nFirst paragraph continues.");
    }

    #[test]
    fn test_visible_text_inline_elements_stay_on_one_line() {
        let html = "<body><p>Hello <b>bold</b> world</p><p>Next <a href=\"/x\">link</a>.</p></body>";
        assert_eq!(visible_text(html), "Hello bold world\nNext link.");
    }

    #[test]
    fn test_visible_text_line_breaks_split_runs() {
        let html = "<p>line one<br>line two</p><p>a<br/>b</p><div>above<hr>below</div>";
        assert_eq!(visible_text(html), "line one\nline two\na\nb\nabove\nbelow");
    }

    #[test]
    fn test_visible_text_empty_page() {
        assert_eq!(visible_text("<html><body>  </body></html>"), "");
        assert_eq!(visible_text(""), "");
    }

    #[test]
    fn test_visible_text_without_title() {
        assert_eq!(visible_text("<p>just text</p>"), "just text");
    }

    #[tokio::test]
    async fn test_extract_keeps_source() {
        let fetcher = StaticPage("<html><body><p>Article body</p></body></html>");
        let url = Url::parse("https://example.com/article").unwrap();
        let doc = extract(&fetcher, &url).await.unwrap();
        assert_eq!(doc.text(), "Article body");
        assert_eq!(doc.source(), "https://example.com/article");
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpPageFetcher::new("Mozilla/5.0").is_ok());
    }
}
