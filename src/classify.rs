use url::{Host, Url};

use crate::SummarizeError;

/// Hosts whose pages are summarized from their caption track
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Which extraction strategy a URL is routed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Video(Url),
    Generic(Url),
}

impl SourceKind {
    pub fn url(&self) -> &Url {
        match self {
            SourceKind::Video(url) | SourceKind::Generic(url) => url,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, SourceKind::Video(_))
    }
}

/// Validate `input` as an http(s) URL with a host and decide how to extract it
pub fn classify(input: &str) -> Result<SourceKind, SummarizeError> {
    let input = input.trim();
    let invalid = || SummarizeError::InvalidUrl(input.to_string());

    let url = Url::parse(input).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let host = match url.host() {
        Some(Host::Domain(domain)) => {
            // a single trailing dot is the fully-qualified form of the same host
            let domain = domain.strip_suffix('.').unwrap_or(domain);
            // bare words like "localhost" are not accepted as page URLs
            if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
                return Err(invalid());
            }
            domain.to_ascii_lowercase()
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return Ok(SourceKind::Generic(url)),
        None => return Err(invalid()),
    };

    if is_video_host(&host) {
        Ok(SourceKind::Video(url))
    } else {
        Ok(SourceKind::Generic(url))
    }
}

fn is_video_host(host: &str) -> bool {
    VIDEO_HOSTS
        .iter()
        .any(|marker| host == *marker || host.ends_with(&format!(".{marker}")))
}

/// The `v` query parameter, or an empty string when absent
pub fn video_id(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}
