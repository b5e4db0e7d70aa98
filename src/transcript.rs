use std::future::Future;

use eyre::{Result, bail};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::classify::video_id;
use crate::{Document, Fragment};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Anything that can turn a video id into an ordered list of caption fragments
pub trait TranscriptService {
    fn fetch(&self, video_id: &str, languages: &[String]) -> impl Future<Output = Result<Vec<Fragment>>>;
}

/// Fetch the transcript for a video URL and join it into one document
pub async fn extract<T: TranscriptService>(service: &T, url: &Url, languages: &[String]) -> Result<Document> {
    let video_id = video_id(url);
    if video_id.is_empty() {
        bail!("no video id (missing `v` parameter) in {url}");
    }

    debug!("Fetching transcript for {video_id} (languages: {languages:?})");
    let fragments = service.fetch(&video_id, languages).await?;
    debug!("Transcript has {} fragments", fragments.len());

    Ok(Document::new(join_fragments(&fragments), url.as_str()))
}

/// Fragment texts, in order, separated by single spaces
pub fn join_fragments(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    /// "asr" for auto-generated tracks
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Caption tracks from the video platform's InnerTube player endpoint
pub struct InnerTubeTranscripts {
    client: reqwest::Client,
}

impl InnerTubeTranscripts {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl TranscriptService for InnerTubeTranscripts {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<Fragment>> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        debug!("Fetching watch page for {video_id}");
        let page_html = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept-Language", "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key");

        // Step 2: Call the player endpoint for the caption track list
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(PLAYER_URL)
            .query(&[("key", api_key.as_str()), ("prettyPrint", "false")])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let tracks = resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            bail!("transcripts are disabled or unavailable for video {video_id}");
        }

        let track = select_track(&tracks, languages)?;
        debug!(
            "Using caption track: lang={} generated={}",
            track.language_code,
            track.is_generated()
        );

        // Step 3: Fetch the caption XML
        let caption_url = track.base_url.replace("&fmt=srv3", "");
        let caption_xml = self
            .client
            .get(&caption_url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    if html.contains(r#"class="g-recaptcha""#) {
        bail!("too many requests: the video platform is asking for a captcha");
    }

    bail!("could not extract InnerTube API key from watch page");
}

/// Manually created tracks win over generated ones; within each, language priority order
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Result<&'a CaptionTrack> {
    for generated in [false, true] {
        for lang in languages {
            if let Some(track) = tracks
                .iter()
                .find(|t| t.is_generated() == generated && &t.language_code == lang)
            {
                return Ok(track);
            }
        }
    }

    let available = tracks
        .iter()
        .map(|t| t.language_code.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    bail!("no transcript in any of {languages:?} (available: {available})");
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Fragment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                // some tracks omit `dur` on the final cue
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).trim().to_string();
                    if !text.is_empty() {
                        fragments.push(Fragment {
                            text,
                            start,
                            duration: dur,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(fragments)
}
