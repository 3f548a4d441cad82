use async_trait::async_trait;
use eyre::bail;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Error, Segment, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Source of caption segments for a video.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Segments in the order the service returned them.
    async fn fetch(&self, video_id: &VideoId) -> Result<Vec<Segment>, Error>;
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

#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Fetches YouTube's built-in captions via the InnerTube API
pub struct YouTubeCaptions {
    client: reqwest::Client,
    lang: String,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client, lang: &str) -> Self {
        YouTubeCaptions {
            client,
            lang: lang.to_string(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, Error> {
        debug!("GET {url}");
        let text = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_failed)?
            .text()
            .await
            .map_err(fetch_failed)?;
        Ok(text)
    }

    async fn player_response(&self, video_id: &VideoId, api_key: &str) -> Result<InnerTubePlayerResponse, Error> {
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        self.client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_failed)?
            .json()
            .await
            .map_err(fetch_failed)
    }
}

#[async_trait]
impl TranscriptFetcher for YouTubeCaptions {
    async fn fetch(&self, video_id: &VideoId) -> Result<Vec<Segment>, Error> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let page_html = self
            .get_text(&format!("https://www.youtube.com/watch?v={video_id}"))
            .await?;
        let api_key = extract_api_key(&page_html).map_err(fetch_failed)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let resp = self.player_response(video_id, &api_key).await?;
        let track = select_track(resp, &self.lang)?;
        debug!("Using caption track: lang={}", track.language_code);

        // Step 3: Fetch the caption XML
        let caption_xml = self.get_text(&track.base_url).await?;
        parse_caption_xml(&caption_xml).map_err(fetch_failed)
    }
}

fn fetch_failed(e: impl std::fmt::Display) -> Error {
    Error::TranscriptFetchFailed(e.to_string())
}

/// Pick the requested language track, or the first one available.
///
/// No caption renderer at all means the uploader disabled captions; a
/// renderer without tracks means there is simply nothing to fetch.
fn select_track(resp: InnerTubePlayerResponse, lang: &str) -> Result<CaptionTrack, Error> {
    let renderer = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .ok_or(Error::TranscriptDisabled)?;

    let tracks = renderer.caption_tracks.unwrap_or_default();
    tracks
        .iter()
        .find(|t| t.language_code == lang)
        .or_else(|| tracks.first())
        .cloned()
        .ok_or(Error::NoTranscriptAvailable)
}

fn extract_api_key(html: &str) -> eyre::Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    bail!("could not extract InnerTube API key from watch page");
}

fn parse_caption_xml(xml: &str) -> eyre::Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match attr.key.as_ref() {
                        b"start" => start = value,
                        b"dur" => dur = value,
                        _ => {}
                    }
                }
                current = start.map(|s| (s, dur.unwrap_or_default()));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = current.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).trim().to_string();
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
