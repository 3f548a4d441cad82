pub mod config;
pub mod error;
pub mod output;
pub mod prompt;
pub mod summarize;
pub mod web;
pub mod youtube;

use log::{info, warn};
use serde::Serialize;

pub use error::Error;

use prompt::SummarySettings;
use summarize::Generator;
use youtube::TranscriptFetcher;

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Identifier of a video, as it appears in YouTube URLs.
///
/// Never empty and only ever contains `[A-Za-z0-9_-]`, so it is safe to
/// interpolate into URLs and HTML attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn thumbnail_url(&self) -> String {
        format!("http://img.youtube.com/vi/{}/0.jpg", self.0)
    }

    fn parse(candidate: &str) -> Result<Self, Error> {
        let valid = !candidate.is_empty()
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(VideoId(candidate.to_string()))
        } else {
            Err(Error::InvalidUrlFormat)
        }
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const PATH_MARKERS: [&str; 3] = ["youtu.be/", "youtube.com/embed/", "youtube.com/shorts/"];
const QUERY_MARKERS: [&str; 2] = ["?v=", "&v="];

/// Extract the video ID from a YouTube URL.
///
/// Short links (and embed/shorts links) take the final path segment; watch
/// links take the `v` query value up to the next `&`. Anything else, or a
/// marker with nothing after it, is `InvalidUrlFormat`.
pub fn extract_video_id(url: &str) -> Result<VideoId, Error> {
    let url = url.trim();

    if let Some(rest) = PATH_MARKERS.iter().find_map(|m| url.split_once(*m).map(|(_, rest)| rest)) {
        let path = strip_suffixes(rest);
        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
        return VideoId::parse(last);
    }

    if let Some(rest) = QUERY_MARKERS.iter().find_map(|m| url.split_once(*m).map(|(_, rest)| rest)) {
        let value = rest.split('&').next().unwrap_or_default();
        return VideoId::parse(strip_suffixes(value));
    }

    Err(Error::InvalidUrlFormat)
}

fn strip_suffixes(s: &str) -> &str {
    s.split(['?', '#']).next().unwrap_or_default()
}

/// Join segment texts with single spaces, keeping their order.
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetch a transcript and flatten it into one text blob.
///
/// A transcript with no text is `NoTranscriptAvailable`; there is nothing to summarize.
pub async fn fetch_transcript(fetcher: &dyn TranscriptFetcher, video_id: &VideoId) -> Result<String, Error> {
    let segments = fetcher.fetch(video_id).await?;
    let text = join_segments(&segments);
    if text.trim().is_empty() {
        return Err(Error::NoTranscriptAvailable);
    }
    Ok(text)
}

/// Result of one button press: whatever was produced before the first error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub video_id: Option<VideoId>,
    pub summary: Option<String>,
    pub error: Option<Error>,
}

/// Run the whole pipeline: extract, fetch transcript, generate summary.
///
/// `generator` is `None` when no API key was configured; that is reported
/// before any network call is made.
pub async fn run(
    fetcher: &dyn TranscriptFetcher,
    generator: Option<&dyn Generator>,
    url: &str,
    settings: &SummarySettings,
) -> Outcome {
    let video_id = match extract_video_id(url) {
        Ok(id) => id,
        Err(e) => {
            warn!("Rejected URL {url:?}: {e}");
            return Outcome {
                error: Some(e),
                ..Outcome::default()
            };
        }
    };
    info!("Summarizing video {video_id} ({settings})");

    let result = match generator {
        Some(generator) => notes_for(fetcher, generator, &video_id, settings).await,
        None => Err(Error::MissingApiKey),
    };

    match result {
        Ok(summary) => Outcome {
            video_id: Some(video_id),
            summary: Some(summary),
            error: None,
        },
        Err(e) => {
            warn!("Video {video_id}: {e}");
            Outcome {
                video_id: Some(video_id),
                summary: None,
                error: Some(e),
            }
        }
    }
}

async fn notes_for(
    fetcher: &dyn TranscriptFetcher,
    generator: &dyn Generator,
    video_id: &VideoId,
    settings: &SummarySettings,
) -> Result<String, Error> {
    let transcript = fetch_transcript(fetcher, video_id).await?;
    let template = prompt::build_prompt(settings);
    summarize::summarize(generator, &transcript, &template).await
}


#[cfg(test)]
mod tests {
    use super::testing::{Broken, EchoLength, MockFetcher};
    use super::*;
    use crate::prompt::{SummaryFormat, SummaryLength};

    fn id(url: &str) -> String {
        extract_video_id(url).unwrap().as_str().to_string()
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?si=abcdef&t=30"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_url_trailing_slash() {
        assert_eq!(id("youtu.be/abc123/"), "abc123");
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(id("https://www.youtube.com/watch?v=abc123&t=5s&list=PL1"), "abc123");
    }

    #[test]
    fn test_v_param_not_first() {
        assert_eq!(id("https://www.youtube.com/watch?feature=share&v=xyz789"), "xyz789");
    }

    #[test]
    fn test_watch_url_with_fragment() {
        assert_eq!(id("https://m.youtube.com/watch?v=abc123#comments"), "abc123");
    }

    #[test]
    fn test_embed_and_shorts_urls() {
        assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(id("  https://youtu.be/abc123  "), "abc123");
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(extract_video_id("https://vimeo.com/12345"), Err(Error::InvalidUrlFormat));
        assert_eq!(extract_video_id(""), Err(Error::InvalidUrlFormat));
    }

    #[test]
    fn test_marker_without_value() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v="),
            Err(Error::InvalidUrlFormat)
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=&t=5s"),
            Err(Error::InvalidUrlFormat)
        );
        assert_eq!(extract_video_id("https://youtu.be/"), Err(Error::InvalidUrlFormat));
    }

    #[test]
    fn test_rejects_unsafe_characters() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=<script>"),
            Err(Error::InvalidUrlFormat)
        );
    }

    #[test]
    fn test_thumbnail_url() {
        let video_id = extract_video_id("https://youtu.be/abc123").unwrap();
        assert_eq!(video_id.thumbnail_url(), "http://img.youtube.com/vi/abc123/0.jpg");
    }

    #[test]
    fn test_join_segments_preserves_order() {
        let segments: Vec<Segment> = ["a", "b", "c"]
            .iter()
            .map(|t| Segment {
                text: t.to_string(),
                start: 0.0,
                duration: 0.0,
            })
            .collect();
        assert_eq!(join_segments(&segments), "a b c");
        assert_eq!(join_segments(&[]), "");
    }

    #[tokio::test]
    async fn test_fetch_transcript_joins() {
        let fetcher = MockFetcher::returning(&["a", "b", "c"]);
        let video_id = extract_video_id("https://youtu.be/abc123").unwrap();
        assert_eq!(fetch_transcript(&fetcher, &video_id).await.unwrap(), "a b c");
    }

    #[tokio::test]
    async fn test_fetch_transcript_empty() {
        let video_id = extract_video_id("https://youtu.be/abc123").unwrap();
        let fetcher = MockFetcher::returning(&[]);
        assert_eq!(fetch_transcript(&fetcher, &video_id).await, Err(Error::NoTranscriptAvailable));
    }

    #[tokio::test]
    async fn test_empty_transcript_skips_generation() {
        let fetcher = MockFetcher::returning(&[]);
        let generator = EchoLength::new();

        let outcome = run(&fetcher, Some(&generator), "https://youtu.be/abc123", &SummarySettings::default()).await;

        assert_eq!(outcome.error, Some(Error::NoTranscriptAvailable));
        assert_eq!(outcome.summary, None);
        assert_eq!(outcome.video_id.map(|v| v.to_string()), Some("abc123".to_string()));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let fetcher = MockFetcher::returning(&["hello there", "general kenobi"]);
        let generator = EchoLength::new();
        let settings = SummarySettings::default();

        let outcome = run(
            &fetcher,
            Some(&generator),
            "https://www.youtube.com/watch?v=abc123&t=5s",
            &settings,
        )
        .await;

        let expected_len = prompt::build_prompt(&settings).len() + "hello there general kenobi".len();
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.summary, Some(expected_len.to_string()));
        assert_eq!(outcome.video_id.unwrap().thumbnail_url(), "http://img.youtube.com/vi/abc123/0.jpg");
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_calls() {
        let fetcher = MockFetcher::returning(&["a"]);
        let generator = EchoLength::new();

        let outcome = run(&fetcher, Some(&generator), "not a url", &SummarySettings::default()).await;

        assert_eq!(outcome.error, Some(Error::InvalidUrlFormat));
        assert_eq!(outcome.video_id, None);
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_keeps_thumbnail() {
        let fetcher = MockFetcher::returning(&["a"]);

        let outcome = run(&fetcher, None, "https://youtu.be/abc123", &SummarySettings::default()).await;

        assert_eq!(outcome.error, Some(Error::MissingApiKey));
        assert_eq!(outcome.video_id.map(|v| v.to_string()), Some("abc123".to_string()));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_generation() {
        let fetcher = MockFetcher::failing(Error::TranscriptDisabled);
        let generator = EchoLength::new();

        let outcome = run(&fetcher, Some(&generator), "https://youtu.be/abc123", &SummarySettings::default()).await;

        assert_eq!(outcome.error, Some(Error::TranscriptDisabled));
        assert_eq!(outcome.summary, None);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_has_no_summary() {
        let fetcher = MockFetcher::returning(&["a", "b"]);
        let settings = SummarySettings {
            length: SummaryLength::new(300),
            format: SummaryFormat::Paragraph,
        };

        let outcome = run(&fetcher, Some(&Broken), "https://youtu.be/abc123", &settings).await;

        assert!(matches!(outcome.error, Some(Error::GenerationFailed(_))));
        assert_eq!(outcome.summary, None);
    }
}
