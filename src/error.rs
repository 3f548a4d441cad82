use thiserror::Error;

/// Every way a single summarize request can fail.
///
/// Each variant is terminal for the request that produced it; nothing retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid YouTube URL format")]
    InvalidUrlFormat,

    #[error("transcripts are disabled for this video")]
    TranscriptDisabled,

    #[error("no transcript available in any language")]
    NoTranscriptAvailable,

    #[error("transcript fetch failed: {0}")]
    TranscriptFetchFailed(String),

    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,

    #[error("summary generation failed: {0}")]
    GenerationFailed(String),
}

impl Error {
    /// Stable machine-readable name, used by the JSON API.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidUrlFormat => "invalid_url_format",
            Error::TranscriptDisabled => "transcript_disabled",
            Error::NoTranscriptAvailable => "no_transcript_available",
            Error::TranscriptFetchFailed(_) => "transcript_fetch_failed",
            Error::MissingApiKey => "missing_api_key",
            Error::GenerationFailed(_) => "generation_failed",
        }
    }

    /// Message shown to the user. Diagnostic details stay in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::InvalidUrlFormat => {
                "Invalid YouTube link format. Please use a link like https://www.youtube.com/watch?v=ID or https://youtu.be/ID."
            }
            Error::TranscriptDisabled => "Transcripts are disabled for this video by the uploader.",
            Error::NoTranscriptAvailable => "No transcript is available for this video in any language.",
            Error::TranscriptFetchFailed(_) => {
                "Error fetching transcript. Please check the video URL or try another video."
            }
            Error::MissingApiKey => {
                "API key not found. Please set the GOOGLE_API_KEY in your environment variables."
            }
            Error::GenerationFailed(_) => "Error generating summary. Please try again.",
        }
    }
}
