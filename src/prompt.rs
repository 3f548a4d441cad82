use serde::{Deserialize, Serialize};

const BASE_PROMPT: &str = "You are an expert summarizer specifically trained for YouTube videos. \
Your task is to create comprehensive and clear summaries based on the transcript provided. \
For each video, make sure to include:

1. **Key Points**: Identify and outline the most important ideas discussed.
2. **Conclusions**: Highlight any significant conclusions or recommendations made by the speaker(s).
3. **Insights**: Note any notable facts, figures, or insights shared throughout the video.

The output should be tailored to the requested format. When creating bullet points, keep each point \
succinct and clear. When creating a paragraph, maintain a coherent flow, linking ideas together logically.
";

/// Layout of the generated notes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFormat {
    #[default]
    #[serde(alias = "Bullet Points", alias = "bullets")]
    BulletPoints,
    #[serde(alias = "Paragraph")]
    Paragraph,
}

impl SummaryFormat {
    pub const ALL: [SummaryFormat; 2] = [SummaryFormat::BulletPoints, SummaryFormat::Paragraph];

    /// Form value, matching the serde name.
    pub fn value(&self) -> &'static str {
        match self {
            SummaryFormat::BulletPoints => "bullet_points",
            SummaryFormat::Paragraph => "paragraph",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryFormat::BulletPoints => "Bullet Points",
            SummaryFormat::Paragraph => "Paragraph",
        }
    }

    fn clause(&self, words: u32) -> String {
        match self {
            SummaryFormat::BulletPoints => format!(
                "Please summarize the following transcript in bullet points, keeping it concise and within {words} words."
            ),
            SummaryFormat::Paragraph => format!(
                "Please provide a coherent single paragraph summary, strictly avoiding bullet points, \
maintaining a formal tone, and staying within {words} words."
            ),
        }
    }
}

/// Target word count for the notes, kept on the slider grid (50..=5000, step 50).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct SummaryLength(u32);

impl SummaryLength {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 5000;
    pub const STEP: u32 = 50;
    pub const DEFAULT: u32 = 250;

    /// Snap to the nearest step and clamp into range.
    pub fn new(words: u32) -> Self {
        let snapped = words.saturating_add(Self::STEP / 2) / Self::STEP * Self::STEP;
        SummaryLength(snapped.clamp(Self::MIN, Self::MAX))
    }

    pub fn words(&self) -> u32 {
        self.0
    }
}

impl Default for SummaryLength {
    fn default() -> Self {
        SummaryLength(Self::DEFAULT)
    }
}

impl From<u32> for SummaryLength {
    fn from(words: u32) -> Self {
        SummaryLength::new(words)
    }
}

impl From<SummaryLength> for u32 {
    fn from(length: SummaryLength) -> Self {
        length.0
    }
}

/// User-selected knobs for one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySettings {
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub format: SummaryFormat,
}

impl std::fmt::Display for SummarySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} words", self.format.label(), self.length.words())
    }
}

/// The instruction text that precedes the transcript.
pub fn build_prompt(settings: &SummarySettings) -> String {
    format!(
        "{BASE_PROMPT} {}\n\nHere is the text to summarize:\n",
        settings.format.clause(settings.length.words())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_prompt() {
        let prompt = build_prompt(&SummarySettings {
            length: SummaryLength::new(100),
            format: SummaryFormat::Paragraph,
        });
        assert!(prompt.starts_with(BASE_PROMPT));
        assert!(prompt.contains("single paragraph summary"));
        assert!(prompt.contains("within 100 words"));
        assert!(!prompt.contains("in bullet points"));
    }

    #[test]
    fn test_bullet_prompt() {
        let prompt = build_prompt(&SummarySettings {
            length: SummaryLength::new(300),
            format: SummaryFormat::BulletPoints,
        });
        assert!(prompt.contains("in bullet points"));
        assert!(prompt.contains("within 300 words"));
        assert!(!prompt.contains("single paragraph"));
    }

    #[test]
    fn test_default_settings() {
        let settings = SummarySettings::default();
        assert_eq!(settings.length.words(), 250);
        assert_eq!(settings.format, SummaryFormat::BulletPoints);
        assert_eq!(settings.to_string(), "Bullet Points, 250 words");
    }

    #[test]
    fn test_length_snaps_to_grid() {
        assert_eq!(SummaryLength::new(0).words(), 50);
        assert_eq!(SummaryLength::new(50).words(), 50);
        assert_eq!(SummaryLength::new(74).words(), 50);
        assert_eq!(SummaryLength::new(75).words(), 100);
        assert_eq!(SummaryLength::new(5000).words(), 5000);
        assert_eq!(SummaryLength::new(9999).words(), 5000);
        assert_eq!(SummaryLength::new(u32::MAX).words(), 5000);
    }

    #[test]
    fn test_settings_deserialize() {
        let settings: SummarySettings =
            serde_json::from_str(r#"{"length": 1234, "format": "paragraph"}"#).unwrap();
        assert_eq!(settings.length.words(), 1250);
        assert_eq!(settings.format, SummaryFormat::Paragraph);

        let settings: SummarySettings = serde_json::from_str(r#"{"format": "Bullet Points"}"#).unwrap();
        assert_eq!(settings.length.words(), 250);
        assert_eq!(settings.format, SummaryFormat::BulletPoints);
    }
}
