use async_trait::async_trait;
use log::debug;

use crate::Error;

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A text-generation backend: one prompt in, one response out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, Error>;
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: &str, model: &str, endpoint: &str) -> Self {
        GeminiClient {
            client,
            api_key: api_key.trim().to_string(),
            model: model.trim().to_string(),
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        debug!("Generating via Gemini API with model {}", self.model);

        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let resp = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GenerationFailed(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::GenerationFailed(format!("Gemini API returned {status}: {body}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::GenerationFailed(format!("invalid response body: {e}")))?;
        extract_gemini_text(&json)
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String, Error> {
    if let Some(candidates) = json.get("candidates").and_then(|c| c.as_array()) {
        let text: String = candidates
            .iter()
            .take(1)
            .filter_map(|c| c.get("content")?.get("parts")?.as_array())
            .flatten()
            .filter_map(|p| p.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let reason = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
        .unwrap_or("unexpected response format");
    Err(Error::GenerationFailed(format!("no text in Gemini response: {reason}")))
}

/// Summarize a transcript: the template goes first, the transcript right after it.
pub async fn summarize(generator: &dyn Generator, transcript: &str, template: &str) -> Result<String, Error> {
    let prompt = format!("{template}{transcript}");
    debug!("Prompt is {} bytes", prompt.len());

    let summary = generator.generate(&prompt).await?;
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(Error::GenerationFailed("empty response".to_string()));
    }
    Ok(summary.to_string())
}
