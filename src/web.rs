use std::sync::Arc;

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use log::{info, warn};
use serde::Deserialize;

use crate::output::{Page, render_page};
use crate::prompt::{SummaryFormat, SummaryLength, SummarySettings};
use crate::summarize::Generator;
use crate::youtube::TranscriptFetcher;
use crate::{Error, Outcome};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn TranscriptFetcher>,
    /// `None` when no API key is configured
    pub generator: Option<Arc<dyn Generator>>,
    pub defaults: SummarySettings,
}

/// Body of a summarize request, from the HTML form or the JSON API.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
    pub length: Option<u32>,
    pub format: Option<SummaryFormat>,
}

impl SummarizeRequest {
    fn settings(&self, defaults: &SummarySettings) -> SummarySettings {
        SummarySettings {
            length: self.length.map(SummaryLength::new).unwrap_or(defaults.length),
            format: self.format.unwrap_or(defaults.format),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/summarize", axum::routing::post(api_summarize))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&Page {
        url: "",
        settings: state.defaults,
        outcome: None,
        api_key_missing: state.generator.is_none(),
    }))
}

async fn submit(State(state): State<AppState>, form: Result<Form<SummarizeRequest>, FormRejection>) -> Html<String> {
    let (req, outcome) = match form {
        Ok(Form(req)) => {
            let outcome = run(&state, &req.url, &req.settings(&state.defaults)).await;
            (req, outcome)
        }
        Err(rejection) => {
            warn!("Rejected form submission: {rejection}");
            (SummarizeRequest::default(), rejected())
        }
    };
    let settings = req.settings(&state.defaults);

    Html(render_page(&Page {
        url: &req.url,
        settings,
        outcome: Some(&outcome),
        api_key_missing: state.generator.is_none(),
    }))
}

async fn api_summarize(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> (StatusCode, Json<serde_json::Value>) {
    let outcome = match body {
        Ok(Json(req)) => run(&state, &req.url, &req.settings(&state.defaults)).await,
        Err(rejection) => {
            warn!("Rejected API request: {rejection}");
            rejected()
        }
    };
    let video_id = outcome.video_id.as_ref().map(|id| id.as_str());
    let thumbnail_url = outcome.video_id.as_ref().map(|id| id.thumbnail_url());

    match (outcome.summary.as_deref(), outcome.error.as_ref()) {
        (_, Some(err)) => (
            status_for(err),
            Json(serde_json::json!({
                "error": err.kind(),
                "message": err.user_message(),
                "video_id": video_id,
                "thumbnail_url": thumbnail_url,
            })),
        ),
        (summary, None) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "video_id": video_id,
                "thumbnail_url": thumbnail_url,
                "summary": summary,
            })),
        ),
    }
}

async fn run(state: &AppState, url: &str, settings: &SummarySettings) -> Outcome {
    info!("Request for {url:?}");
    crate::run(state.fetcher.as_ref(), state.generator.as_deref(), url, settings).await
}

/// A request body that could not be decoded is reported like a bad link.
fn rejected() -> Outcome {
    Outcome {
        error: Some(Error::InvalidUrlFormat),
        ..Outcome::default()
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidUrlFormat => StatusCode::BAD_REQUEST,
        Error::TranscriptDisabled | Error::NoTranscriptAvailable => StatusCode::NOT_FOUND,
        Error::TranscriptFetchFailed(_) | Error::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
        Error::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
    }
}
