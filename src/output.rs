use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::Outcome;
use crate::prompt::{SummaryFormat, SummaryLength, SummarySettings};

pub const TITLE: &str = "YouTube Transcript to Detailed Notes Converter";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 16rem; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 2rem 3rem; max-width: 50rem; }
input[type=text] { width: 100%; padding: .5rem; font-size: 1rem; box-sizing: border-box; }
input[type=range] { width: 100%; }
button { margin-top: 1rem; padding: .5rem 1rem; font-size: 1rem; }
.error { background: #fde8e8; color: #9b1c1c; padding: .75rem 1rem; border-radius: .25rem; margin: 1rem 0; }
.notes { white-space: pre-wrap; line-height: 1.5; }
.thumb { width: 100%; margin: 1rem 0; }
#busy { display: none; margin-top: 1rem; }
#busy.on { display: block; }
.spinner { display: inline-block; width: 1rem; height: 1rem; border: 2px solid #ccc; border-top-color: #333; border-radius: 50%; animation: spin 1s linear infinite; vertical-align: middle; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

/// Everything needed to draw the page.
pub struct Page<'a> {
    pub url: &'a str,
    pub settings: SummarySettings,
    pub outcome: Option<&'a Outcome>,
    pub api_key_missing: bool,
}

/// Render the form page, plus the result of a submission if there was one.
pub fn render_page(page: &Page<'_>) -> String {
    let mut body = String::new();

    if page.api_key_missing {
        body.push_str(&error_block(crate::Error::MissingApiKey.user_message()));
    }

    body.push_str(&format!(
        r#"<label for="url">Enter YouTube Video Link:</label>
<input type="text" id="url" name="url" value="{url}" autofocus>
<button type="submit">Get Detailed Notes</button>
<div id="busy"><span class="spinner"></span> Extracting transcript and generating summary...</div>
"#,
        url = encode_double_quoted_attribute(page.url),
    ));

    if let Some(outcome) = page.outcome {
        body.push_str(&render_outcome(outcome, page.api_key_missing));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
<form method="post" action="/" onsubmit="document.getElementById('busy').classList.add('on')" style="display: contents">
<aside>
{sidebar}
</aside>
<main>
<h1>{TITLE}</h1>
{body}
</main>
</form>
</body>
</html>
"#,
        sidebar = render_settings(&page.settings),
    )
}

fn render_settings(settings: &SummarySettings) -> String {
    let words = settings.length.words();
    let radios: String = SummaryFormat::ALL
        .iter()
        .map(|f| {
            let checked = if *f == settings.format { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="format" value="{}"{checked}> {}</label><br>
"#,
                f.value(),
                f.label()
            )
        })
        .collect();

    format!(
        r#"<h2>Summary Settings</h2>
<label for="length">Max Words for Summary: <output id="length-value">{words}</output></label>
<input type="range" id="length" name="length" min="{min}" max="{max}" step="{step}" value="{words}" oninput="document.getElementById('length-value').value = this.value">
<p>Summary Format</p>
{radios}"#,
        min = SummaryLength::MIN,
        max = SummaryLength::MAX,
        step = SummaryLength::STEP,
    )
}

fn render_outcome(outcome: &Outcome, api_key_missing: bool) -> String {
    let mut html = String::new();

    if let Some(ref video_id) = outcome.video_id {
        html.push_str(&format!(
            r#"<img class="thumb" src="{}" alt="Thumbnail for video {video_id}">
"#,
            video_id.thumbnail_url()
        ));
    }

    match (&outcome.summary, &outcome.error) {
        // Shown as escaped pre-wrapped text; markdown markup stays literal
        (Some(summary), None) => {
            html.push_str(&format!(
                "<h2>Detailed Notes:</h2>\n<div class=\"notes\">{}</div>\n",
                encode_text(summary)
            ));
        }
        // Already shown as the page banner
        (_, Some(crate::Error::MissingApiKey)) if api_key_missing => {}
        (_, Some(err)) => html.push_str(&error_block(err.user_message())),
        (None, None) => {}
    }

    html
}

fn error_block(message: &str) -> String {
    format!("<div class=\"error\" role=\"alert\">{}</div>\n", encode_text(message))
}
