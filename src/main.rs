use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, WrapErr};
use log::{info, warn};

mod cli;

use cli::Cli;
use ytdigest::config::{API_KEY_ENV, Config};
use ytdigest::summarize::{GeminiClient, Generator};
use ytdigest::web::AppState;
use ytdigest::youtube::YouTubeCaptions;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytdigest.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytdigest")
        .join("logs")
}

fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

fn build_after_help() -> String {
    let key_line = match api_key_from_env().filter(|k| !k.trim().is_empty()) {
        Some(_) => format!("  \x1b[32m✅\x1b[0m {API_KEY_ENV}"),
        None => format!("  \x1b[31m❌\x1b[0m {API_KEY_ENV}  (not set; may also come from .env or config api_key)"),
    };

    let log_path = log_dir().join("ytdigest.log");

    format!(
        "\nENVIRONMENT:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytdigest::config::config_path().display(),
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let config = match cli.config {
        Some(ref path) => Config::load_from(path).wrap_err_with(|| format!("failed to load {}", path.display()))?,
        // Default location is optional; a broken file there is not fatal
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring config file: {e}");
            Config::default()
        }),
    };

    // CLI flags take priority over the config file
    let bind = cli.bind.as_deref().unwrap_or(config.bind()).to_string();
    let model = cli.model.as_deref().unwrap_or(config.model()).to_string();
    let lang = cli.lang.as_deref().unwrap_or(config.lang()).to_string();

    let client = reqwest::Client::new();

    let generator: Option<Arc<dyn Generator>> = match config.api_key(api_key_from_env()) {
        Some(key) => Some(Arc::new(GeminiClient::new(client.clone(), &key, &model, config.endpoint()))),
        None => {
            warn!("{API_KEY_ENV} not set; summary generation disabled");
            eprintln!(
                "API key not found. Please set the {API_KEY_ENV} in your environment variables. \
Summaries are disabled until it is set."
            );
            None
        }
    };

    let state = AppState {
        fetcher: Arc::new(YouTubeCaptions::new(client, &lang)),
        generator,
        defaults: config.default_settings(),
    };

    if cli.verbose {
        eprintln!("Model: {model}\nCaption language: {lang}\nDefaults: {}", state.defaults);
    }

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;
    let addr = listener.local_addr()?;
    info!("Serving on http://{addr}");
    eprintln!("{}: http://{addr}", ytdigest::output::TITLE);

    axum::serve(listener, ytdigest::web::router(state)).await?;
    Ok(())
}
