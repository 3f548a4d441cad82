use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytdigest",
    about = "Web UI that turns YouTube transcripts into detailed notes",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Address to serve the web UI on [default: 127.0.0.1:8501]
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Gemini model for summarization [default: gemini-pro]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Preferred caption language [default: en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Config file to read instead of ~/.config/ytdigest/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print startup details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
