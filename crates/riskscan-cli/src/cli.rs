use clap::Parser;
use riskscan_classifier::BackendKind;
use riskscan_core::Subject;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "riskscan")]
#[command(
    author,
    version,
    about = "Classify web-described systems for AI risk with a local language model"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "riskscan.yaml", env = "RISKSCAN_CONFIG")]
    pub config: String,

    /// Model endpoint URL
    #[arg(short, long, env = "RISKSCAN_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(short, long, env = "RISKSCAN_MODEL")]
    pub model: Option<String>,

    /// Backend protocol: ollama or openai
    #[arg(short, long)]
    pub backend: Option<BackendKind>,

    /// Output CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Subject as NAME=URL; repeatable, replaces the configured list
    #[arg(short, long = "subject", value_name = "NAME=URL")]
    pub subjects: Vec<Subject>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
