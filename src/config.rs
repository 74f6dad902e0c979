use crate::llm::{LlmSettings, Provider};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Scratch directory for uploaded files
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Model identifier sent to the completion provider
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub uploads: UploadsConfig,
    pub extraction: ExtractionConfig,
    pub summarize: SummarizeConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    pub tesseract_path: String,
    pub ocr_language: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizeConfig {
    /// Inputs shorter than this (in characters) skip the provider call.
    pub min_chars: usize,
    pub fetch_timeout_secs: u64,
}

impl SummarizeConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub json_mode: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.max_upload_bytes", 25 * 1024 * 1024)?
            .set_default("uploads.dir", "uploads")?
            .set_default("extraction.tesseract_path", "tesseract")?
            .set_default("extraction.ocr_language", "eng")?
            .set_default("summarize.min_chars", 50)?
            .set_default("summarize.fetch_timeout_secs", 10)?
            .set_default("llm.provider", "gemini")?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("llm.model", "gemini-1.5-flash")?
            .set_default("llm.timeout_secs", 60)?
            .set_default("llm.json_mode", true)?
            .set_default("logging.json", false)?;

        // 2. Config file: explicit path, else ./config.* when present
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables, e.g. DIGEST_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("DIGEST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their plain env fallbacks handled by clap)
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(dir) = cli.upload_dir {
            builder = builder.set_override("uploads.dir", dir.to_string_lossy().into_owned())?;
        }
        if let Some(model) = cli.model {
            builder = builder.set_override("llm.model", model)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

/// Resolve provider settings from the loaded config and the API key env var.
pub fn load_llm_settings(config: &LlmConfig) -> Result<LlmSettings, String> {
    let Ok(api_key) = std::env::var(API_KEY_ENV) else {
        return Err(format!("Missing required env var: {API_KEY_ENV}"));
    };
    if api_key.trim().is_empty() {
        return Err(format!("{API_KEY_ENV} cannot be empty"));
    }

    if config.model.trim().is_empty() {
        return Err("llm.model cannot be empty".to_string());
    }

    let provider = match config.provider.to_lowercase().as_str() {
        "gemini" => Provider::Gemini,
        "openai" => Provider::OpenAiCompatible,
        "auto" => Provider::detect_from_url(&config.base_url),
        other => return Err(format!("Unknown llm.provider: {other}")),
    };

    Ok(LlmSettings {
        base_url: config.base_url.clone(),
        api_key,
        model: config.model.clone(),
        provider,
        timeout: Duration::from_secs(config.timeout_secs),
        json_mode: config.json_mode,
    })
}
