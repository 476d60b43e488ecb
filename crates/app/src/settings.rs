//! Handles settings for the application.
//!
//! Configuration comes from an optional `settings.toml` plus `LEDGER__`
//! prefixed environment variables (e.g. `LEDGER__OPENAI__API_KEY`). The
//! database location is a CLI argument, not a setting.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Bot token used by the Telegram media source for `tx voice --file-id`.
#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenAi {
    pub api_key: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,
}

#[derive(Debug, Deserialize)]
pub struct Voice {
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            stage_timeout_secs: default_stage_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub telegram: Option<Telegram>,
    pub openai: Option<OpenAi>,
    #[serde(default)]
    pub voice: Voice,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_extraction_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_stage_timeout_secs() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("LEDGER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
