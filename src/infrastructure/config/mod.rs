use crate::domain::synthesis::service::DEFAULT_FALLBACK_LANGUAGE;
use crate::domain::synthesis::OutputFormat;
use crate::domain::voice::DEFAULT_VOICE;
use anyhow::Context;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Subscription key of the speech resource
    pub speech_subscription_key: String,
    /// Region of the speech resource, e.g. "eastus"
    pub speech_region: String,
    /// Endpoint URL of the language resource
    pub language_endpoint: String,
    /// Subscription key of the language resource
    pub language_subscription_key: String,
    /// Catalog key of the default synthesis voice
    pub default_voice: String,
    /// Fallback accent for multilingual voices
    pub default_language: String,
    /// Compressed format used unless a caller asks for lossless audio
    pub default_audio_format: OutputFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            speech_subscription_key: env::var("AZURE_SPEECH_SUBSCRIPTION_KEY")
                .context("AZURE_SPEECH_SUBSCRIPTION_KEY is not set")?,
            speech_region: env::var("AZURE_SPEECH_REGION")
                .context("AZURE_SPEECH_REGION is not set")?,
            language_endpoint: env::var("AZURE_LANGUAGE_ENDPOINT")
                .context("AZURE_LANGUAGE_ENDPOINT is not set")?,
            language_subscription_key: env::var("AZURE_LANGUAGE_SUBSCRIPTION_KEY")
                .context("AZURE_LANGUAGE_SUBSCRIPTION_KEY is not set")?,
            default_voice: env::var("DEFAULT_VOICE").unwrap_or_else(|_| DEFAULT_VOICE.to_string()),
            default_language: env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_LANGUAGE.to_string()),
            default_audio_format: env::var("DEFAULT_AUDIO_FORMAT")
                .map(|tag| OutputFormat::from_tag(&tag))
                .unwrap_or(OutputFormat::Opus),
        };

        Ok(config)
    }
}
