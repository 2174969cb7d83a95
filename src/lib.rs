//! Mediates between application code and the Azure speech/language cloud
//! services: text-to-speech, single-shot speech recognition, spoken-audio
//! translation and text analytics (summarization, sentiment, key phrases).
//!
//! Each orchestrator resolves voice/language/encoding from the text and the
//! caller's intent, shapes the request (plain text or styled SSML), and
//! bridges the callback-driven remote operation into one awaited
//! [`OperationResult`], releasing per-operation resources before the outcome
//! reaches the caller.

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::analytics::{
    AnalyticsJob, AnalyticsService, SentimentResult, SentimentScores, SummaryKind, SummaryLength,
};
pub use domain::synthesis::{OutputFormat, SynthesisDefaults, SynthesisService};
pub use domain::transcription::TranscriptionService;
pub use domain::voice::{VoiceCatalog, VoiceProfile};
pub use error::{OperationError, OperationResult};
pub use infrastructure::config::Config;

use infrastructure::language::AzureLanguageClient;
use infrastructure::speech::AzureSpeechClient;
use std::sync::Arc;

/// All orchestrators wired against the Azure REST capabilities.
pub struct Voicebridge {
    pub synthesis: SynthesisService,
    pub transcription: TranscriptionService,
    pub analytics: AnalyticsService,
}

impl Voicebridge {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_config(&Config::from_env()?))
    }

    pub fn from_config(config: &Config) -> Self {
        let speech = Arc::new(AzureSpeechClient::new(
            config.speech_subscription_key.clone(),
            config.speech_region.clone(),
        ));
        let language = Arc::new(AzureLanguageClient::new(
            config.language_endpoint.clone(),
            config.language_subscription_key.clone(),
        ));

        Self {
            synthesis: SynthesisService::new(
                speech.clone(),
                VoiceCatalog::curated(),
                SynthesisDefaults::from_config(config),
            ),
            transcription: TranscriptionService::new(speech),
            analytics: AnalyticsService::new(language),
        }
    }
}
