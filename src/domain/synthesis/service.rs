use super::{build_payload, OutputFormat, SynthesisRequest};
use crate::domain::voice::{self, contains_bengali, resolve_language, VoiceCatalog, VoiceProfile};
use crate::error::{OperationError, OperationResult};
use crate::infrastructure::bridge::bridge;
use crate::infrastructure::speech::{ResultReason, SpeechCapability, SynthesisEvent};
use crate::infrastructure::config::Config;
use std::sync::Arc;

/// Language skill (accent) multilingual voices fall back to when the text
/// carries no Bengali characters
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en-AU";

/// Process-wide synthesis policy, injected into the orchestrator and
/// overridable per call.
#[derive(Debug, Clone)]
pub struct SynthesisDefaults {
    /// Catalog key of the voice used when the caller picks none
    pub voice: String,
    /// Fallback accent for multilingual voices
    pub fallback_language: String,
    /// Compressed format used unless the caller asks for lossless audio
    pub output_format: OutputFormat,
}

impl Default for SynthesisDefaults {
    fn default() -> Self {
        Self {
            voice: voice::DEFAULT_VOICE.to_string(),
            fallback_language: DEFAULT_FALLBACK_LANGUAGE.to_string(),
            output_format: OutputFormat::Opus,
        }
    }
}

impl SynthesisDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            voice: config.default_voice.clone(),
            fallback_language: config.default_language.clone(),
            output_format: config.default_audio_format,
        }
    }
}

/// Text-to-audio orchestrator: composes the script classifier, language
/// resolver and request builder, then bridges the single-shot remote
/// operation into one awaited outcome.
pub struct SynthesisService {
    capability: Arc<dyn SpeechCapability>,
    catalog: VoiceCatalog,
    defaults: SynthesisDefaults,
    default_profile: VoiceProfile,
}

impl SynthesisService {
    pub fn new(
        capability: Arc<dyn SpeechCapability>,
        catalog: VoiceCatalog,
        defaults: SynthesisDefaults,
    ) -> Self {
        let default_profile = match catalog.get(&defaults.voice) {
            Some(profile) => profile.clone(),
            None => {
                tracing::warn!(
                    voice = %defaults.voice,
                    "configured default voice not in catalog, using the curated default"
                );
                voice::catalog::curated_default().clone()
            }
        };

        Self {
            capability,
            catalog,
            defaults,
            default_profile,
        }
    }

    /// Synthesize `text` and return the raw audio bytes.
    ///
    /// `voice` is an optional catalog key overriding the configured default;
    /// `style` switches the payload to styled markup; `lossless` forces Riff
    /// WAV output instead of the configured compressed format.
    pub async fn speak(
        &self,
        text: &str,
        voice: Option<&str>,
        style: Option<&str>,
        lossless: bool,
    ) -> OperationResult<Vec<u8>> {
        if text.is_empty() {
            return Err(OperationError::EmptyInput);
        }

        // 1. Pick the voice (per-call key overrides the configured default)
        let voice_profile = self.select_voice(voice);

        // 2. Steer the language from the text's script
        let script_detected = contains_bengali(text);
        let language = resolve_language(
            voice_profile,
            script_detected,
            &self.defaults.fallback_language,
        );

        // 3. Shape the payload
        if let Some(style) = style.filter(|s| !s.is_empty()) {
            if !voice_profile.supports_style(style) {
                // The service falls back to the neutral style on its own
                tracing::warn!(
                    voice = voice_profile.name,
                    style,
                    "style not declared by voice, sending anyway"
                );
            }
        }
        let payload = build_payload(text, voice_profile, language, style);

        // 4. Pick the output encoding
        let output_format = if lossless {
            OutputFormat::Wav
        } else {
            self.defaults.output_format
        };

        tracing::info!(
            voice = voice_profile.name,
            language,
            script_detected,
            styled = payload.is_ssml(),
            output_format = output_format.wire_name(),
            text_length = text.len(),
            "speech synthesis request"
        );

        let request = SynthesisRequest {
            payload,
            voice: voice_profile.name.to_string(),
            language: language.to_string(),
            output_format,
        };

        // 5. Bridge the single-shot remote operation into one awaited outcome
        let session = self.capability.open_synthesis(request);
        let outcome = bridge(session, |event: SynthesisEvent| match event.reason {
            ResultReason::SynthesisCompleted => Ok(event.audio),
            reason => Err(OperationError::Unexpected(format!(
                "synthesis ended with reason {:?}",
                reason
            ))),
        })
        .await;

        if let Err(error) = &outcome {
            tracing::warn!(error = %error, "speech synthesis failed");
        }
        outcome
    }

    fn select_voice(&self, requested: Option<&str>) -> &VoiceProfile {
        if let Some(name) = requested {
            match self.catalog.get(name) {
                Some(profile) => return profile,
                None => tracing::warn!(
                    voice = name,
                    "requested voice not in catalog, using default"
                ),
            }
        }
        &self.default_profile
    }
}
