use crate::error::{OperationError, OperationResult};
use crate::infrastructure::bridge::bridge;
use crate::infrastructure::speech::{
    RecognitionEvent, ResultReason, SpeechCapability, TranslationEvent,
};
use std::sync::Arc;

/// Recognition language when the caller does not flag Bengali audio
pub const RECOGNITION_LANGUAGE: &str = "en-US";
/// Recognition language for Bengali audio; set explicitly, detection is
/// unreliable for short utterances
pub const BENGALI_RECOGNITION_LANGUAGE: &str = "bn-IN";

/// Audio-to-text orchestrators: single-shot recognition and translation over
/// the Operation Bridge. Only the first recognized utterance is returned,
/// never a stream.
pub struct TranscriptionService {
    capability: Arc<dyn SpeechCapability>,
}

impl TranscriptionService {
    pub fn new(capability: Arc<dyn SpeechCapability>) -> Self {
        Self { capability }
    }

    /// Recognize one utterance from raw wave audio.
    pub async fn recognize(&self, audio: &[u8], bengali: bool) -> OperationResult<String> {
        if audio.is_empty() {
            return Err(OperationError::EmptyInput);
        }

        let language = if bengali {
            BENGALI_RECOGNITION_LANGUAGE
        } else {
            RECOGNITION_LANGUAGE
        };

        tracing::info!(language, audio_size = audio.len(), "speech recognition request");

        let session = self.capability.open_recognition(audio.to_vec(), language);
        let outcome = bridge(session, |event: RecognitionEvent| match event.reason {
            ResultReason::RecognizedSpeech => Ok(event.text),
            reason => Err(OperationError::Unexpected(format!(
                "recognition ended with reason {:?}",
                reason
            ))),
        })
        .await;

        if let Err(error) = &outcome {
            tracing::warn!(error = %error, "speech recognition failed");
        }
        outcome
    }

    /// Recognize one utterance and translate it into the target language.
    /// Exactly one target language is configured per call; the first
    /// available target result wins.
    pub async fn translate(
        &self,
        audio: &[u8],
        from: &str,
        to: &str,
    ) -> OperationResult<String> {
        if audio.is_empty() {
            return Err(OperationError::EmptyInput);
        }

        tracing::info!(
            from,
            to,
            audio_size = audio.len(),
            "speech translation request"
        );

        let session = self.capability.open_translation(audio.to_vec(), from, to);
        let outcome = bridge(session, |event: TranslationEvent| match event.reason {
            ResultReason::TranslatedSpeech => event
                .translations
                .into_iter()
                .next()
                .map(|translation| translation.text)
                .ok_or_else(|| {
                    OperationError::Unexpected(
                        "translation completed with no target results".to_string(),
                    )
                }),
            reason => Err(OperationError::Unexpected(format!(
                "translation ended with reason {:?}",
                reason
            ))),
        })
        .await;

        if let Err(error) = &outcome {
            tracing::warn!(error = %error, "speech translation failed");
        }
        outcome
    }
}
