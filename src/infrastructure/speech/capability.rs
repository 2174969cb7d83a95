use crate::domain::synthesis::SynthesisRequest;
use crate::infrastructure::bridge::SingleShotSession;
use std::sync::Arc;

/// Terminal reason reported by a completed single-shot speech operation.
/// Anything other than the reason an orchestrator expects is classified as a
/// business failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultReason {
    SynthesisCompleted,
    RecognizedSpeech,
    TranslatedSpeech,
    /// The service finished but produced no usable result
    NoMatch,
    /// The service aborted the operation
    Canceled,
}

/// Completion event of a synthesis operation
#[derive(Debug, Clone)]
pub struct SynthesisEvent {
    pub reason: ResultReason,
    pub audio: Vec<u8>,
}

/// Completion event of a recognition operation
#[derive(Debug, Clone)]
pub struct RecognitionEvent {
    pub reason: ResultReason,
    pub text: String,
}

/// One target-language rendering of the recognized utterance
#[derive(Debug, Clone)]
pub struct Translation {
    pub language: String,
    pub text: String,
}

/// Completion event of a translation operation
#[derive(Debug, Clone)]
pub struct TranslationEvent {
    pub reason: ResultReason,
    pub translations: Vec<Translation>,
}

/// The remote speech service at its boundary: each call opens a fresh
/// session owning its own sink/connection, which the Operation Bridge starts
/// and closes. Implementations deliver exactly one terminal handler per
/// session (see [`SingleShotSession`]).
pub trait SpeechCapability: Send + Sync {
    fn open_synthesis(
        &self,
        request: SynthesisRequest,
    ) -> Arc<dyn SingleShotSession<Event = SynthesisEvent>>;

    fn open_recognition(
        &self,
        audio: Vec<u8>,
        language: &str,
    ) -> Arc<dyn SingleShotSession<Event = RecognitionEvent>>;

    fn open_translation(
        &self,
        audio: Vec<u8>,
        from: &str,
        to: &str,
    ) -> Arc<dyn SingleShotSession<Event = TranslationEvent>>;
}
