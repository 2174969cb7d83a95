pub mod capability;
pub mod rest;

pub use capability::{
    RecognitionEvent, ResultReason, SpeechCapability, SynthesisEvent, Translation,
    TranslationEvent,
};
pub use rest::AzureSpeechClient;
