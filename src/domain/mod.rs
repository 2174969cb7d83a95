pub mod analytics;
pub mod synthesis;
pub mod transcription;
pub mod voice;
