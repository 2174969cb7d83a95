pub mod service;
pub mod ssml;

use serde::{Deserialize, Serialize};

pub use service::{SynthesisDefaults, SynthesisService};
pub use ssml::{build_payload, SynthesisPayload};

/// Audio encodings the synthesis capability can produce. Opus and Mp3 are the
/// compressed choices; Riff WAV is the lossless one forced by the caller's
/// `lossless` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Opus,
    Mp3,
    Wav,
}

impl OutputFormat {
    /// Format name understood by the synthesis endpoint
    pub fn wire_name(&self) -> &'static str {
        match self {
            OutputFormat::Opus => "ogg-48khz-16bit-mono-opus",
            OutputFormat::Mp3 => "audio-48khz-192kbitrate-mono-mp3",
            OutputFormat::Wav => "riff-48khz-16bit-mono-pcm",
        }
    }

    /// Parse a config tag, defaulting to Opus for anything unrecognized
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "mp3" => OutputFormat::Mp3,
            "wav" => OutputFormat::Wav,
            _ => OutputFormat::Opus,
        }
    }

    pub fn is_lossless(&self) -> bool {
        matches!(self, OutputFormat::Wav)
    }
}

/// Fully resolved synthesis request, consumed once by the speech capability.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub payload: SynthesisPayload,
    /// Full provider voice name
    pub voice: String,
    /// Effective synthesis language, already resolved from voice and text
    pub language: String,
    pub output_format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(OutputFormat::from_tag("mp3"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::from_tag("WAV"), OutputFormat::Wav);
        assert_eq!(OutputFormat::from_tag("opus"), OutputFormat::Opus);
        assert_eq!(OutputFormat::from_tag("flac"), OutputFormat::Opus);
    }

    #[test]
    fn test_only_wav_is_lossless() {
        assert!(OutputFormat::Wav.is_lossless());
        assert!(!OutputFormat::Opus.is_lossless());
        assert!(!OutputFormat::Mp3.is_lossless());
    }
}
