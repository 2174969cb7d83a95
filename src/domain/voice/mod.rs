pub mod catalog;
pub mod script;

pub use catalog::{VoiceCatalog, VoiceProfile, DEFAULT_VOICE};
pub use script::contains_bengali;

/// Language spoken when Bengali text meets a voice that can switch languages
pub const BENGALI_LANGUAGE: &str = "bn-BD";

/// Derive the effective synthesis language for a voice.
///
/// Multilingual voices follow the text: Bengali when the script classifier
/// detected it, the configured fallback accent otherwise. Fixed-locale voices
/// ignore script detection entirely and always speak their own locale.
pub fn resolve_language<'a>(
    voice: &'a VoiceProfile,
    script_detected: bool,
    fallback: &'a str,
) -> &'a str {
    if voice.multilingual {
        if script_detected {
            BENGALI_LANGUAGE
        } else {
            fallback
        }
    } else {
        voice.locale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multilingual() -> VoiceProfile {
        VoiceProfile {
            name: "en-US-SerenaMultilingualNeural",
            multilingual: true,
            styles: &[],
        }
    }

    fn fixed_locale() -> VoiceProfile {
        VoiceProfile {
            name: "en-IN-AnanyaNeural",
            multilingual: false,
            styles: &[],
        }
    }

    #[test]
    fn test_multilingual_with_script_detected_speaks_bengali() {
        assert_eq!(resolve_language(&multilingual(), true, "en-AU"), "bn-BD");
    }

    #[test]
    fn test_multilingual_without_script_uses_fallback() {
        assert_eq!(resolve_language(&multilingual(), false, "en-AU"), "en-AU");
    }

    #[test]
    fn test_fixed_locale_ignores_script_detection() {
        assert_eq!(resolve_language(&fixed_locale(), true, "en-AU"), "en-IN");
        assert_eq!(resolve_language(&fixed_locale(), false, "en-AU"), "en-IN");
    }
}
