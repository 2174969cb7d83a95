/// Marker Azure embeds in the names of voices that can switch languages
pub const MULTILINGUAL_MARKER: &str = "Multilingual";

/// Catalog key of the voice used when the caller picks none
pub const DEFAULT_VOICE: &str = "en-IN-AnanyaNeural";

/// A synthesis voice from the curated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    /// Full provider voice name, e.g. "en-US-JaneNeural"
    pub name: &'static str,
    /// Whether the voice can speak languages other than its own locale
    pub multilingual: bool,
    /// Expressive styles the voice supports beyond its neutral default
    pub styles: &'static [&'static str],
}

impl VoiceProfile {
    /// Locale tag embedded in the voice name, e.g. "en-IN" from
    /// "en-IN-AnanyaNeural". Catalog entries are trusted to carry a
    /// well-formed five-character prefix; validating them is the catalog
    /// author's job, not this accessor's.
    pub fn locale(&self) -> &'static str {
        &self.name[..5]
    }

    /// Whether the voice declares support for the given expressive style
    pub fn supports_style(&self, style: &str) -> bool {
        self.styles.contains(&style)
    }
}

/// Curated voice set with the style lists each voice supports.
static CURATED: &[VoiceProfile] = &[
    VoiceProfile {
        name: "en-IN-NeerjaNeural",
        multilingual: false,
        styles: &["cheerful", "newscast", "empathetic"],
    },
    VoiceProfile {
        name: "en-IN-AnanyaNeural",
        multilingual: false,
        styles: &[],
    },
    VoiceProfile {
        name: "zh-CN-XiaoyuMultilingualNeural",
        multilingual: true,
        styles: &[],
    },
    VoiceProfile {
        name: "zh-CN-XiaochenMultilingualNeural",
        multilingual: true,
        styles: &[],
    },
    VoiceProfile {
        name: "en-US-SerenaMultilingualNeural",
        multilingual: true,
        styles: &[
            "empathetic",
            "excited",
            "friendly",
            "shy",
            "serious",
            "sad",
            "relieved",
        ],
    },
    VoiceProfile {
        name: "en-US-JaneNeural",
        multilingual: false,
        styles: &[
            "angry",
            "cheerful",
            "excited",
            "friendly",
            "unfriendly",
            "sad",
            "shouting",
            "hopeful",
            "terrified",
            "whispering",
        ],
    },
    VoiceProfile {
        name: "en-US-NancyNeural",
        multilingual: false,
        styles: &[
            "angry",
            "cheerful",
            "excited",
            "friendly",
            "unfriendly",
            "sad",
            "shouting",
            "hopeful",
            "terrified",
            "whispering",
        ],
    },
];

/// Immutable table of selectable voices, looked up by stable voice name.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<VoiceProfile>,
}

impl VoiceCatalog {
    /// The curated catalog shipped with the crate
    pub fn curated() -> Self {
        Self {
            voices: CURATED.to_vec(),
        }
    }

    /// Look up a voice by its full provider name
    pub fn get(&self, name: &str) -> Option<&VoiceProfile> {
        self.voices.iter().find(|voice| voice.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VoiceProfile> {
        self.voices.iter()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

/// The curated profile behind [`DEFAULT_VOICE`]
pub fn curated_default() -> &'static VoiceProfile {
    CURATED
        .iter()
        .find(|voice| voice.name == DEFAULT_VOICE)
        .unwrap_or(&CURATED[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let catalog = VoiceCatalog::curated();
        let voice = catalog.get("en-US-JaneNeural").expect("Jane is curated");
        assert!(!voice.multilingual);
        assert!(voice.supports_style("cheerful"));
        assert!(!voice.supports_style("newscast"));
    }

    #[test]
    fn test_unknown_name_is_none() {
        let catalog = VoiceCatalog::curated();
        assert!(catalog.get("en-US-NotARealVoice").is_none());
    }

    #[test]
    fn test_locale_is_name_prefix() {
        let catalog = VoiceCatalog::curated();
        assert_eq!(
            catalog.get("en-IN-AnanyaNeural").unwrap().locale(),
            "en-IN"
        );
        assert_eq!(
            catalog.get("zh-CN-XiaoyuMultilingualNeural").unwrap().locale(),
            "zh-CN"
        );
    }

    #[test]
    fn test_multilingual_flag_matches_name_marker() {
        for voice in VoiceCatalog::curated().iter() {
            assert_eq!(
                voice.multilingual,
                voice.name.contains(MULTILINGUAL_MARKER),
                "flag out of sync for {}",
                voice.name
            );
        }
    }

    #[test]
    fn test_curated_default_exists() {
        assert_eq!(curated_default().name, DEFAULT_VOICE);
    }

    #[test]
    fn test_curated_catalog_is_populated() {
        let catalog = VoiceCatalog::curated();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.len(), catalog.iter().count());
        assert!(catalog.get(DEFAULT_VOICE).is_some());
    }
}
