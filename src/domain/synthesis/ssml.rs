use crate::domain::voice::VoiceProfile;

/// Style intensity applied to every styled request; not caller-configurable
const STYLE_DEGREE: &str = "2";

/// What gets handed to the synthesis capability: either the caller's text
/// byte-for-byte, or an SSML document carrying an expressive style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisPayload {
    Plain(String),
    Ssml(String),
}

impl SynthesisPayload {
    pub fn is_ssml(&self) -> bool {
        matches!(self, SynthesisPayload::Ssml(_))
    }
}

/// Shape the request payload for a synthesis call.
///
/// An empty or absent style yields the plain text unmodified. A present style
/// yields an SSML document naming the voice, language and style, with text
/// and style escaped so markup characters in the input cannot break the
/// document.
pub fn build_payload(
    text: &str,
    voice: &VoiceProfile,
    language: &str,
    style: Option<&str>,
) -> SynthesisPayload {
    match style {
        Some(style) if !style.is_empty() => {
            SynthesisPayload::Ssml(styled_document(text, voice.name, language, style))
        }
        _ => SynthesisPayload::Plain(text.to_string()),
    }
}

fn styled_document(text: &str, voice_name: &str, language: &str, style: &str) -> String {
    format!(
        r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="http://www.w3.org/2001/mstts" xml:lang="{language}"><voice name="{voice}"><mstts:express-as style="{style}" styledegree="{degree}">{text}</mstts:express-as></voice></speak>"#,
        language = escape_xml(language),
        voice = escape_xml(voice_name),
        style = escape_xml(style),
        degree = STYLE_DEGREE,
        text = escape_xml(text),
    )
}

/// Minimal SSML envelope for text that carries no style. The request builder
/// keeps plain payloads untouched; this wrapper exists for transports that
/// only accept SSML bodies.
pub(crate) fn plain_document(text: &str, voice_name: &str, language: &str) -> String {
    format!(
        r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xml:lang="{language}"><voice name="{voice}">{text}</voice></speak>"#,
        language = escape_xml(language),
        voice = escape_xml(voice_name),
        text = escape_xml(text),
    )
}

/// Escape the five XML-special characters
pub(crate) fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn jane() -> VoiceProfile {
        VoiceProfile {
            name: "en-US-JaneNeural",
            multilingual: false,
            styles: &["cheerful"],
        }
    }

    #[test]
    fn test_no_style_keeps_text_unmodified() {
        let text = "Hello <world> & \"friends\"";
        let payload = build_payload(text, &jane(), "en-US", None);
        assert_eq!(payload, SynthesisPayload::Plain(text.to_string()));
    }

    #[test]
    fn test_empty_style_is_plain() {
        let payload = build_payload("Hello", &jane(), "en-US", Some(""));
        assert_eq!(payload, SynthesisPayload::Plain("Hello".to_string()));
    }

    #[test]
    fn test_styled_document_names_voice_language_and_style() {
        let payload = build_payload("Hello", &jane(), "en-US", Some("cheerful"));
        let SynthesisPayload::Ssml(doc) = payload else {
            panic!("expected an SSML payload");
        };
        assert!(doc.contains(r#"<voice name="en-US-JaneNeural">"#));
        assert!(doc.contains(r#"xml:lang="en-US""#));
        assert!(doc.contains(r#"style="cheerful""#));
        assert!(doc.contains(r#"styledegree="2""#));
        assert!(doc.contains(">Hello<"));
    }

    #[test]
    fn test_styled_document_escapes_markup_in_text() {
        let payload = build_payload("a < b & c > \"d\"", &jane(), "en-US", Some("cheerful"));
        let SynthesisPayload::Ssml(doc) = payload else {
            panic!("expected an SSML payload");
        };
        assert!(doc.contains("a &lt; b &amp; c &gt; &quot;d&quot;"));
        // No raw input markup survives inside the express-as element
        assert!(!doc.contains("a < b"));
    }

    #[test]
    fn test_styled_document_escapes_style_tag() {
        let payload = build_payload("Hello", &jane(), "en-US", Some("che\"erful"));
        let SynthesisPayload::Ssml(doc) = payload else {
            panic!("expected an SSML payload");
        };
        assert!(doc.contains(r#"style="che&quot;erful""#));
    }

    #[test]
    fn test_plain_document_wraps_and_escapes() {
        let doc = plain_document("x & y", "en-US-NancyNeural", "en-US");
        assert!(doc.contains(r#"<voice name="en-US-NancyNeural">x &amp; y</voice>"#));
        assert!(doc.starts_with("<speak"));
        assert!(doc.ends_with("</speak>"));
    }

    #[test]
    fn test_escape_xml_all_specials() {
        assert_eq!(escape_xml(r#"<&>"'"#), "&lt;&amp;&gt;&quot;&apos;");
    }
}
