use super::capability::{
    RecognitionEvent, ResultReason, SpeechCapability, SynthesisEvent, Translation,
    TranslationEvent,
};
use crate::domain::synthesis::{ssml, SynthesisPayload, SynthesisRequest};
use crate::infrastructure::bridge::{take_slot, CompletionHandler, ErrorHandler, SingleShotSession};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;

const TRANSLATOR_URL: &str = "https://api.cognitive.microsofttranslator.com/translate";
const TRANSLATOR_API_VERSION: &str = "3.0";
const USER_AGENT: &str = "voicebridge";

type PendingCall<E> = Pin<Box<dyn Future<Output = Result<E, String>> + Send>>;

/// Session around one prepared REST call. The prepared call (request body,
/// buffered audio) is the per-operation resource: `start` consumes it,
/// `close` drops it if it never ran.
struct RestSession<E> {
    pending: Mutex<Option<PendingCall<E>>>,
}

impl<E: Send + 'static> RestSession<E> {
    fn open(call: impl Future<Output = Result<E, String>> + Send + 'static) -> Arc<Self> {
        Arc::new(Self {
            pending: Mutex::new(Some(Box::pin(call))),
        })
    }
}

impl<E: Send + 'static> SingleShotSession for RestSession<E> {
    type Event = E;

    fn start(&self, on_completed: CompletionHandler<E>, on_error: ErrorHandler) {
        let Some(call) = take_slot(&self.pending) else {
            on_error("session was closed before it was started".to_string());
            return;
        };
        tokio::spawn(async move {
            match call.await {
                Ok(event) => on_completed(event),
                Err(message) => on_error(message),
            }
        });
    }

    fn close(&self) {
        drop(take_slot(&self.pending));
    }
}

/// Speech service client over the Azure REST endpoints: synthesis against the
/// `tts` endpoint, recognition against the short-audio `stt` endpoint, and
/// translation as recognize-then-translate against the Translator endpoint
/// (there is no single-shot REST speech translation). All three are delivered
/// through the single-shot session contract.
pub struct AzureSpeechClient {
    subscription_key: String,
    region: String,
    http_client: reqwest::Client,
}

impl AzureSpeechClient {
    pub fn new(subscription_key: String, region: String) -> Self {
        Self {
            subscription_key,
            region,
            http_client: reqwest::Client::new(),
        }
    }

    fn synthesis_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        )
    }

    fn recognition_url(&self, language: &str) -> String {
        format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language={}&format=simple",
            self.region,
            urlencoding::encode(language)
        )
    }

    async fn recognize_short_audio(
        http_client: reqwest::Client,
        url: String,
        subscription_key: String,
        audio: Vec<u8>,
    ) -> Result<RecognitionEvent, String> {
        let audio_size = audio.len();
        let started = Instant::now();

        let response = http_client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &subscription_key)
            .header("Content-Type", "audio/wav; codecs=audio/pcm")
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .body(audio)
            .send()
            .await
            .map_err(|e| format!("speech recognition request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!(
                "speech recognition returned {}: {}",
                status, body
            ));
        }

        let wire: ShortAudioRecognition = response
            .json()
            .await
            .map_err(|e| format!("failed to parse recognition response: {}", e))?;

        tracing::info!(
            latency_ms = started.elapsed().as_millis() as u64,
            audio_size,
            recognition_status = %wire.recognition_status,
            "speech recognition completed"
        );

        Ok(classify_recognition(wire))
    }
}

impl SpeechCapability for AzureSpeechClient {
    fn open_synthesis(
        &self,
        request: SynthesisRequest,
    ) -> Arc<dyn SingleShotSession<Event = SynthesisEvent>> {
        let http_client = self.http_client.clone();
        let subscription_key = self.subscription_key.clone();
        let url = self.synthesis_url();

        RestSession::open(async move {
            // The endpoint only accepts SSML bodies; plain payloads get a
            // minimal envelope at transport time.
            let body = match &request.payload {
                SynthesisPayload::Ssml(document) => document.clone(),
                SynthesisPayload::Plain(text) => {
                    ssml::plain_document(text, &request.voice, &request.language)
                }
            };

            let started = Instant::now();
            let response = http_client
                .post(&url)
                .header("Ocp-Apim-Subscription-Key", &subscription_key)
                .header("Content-Type", "application/ssml+xml")
                .header("X-Microsoft-OutputFormat", request.output_format.wire_name())
                .header("User-Agent", USER_AGENT)
                .body(body)
                .send()
                .await
                .map_err(|e| format!("speech synthesis request failed: {}", e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(format!("speech synthesis returned {}: {}", status, body));
            }

            let audio = response
                .bytes()
                .await
                .map_err(|e| format!("failed to read synthesized audio: {}", e))?
                .to_vec();

            tracing::info!(
                latency_ms = started.elapsed().as_millis() as u64,
                audio_size = audio.len(),
                voice = %request.voice,
                "speech synthesis completed"
            );

            Ok(SynthesisEvent {
                reason: ResultReason::SynthesisCompleted,
                audio,
            })
        })
    }

    fn open_recognition(
        &self,
        audio: Vec<u8>,
        language: &str,
    ) -> Arc<dyn SingleShotSession<Event = RecognitionEvent>> {
        let http_client = self.http_client.clone();
        let subscription_key = self.subscription_key.clone();
        let url = self.recognition_url(language);

        RestSession::open(Self::recognize_short_audio(
            http_client,
            url,
            subscription_key,
            audio,
        ))
    }

    fn open_translation(
        &self,
        audio: Vec<u8>,
        from: &str,
        to: &str,
    ) -> Arc<dyn SingleShotSession<Event = TranslationEvent>> {
        let http_client = self.http_client.clone();
        let subscription_key = self.subscription_key.clone();
        let region = self.region.clone();
        let recognition_url = self.recognition_url(from);
        // The Translator endpoint wants bare language subtags, not locales
        let from_tag = primary_subtag(from).to_string();
        let to_tag = primary_subtag(to).to_string();
        let target_language = to.to_string();

        RestSession::open(async move {
            let recognition = Self::recognize_short_audio(
                http_client.clone(),
                recognition_url,
                subscription_key.clone(),
                audio,
            )
            .await?;

            if recognition.reason != ResultReason::RecognizedSpeech {
                return Ok(TranslationEvent {
                    reason: recognition.reason,
                    translations: Vec::new(),
                });
            }

            let url = format!(
                "{}?api-version={}&from={}&to={}",
                TRANSLATOR_URL,
                TRANSLATOR_API_VERSION,
                urlencoding::encode(&from_tag),
                urlencoding::encode(&to_tag)
            );

            let started = Instant::now();
            let response = http_client
                .post(&url)
                .header("Ocp-Apim-Subscription-Key", &subscription_key)
                .header("Ocp-Apim-Subscription-Region", &region)
                .header("User-Agent", USER_AGENT)
                .json(&serde_json::json!([{ "Text": recognition.text }]))
                .send()
                .await
                .map_err(|e| format!("translation request failed: {}", e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(format!("translation returned {}: {}", status, body));
            }

            let items: Vec<TranslateItem> = response
                .json()
                .await
                .map_err(|e| format!("failed to parse translation response: {}", e))?;

            let translations: Vec<Translation> = items
                .into_iter()
                .flat_map(|item| item.translations)
                .map(|translated| Translation {
                    language: translated.to,
                    text: translated.text,
                })
                .collect();

            tracing::info!(
                latency_ms = started.elapsed().as_millis() as u64,
                target_language = %target_language,
                translation_count = translations.len(),
                "speech translation completed"
            );

            let reason = if translations.is_empty() {
                ResultReason::NoMatch
            } else {
                ResultReason::TranslatedSpeech
            };
            Ok(TranslationEvent {
                reason,
                translations,
            })
        })
    }
}

/// Short-audio recognition response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShortAudioRecognition {
    recognition_status: String,
    #[serde(default)]
    display_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateItem {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
    to: String,
}

fn classify_recognition(wire: ShortAudioRecognition) -> RecognitionEvent {
    match wire.recognition_status.as_str() {
        "Success" => RecognitionEvent {
            reason: ResultReason::RecognizedSpeech,
            text: wire.display_text.unwrap_or_default(),
        },
        "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => RecognitionEvent {
            reason: ResultReason::NoMatch,
            text: String::new(),
        },
        _ => RecognitionEvent {
            reason: ResultReason::Canceled,
            text: String::new(),
        },
    }
}

fn primary_subtag(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_recognition_success() {
        let event = classify_recognition(ShortAudioRecognition {
            recognition_status: "Success".to_string(),
            display_text: Some("hello there".to_string()),
        });
        assert_eq!(event.reason, ResultReason::RecognizedSpeech);
        assert_eq!(event.text, "hello there");
    }

    #[test]
    fn test_classify_recognition_no_match() {
        let event = classify_recognition(ShortAudioRecognition {
            recognition_status: "InitialSilenceTimeout".to_string(),
            display_text: None,
        });
        assert_eq!(event.reason, ResultReason::NoMatch);
        assert!(event.text.is_empty());
    }

    #[test]
    fn test_classify_recognition_unknown_status_is_canceled() {
        let event = classify_recognition(ShortAudioRecognition {
            recognition_status: "Error".to_string(),
            display_text: None,
        });
        assert_eq!(event.reason, ResultReason::Canceled);
    }

    #[test]
    fn test_recognition_response_parsing() {
        let wire: ShortAudioRecognition = serde_json::from_str(
            r#"{"RecognitionStatus":"Success","DisplayText":"Hi.","Offset":0,"Duration":1}"#,
        )
        .unwrap();
        assert_eq!(wire.recognition_status, "Success");
        assert_eq!(wire.display_text.as_deref(), Some("Hi."));
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(primary_subtag("bn-IN"), "bn");
        assert_eq!(primary_subtag("en-US"), "en");
        assert_eq!(primary_subtag("bn"), "bn");
    }

    #[tokio::test]
    async fn test_closed_session_errors_on_start() {
        use crate::error::OperationError;
        use crate::infrastructure::bridge::bridge;

        let session: Arc<RestSession<u32>> = RestSession::open(async { Ok(42u32) });
        session.close();

        let outcome = bridge(session, Ok).await;
        assert!(matches!(
            outcome,
            Err(OperationError::Transport(ref message)) if message.contains("closed")
        ));
    }

    #[tokio::test]
    async fn test_session_delivers_prepared_call_result() {
        use crate::infrastructure::bridge::bridge;

        let session: Arc<RestSession<u32>> = RestSession::open(async { Ok(42u32) });
        let outcome = bridge(session, Ok).await;
        assert_eq!(outcome.unwrap(), 42);
    }
}
