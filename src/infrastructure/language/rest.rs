use super::capability::{LanguageCapability, SummarizationHandle};
use crate::domain::analytics::{
    AnalyticsJob, KeyPhraseDocument, RemoteError, SentimentDocument, SentimentResult,
    SentimentScores, SummarizationItem, SummaryDocument, SummaryLength,
};
use crate::error::{OperationError, OperationResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};

const API_VERSION: &str = "2023-04-01";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Suffix the service appends to task kinds in job results
const LRO_RESULTS_SUFFIX: &str = "LROResults";

/// Text analytics client over the Azure Language REST API: batch
/// summarization jobs with operation-location polling, synchronous calls for
/// sentiment and key phrases.
pub struct AzureLanguageClient {
    endpoint: String,
    subscription_key: String,
    http_client: reqwest::Client,
}

impl AzureLanguageClient {
    pub fn new(endpoint: String, subscription_key: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn jobs_url(&self) -> String {
        format!(
            "{}/language/analyze-text/jobs?api-version={}",
            self.endpoint, API_VERSION
        )
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/language/:analyze-text?api-version={}",
            self.endpoint, API_VERSION
        )
    }

    /// Synchronous single-document analysis call
    async fn analyze_text(
        &self,
        kind: &'static str,
        document: &str,
        language: &str,
    ) -> OperationResult<SyncResults> {
        let request = AnalyzeTextRequest {
            kind,
            analysis_input: AnalysisInput {
                documents: vec![DocumentInput {
                    id: "1",
                    language,
                    text: document,
                }],
            },
        };

        let started = Instant::now();
        let response = self
            .http_client
            .post(self.analyze_url())
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OperationError::Transport(format!("{} request failed: {}", kind, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OperationError::Transport(format!(
                "{} returned {}: {}",
                kind, status, body
            )));
        }

        let parsed: AnalyzeTextResponse = response.json().await.map_err(|e| {
            OperationError::Transport(format!("failed to parse {} response: {}", kind, e))
        })?;

        tracing::info!(
            kind,
            latency_ms = started.elapsed().as_millis() as u64,
            "text analysis completed"
        );

        Ok(parsed.results)
    }
}

#[async_trait]
impl LanguageCapability for AzureLanguageClient {
    async fn begin_summarization(
        &self,
        job: &AnalyticsJob,
        document: &str,
        language: &str,
    ) -> OperationResult<Box<dyn SummarizationHandle>> {
        let request = AnalyzeBatchRequest {
            analysis_input: AnalysisInput {
                documents: vec![DocumentInput {
                    id: "1",
                    language,
                    text: document,
                }],
            },
            tasks: vec![AnalysisTask {
                kind: job.kind.wire_name(),
                parameters: summarization_parameters(job),
            }],
        };

        let response = self
            .http_client
            .post(self.jobs_url())
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                OperationError::Transport(format!("summarization submit failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OperationError::Transport(format!(
                "summarization submit returned {}: {}",
                status, body
            )));
        }

        let operation_url = response
            .headers()
            .get("operation-location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                OperationError::Transport(
                    "summarization submit returned no operation-location".to_string(),
                )
            })?;

        tracing::info!(kind = job.kind.wire_name(), "summarization job accepted");

        Ok(Box::new(RestSummarizationHandle {
            http_client: self.http_client.clone(),
            subscription_key: self.subscription_key.clone(),
            operation_url,
        }))
    }

    async fn analyze_sentiment(
        &self,
        document: &str,
        language: &str,
    ) -> OperationResult<SentimentDocument> {
        let results = self
            .analyze_text("SentimentAnalysis", document, language)
            .await?;
        Ok(to_sentiment_document(results))
    }

    async fn extract_key_phrases(
        &self,
        document: &str,
        language: &str,
    ) -> OperationResult<KeyPhraseDocument> {
        let results = self
            .analyze_text("KeyPhraseExtraction", document, language)
            .await?;
        Ok(to_key_phrase_document(results))
    }
}

/// Polls the job's operation URL until it leaves the running states.
struct RestSummarizationHandle {
    http_client: reqwest::Client,
    subscription_key: String,
    operation_url: String,
}

#[async_trait]
impl SummarizationHandle for RestSummarizationHandle {
    async fn poll_until_done(self: Box<Self>) -> OperationResult<Vec<SummarizationItem>> {
        let started = Instant::now();
        loop {
            let response = self
                .http_client
                .get(&self.operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
                .send()
                .await
                .map_err(|e| OperationError::Transport(format!("job poll failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(OperationError::Transport(format!(
                    "job poll returned {}: {}",
                    status, body
                )));
            }

            let state: AnalyzeJobState = response.json().await.map_err(|e| {
                OperationError::Transport(format!("failed to parse job state: {}", e))
            })?;

            match state.status.as_str() {
                "notStarted" | "running" => tokio::time::sleep(POLL_INTERVAL).await,
                terminal => {
                    tracing::info!(
                        status = terminal,
                        latency_ms = started.elapsed().as_millis() as u64,
                        "summarization job reached a terminal state"
                    );
                    return Ok(convert_job_state(state));
                }
            }
        }
    }
}

/// Wire parameters for the requested summary length
fn summarization_parameters(job: &AnalyticsJob) -> serde_json::Value {
    match &job.length {
        SummaryLength::SentenceCount(count) => json!({ "sentenceCount": count }),
        SummaryLength::SentenceLength(tag) => json!({ "sentenceLength": tag }),
    }
}

/// Normalize a task result kind, e.g. "ExtractiveSummarizationLROResults"
/// back to "ExtractiveSummarization"
fn result_kind(wire_kind: &str) -> String {
    wire_kind.trim_end_matches(LRO_RESULTS_SUFFIX).to_string()
}

fn convert_job_state(state: AnalyzeJobState) -> Vec<SummarizationItem> {
    let job_failed = state.status != "succeeded" && state.status != "partiallyCompleted";
    let job_error = state.errors.first().cloned().map(to_remote_error).or_else(|| {
        job_failed.then(|| RemoteError {
            code: state.status.clone(),
            message: "analytics job did not succeed".to_string(),
        })
    });

    let items: Vec<SummarizationItem> = state
        .tasks
        .map(|tasks| tasks.items)
        .unwrap_or_default()
        .into_iter()
        .map(|task| {
            let task_failed = task.status == "failed";
            let mut documents = Vec::new();
            if let Some(results) = task.results {
                for doc in results.documents {
                    documents.push(SummaryDocument {
                        error: None,
                        sentences: doc.sentences.into_iter().map(|s| s.text).collect(),
                        summaries: doc.summaries.into_iter().map(|s| s.text).collect(),
                    });
                }
                for errored in results.errors {
                    documents.push(SummaryDocument {
                        error: Some(to_remote_error(errored.error)),
                        ..SummaryDocument::default()
                    });
                }
            }
            SummarizationItem {
                kind: result_kind(&task.kind),
                error: task_failed.then(|| {
                    job_error.clone().unwrap_or_else(|| RemoteError {
                        code: "failed".to_string(),
                        message: "analytics task failed".to_string(),
                    })
                }),
                documents,
            }
        })
        .collect();

    if items.is_empty() {
        // A failed job may carry no task items at all; surface the job error
        // as a single errored item so the orchestrator's ladder still fires.
        return vec![SummarizationItem {
            kind: String::new(),
            error: Some(job_error.unwrap_or_else(|| RemoteError {
                code: "empty".to_string(),
                message: "analytics job returned no task items".to_string(),
            })),
            documents: Vec::new(),
        }];
    }
    items
}

fn to_sentiment_document(results: SyncResults) -> SentimentDocument {
    if let Some(errored) = results.errors.into_iter().next() {
        return SentimentDocument {
            error: Some(to_remote_error(errored.error)),
            sentiment: None,
        };
    }

    let sentiment = results.documents.into_iter().next().and_then(|doc| {
        let label = doc.sentiment?;
        let scores = doc.confidence_scores?;
        Some(SentimentResult {
            label,
            scores: SentimentScores {
                positive: scores.positive,
                neutral: scores.neutral,
                negative: scores.negative,
            },
        })
    });

    SentimentDocument {
        error: None,
        sentiment,
    }
}

fn to_key_phrase_document(results: SyncResults) -> KeyPhraseDocument {
    if let Some(errored) = results.errors.into_iter().next() {
        return KeyPhraseDocument {
            error: Some(to_remote_error(errored.error)),
            key_phrases: Vec::new(),
        };
    }

    KeyPhraseDocument {
        error: None,
        key_phrases: results
            .documents
            .into_iter()
            .next()
            .map(|doc| doc.key_phrases)
            .unwrap_or_default(),
    }
}

fn to_remote_error(error: WireError) -> RemoteError {
    RemoteError {
        code: error.code,
        message: error.message,
    }
}

// === wire DTOs ===

#[derive(Debug, Serialize)]
struct AnalyzeBatchRequest<'a> {
    #[serde(rename = "analysisInput")]
    analysis_input: AnalysisInput<'a>,
    tasks: Vec<AnalysisTask>,
}

#[derive(Debug, Serialize)]
struct AnalyzeTextRequest<'a> {
    kind: &'static str,
    #[serde(rename = "analysisInput")]
    analysis_input: AnalysisInput<'a>,
}

#[derive(Debug, Serialize)]
struct AnalysisInput<'a> {
    documents: Vec<DocumentInput<'a>>,
}

#[derive(Debug, Serialize)]
struct DocumentInput<'a> {
    id: &'a str,
    language: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalysisTask {
    kind: &'static str,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AnalyzeJobState {
    status: String,
    #[serde(default)]
    errors: Vec<WireError>,
    #[serde(default)]
    tasks: Option<TaskCollection>,
}

#[derive(Debug, Deserialize)]
struct TaskCollection {
    #[serde(default)]
    items: Vec<TaskItem>,
}

#[derive(Debug, Deserialize)]
struct TaskItem {
    kind: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Option<TaskResults>,
}

#[derive(Debug, Deserialize)]
struct TaskResults {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(default)]
    errors: Vec<WireDocumentError>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    #[serde(default)]
    sentences: Vec<WireText>,
    #[serde(default)]
    summaries: Vec<WireText>,
}

#[derive(Debug, Deserialize)]
struct WireText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireDocumentError {
    error: WireError,
}

#[derive(Debug, Clone, Deserialize)]
struct WireError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse {
    results: SyncResults,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncResults {
    #[serde(default)]
    documents: Vec<SyncDocument>,
    #[serde(default)]
    errors: Vec<WireDocumentError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncDocument {
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    confidence_scores: Option<WireScores>,
    #[serde(default)]
    key_phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireScores {
    positive: f64,
    neutral: f64,
    negative: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::SummaryKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarization_parameters_sentence_count() {
        let job = AnalyticsJob::extractive(SummaryLength::SentenceCount(5));
        assert_eq!(
            summarization_parameters(&job),
            json!({ "sentenceCount": 5 })
        );
    }

    #[test]
    fn test_summarization_parameters_sentence_length() {
        let job = AnalyticsJob::abstractive(SummaryLength::SentenceLength("short".to_string()));
        assert_eq!(
            summarization_parameters(&job),
            json!({ "sentenceLength": "short" })
        );
    }

    #[test]
    fn test_default_job_asks_for_three_sentences() {
        let job = AnalyticsJob::default();
        assert_eq!(job.kind, SummaryKind::Extractive);
        assert_eq!(
            summarization_parameters(&job),
            json!({ "sentenceCount": 3 })
        );
    }

    #[test]
    fn test_result_kind_strips_lro_suffix() {
        assert_eq!(
            result_kind("ExtractiveSummarizationLROResults"),
            "ExtractiveSummarization"
        );
        assert_eq!(result_kind("ExtractiveSummarization"), "ExtractiveSummarization");
    }

    #[test]
    fn test_convert_succeeded_job() {
        let state: AnalyzeJobState = serde_json::from_value(json!({
            "status": "succeeded",
            "tasks": {
                "items": [{
                    "kind": "ExtractiveSummarizationLROResults",
                    "status": "succeeded",
                    "results": {
                        "documents": [{
                            "id": "1",
                            "sentences": [{ "text": "First." }, { "text": "Second." }]
                        }],
                        "errors": []
                    }
                }]
            }
        }))
        .unwrap();

        let items = convert_job_state(state);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, "ExtractiveSummarization");
        assert!(items[0].error.is_none());
        assert_eq!(
            items[0].documents[0].sentences,
            vec!["First.".to_string(), "Second.".to_string()]
        );
    }

    #[test]
    fn test_convert_failed_job_without_tasks_surfaces_error() {
        let state: AnalyzeJobState = serde_json::from_value(json!({
            "status": "failed",
            "errors": [{ "code": "InvalidRequest", "message": "bad document" }]
        }))
        .unwrap();

        let items = convert_job_state(state);
        assert_eq!(items.len(), 1);
        let error = items[0].error.as_ref().expect("job error expected");
        assert_eq!(error.code, "InvalidRequest");
    }

    #[test]
    fn test_convert_document_error() {
        let state: AnalyzeJobState = serde_json::from_value(json!({
            "status": "succeeded",
            "tasks": {
                "items": [{
                    "kind": "AbstractiveSummarizationLROResults",
                    "status": "succeeded",
                    "results": {
                        "documents": [],
                        "errors": [{
                            "id": "1",
                            "error": { "code": "UnsupportedLanguage", "message": "nope" }
                        }]
                    }
                }]
            }
        }))
        .unwrap();

        let items = convert_job_state(state);
        let document = &items[0].documents[0];
        assert_eq!(
            document.error.as_ref().unwrap().code,
            "UnsupportedLanguage"
        );
    }

    #[test]
    fn test_sentiment_document_from_sync_results() {
        let results: SyncResults = serde_json::from_value(json!({
            "documents": [{
                "id": "1",
                "sentiment": "negative",
                "confidenceScores": { "positive": 0.01, "neutral": 0.09, "negative": 0.9 }
            }],
            "errors": []
        }))
        .unwrap();

        let document = to_sentiment_document(results);
        let sentiment = document.sentiment.expect("verdict expected");
        assert_eq!(sentiment.label, "negative");
        assert_eq!(sentiment.scores.negative, 0.9);
    }

    #[test]
    fn test_key_phrases_from_sync_results() {
        let results: SyncResults = serde_json::from_value(json!({
            "documents": [{ "id": "1", "keyPhrases": ["speech", "cloud service"] }],
            "errors": []
        }))
        .unwrap();

        let document = to_key_phrase_document(results);
        assert!(document.error.is_none());
        assert_eq!(
            document.key_phrases,
            vec!["speech".to_string(), "cloud service".to_string()]
        );
    }

    #[test]
    fn test_sync_error_wins_over_documents() {
        let results: SyncResults = serde_json::from_value(json!({
            "documents": [],
            "errors": [{ "id": "1", "error": { "code": "InvalidDocument", "message": "empty" } }]
        }))
        .unwrap();

        let document = to_sentiment_document(results);
        assert!(document.sentiment.is_none());
        assert_eq!(document.error.unwrap().code, "InvalidDocument");
    }
}
