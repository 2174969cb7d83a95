use crate::domain::analytics::{
    AnalyticsJob, KeyPhraseDocument, SentimentDocument, SummarizationItem,
};
use crate::error::OperationResult;
use async_trait::async_trait;

/// Handle to a submitted analytics job. Poll scheduling (intervals, terminal
/// state detection) is the capability's job; orchestrators only await the
/// finished result.
#[async_trait]
pub trait SummarizationHandle: Send {
    async fn poll_until_done(self: Box<Self>) -> OperationResult<Vec<SummarizationItem>>;
}

/// The remote text analytics service at its boundary.
///
/// Summarization is a batch job: submit, then poll to completion through the
/// returned handle. Sentiment and key phrases are synchronous single calls.
/// Transport faults surface as `OperationError::Transport`; business errors
/// ride inside the returned documents for the orchestrator to classify.
#[async_trait]
pub trait LanguageCapability: Send + Sync {
    /// Submit a one-document summarization batch
    async fn begin_summarization(
        &self,
        job: &AnalyticsJob,
        document: &str,
        language: &str,
    ) -> OperationResult<Box<dyn SummarizationHandle>>;

    async fn analyze_sentiment(
        &self,
        document: &str,
        language: &str,
    ) -> OperationResult<SentimentDocument>;

    async fn extract_key_phrases(
        &self,
        document: &str,
        language: &str,
    ) -> OperationResult<KeyPhraseDocument>;
}
