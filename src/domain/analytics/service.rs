use super::model::{AnalyticsJob, SentimentResult, SummaryKind};
use crate::error::{OperationError, OperationResult};
use crate::infrastructure::language::LanguageCapability;
use std::sync::Arc;

/// Text analytics orchestrator: one-document batch summarization with
/// poll-until-done, plus the simpler single-call sentiment and key-phrase
/// variants. Poll scheduling lives in the capability; this service only
/// classifies the finished result.
pub struct AnalyticsService {
    capability: Arc<dyn LanguageCapability>,
}

impl AnalyticsService {
    pub fn new(capability: Arc<dyn LanguageCapability>) -> Self {
        Self { capability }
    }

    /// Summarize `text`, returning the summary (abstractive) or sentence
    /// (extractive) texts in order.
    pub async fn summarize(
        &self,
        text: &str,
        job: AnalyticsJob,
        language: &str,
    ) -> OperationResult<Vec<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OperationError::EmptyInput);
        }

        tracing::info!(
            kind = job.kind.wire_name(),
            language,
            text_length = text.len(),
            "summarization job submitted"
        );

        let handle = self
            .capability
            .begin_summarization(&job, text, language)
            .await?;
        let items = handle.poll_until_done().await?;

        // Batch size is one by construction; only the first item matters
        let item = items.into_iter().next().ok_or_else(|| {
            OperationError::Unexpected("analytics job finished with no result items".to_string())
        })?;

        // Failure ladder: job error, then kind mismatch, then document error
        if let Some(error) = item.error {
            tracing::warn!(error = %error, "summarization job reported an error");
            return Err(OperationError::Unexpected(format!("job error {}", error)));
        }

        if item.kind != job.kind.wire_name() {
            tracing::warn!(
                requested = job.kind.wire_name(),
                returned = %item.kind,
                "summarization result kind mismatch"
            );
            return Err(OperationError::Unexpected(format!(
                "requested {} but service returned {}",
                job.kind.wire_name(),
                item.kind
            )));
        }

        let document = item.documents.into_iter().next().ok_or_else(|| {
            OperationError::Unexpected("analytics result carried no documents".to_string())
        })?;

        if let Some(error) = document.error {
            tracing::warn!(error = %error, "summarization document reported an error");
            return Err(OperationError::Unexpected(format!(
                "document error {}",
                error
            )));
        }

        let texts = match job.kind {
            SummaryKind::Extractive => document.sentences,
            SummaryKind::Abstractive => document.summaries,
        };
        Ok(texts)
    }

    /// Detect document-level sentiment.
    pub async fn sentiment(&self, text: &str, language: &str) -> OperationResult<SentimentResult> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OperationError::EmptyInput);
        }

        let document = self.capability.analyze_sentiment(text, language).await?;

        if let Some(error) = document.error {
            tracing::warn!(error = %error, "sentiment analysis reported an error");
            return Err(OperationError::Unexpected(format!(
                "document error {}",
                error
            )));
        }

        document.sentiment.ok_or_else(|| {
            OperationError::Unexpected("sentiment analysis returned no verdict".to_string())
        })
    }

    /// Extract key phrases from the text.
    pub async fn keyphrases(&self, text: &str, language: &str) -> OperationResult<Vec<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OperationError::EmptyInput);
        }

        let document = self.capability.extract_key_phrases(text, language).await?;

        if let Some(error) = document.error {
            tracing::warn!(error = %error, "key phrase extraction reported an error");
            return Err(OperationError::Unexpected(format!(
                "document error {}",
                error
            )));
        }

        Ok(document.key_phrases)
    }
}
