use serde::{Deserialize, Serialize};

/// Which summarization flavor the job requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Extractive,
    Abstractive,
}

impl SummaryKind {
    /// Task kind name on the wire; result items report the same name back
    pub fn wire_name(&self) -> &'static str {
        match self {
            SummaryKind::Extractive => "ExtractiveSummarization",
            SummaryKind::Abstractive => "AbstractiveSummarization",
        }
    }
}

/// Size parameter of a summarization job. The two variants are mutually
/// exclusive on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLength {
    /// Cap on the number of returned sentences
    SentenceCount(u32),
    /// Provider-defined length tag such as "short", "medium" or "long"
    SentenceLength(String),
}

impl Default for SummaryLength {
    fn default() -> Self {
        SummaryLength::SentenceCount(3)
    }
}

/// A summarization job: built, submitted as a one-item batch, polled to a
/// terminal state, then discarded.
#[derive(Debug, Clone)]
pub struct AnalyticsJob {
    pub kind: SummaryKind,
    pub length: SummaryLength,
}

impl AnalyticsJob {
    pub fn extractive(length: SummaryLength) -> Self {
        Self {
            kind: SummaryKind::Extractive,
            length,
        }
    }

    pub fn abstractive(length: SummaryLength) -> Self {
        Self {
            kind: SummaryKind::Abstractive,
            length,
        }
    }
}

impl Default for AnalyticsJob {
    fn default() -> Self {
        Self::extractive(SummaryLength::default())
    }
}

/// Error reported by the remote service for a job or a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}", self.code, self.message)
    }
}

/// One task item from a finished analytics job. Batches are built with a
/// single task, so orchestrators only ever look at the first item.
#[derive(Debug, Clone)]
pub struct SummarizationItem {
    /// Result kind as reported by the service, e.g. "ExtractiveSummarization"
    pub kind: String,
    /// Job-level error, set when the task itself failed
    pub error: Option<RemoteError>,
    pub documents: Vec<SummaryDocument>,
}

/// Per-document slice of a summarization result
#[derive(Debug, Clone, Default)]
pub struct SummaryDocument {
    pub error: Option<RemoteError>,
    /// Extracted sentences (extractive jobs)
    pub sentences: Vec<String>,
    /// Generated summaries (abstractive jobs)
    pub summaries: Vec<String>,
}

/// Confidence scores attached to a sentiment verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Document-level sentiment verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// "positive", "neutral", "negative" or "mixed"
    pub label: String,
    pub scores: SentimentScores,
}

/// Per-document sentiment outcome at the capability seam
#[derive(Debug, Clone)]
pub struct SentimentDocument {
    pub error: Option<RemoteError>,
    pub sentiment: Option<SentimentResult>,
}

/// Per-document key-phrase outcome at the capability seam
#[derive(Debug, Clone)]
pub struct KeyPhraseDocument {
    pub error: Option<RemoteError>,
    pub key_phrases: Vec<String>,
}
