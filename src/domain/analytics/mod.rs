pub mod model;
pub mod service;

pub use model::{
    AnalyticsJob, KeyPhraseDocument, RemoteError, SentimentDocument, SentimentResult,
    SentimentScores, SummarizationItem, SummaryDocument, SummaryKind, SummaryLength,
};
pub use service::AnalyticsService;
