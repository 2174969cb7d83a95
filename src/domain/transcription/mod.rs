pub mod service;

pub use service::TranscriptionService;
