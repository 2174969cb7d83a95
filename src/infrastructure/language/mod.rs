pub mod capability;
pub mod rest;

pub use capability::{LanguageCapability, SummarizationHandle};
pub use rest::AzureLanguageClient;
