use crate::error::AppResult;

/// External collaborator abstractions
///
/// The chat pipeline talks to two network collaborators: a text-generation
/// service that writes the narrative preamble, and a media search service
/// that finds one illustrative clip per title. Both sit behind traits so the
/// pipeline can be driven with mocks and so either service can be swapped
/// out without touching the core.

pub mod huggingface;
pub mod tenor;

pub use huggingface::{GenerationParams, HuggingFaceGenerator};
pub use tenor::TenorSearcher;

/// Text-generation collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates free text for the prompt
    ///
    /// Callers treat failure as "no narrative", never as a fatal error.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Media search collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaSearcher: Send + Sync {
    /// Looks up one media URL for the query; `Ok(None)` means no results
    async fn search(&self, query: &str) -> AppResult<Option<String>>;
}
