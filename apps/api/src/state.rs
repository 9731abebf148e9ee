use crate::tasks::extractor::TaskExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the only handle to the OpenAI client; unavailable when no key is configured.
    pub extractor: TaskExtractor,
}
