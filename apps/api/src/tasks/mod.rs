// Task analysis: turns a free-text request into a structured `Task`.
// All LLM calls go through llm_client; no direct OpenAI calls here.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
pub mod validation;
