// Word-detail generation: prompt building, model call, payload validation.
// All LLM calls go through llm_client; no direct Anthropic API calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod validation;

pub use generator::WordDetailGenerator;
