// Conversation engine: per-turn driver, summary generation, skill capture.
// All model calls go through llm_client::GenerationService.

pub mod driver;
pub mod handlers;
pub mod prompts;
pub mod skills;
pub mod summary;
