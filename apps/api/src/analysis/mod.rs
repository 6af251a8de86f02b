// Resume analysis: prompt, structured-output schema, response validation.
// All LLM calls go through llm_client; nothing here calls Gemini directly.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
