// Ban appeal judging: prompt, one completion call, parse, append-only log.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod service;
pub mod store;

#[cfg(test)]
pub mod testing;
