// Rejection Coach: explains why an application was not selected.
// Implements: prompt building, model call, JSON extraction, rule-based
// fallback, and multi-rejection pattern aggregation.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod coach;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod patterns;
pub mod prompts;
pub mod skills;
