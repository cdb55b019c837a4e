// Shared prompt constants and prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Closing sentence of every explanation, model-generated or synthesized.
/// The wording is fixed; do not edit it.
pub const DISCLAIMER: &str = "This explanation is based on declared profile data and listed eligibility criteria. Final hiring decisions may include additional factors.";

/// Instruction that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps explanations tied to the supplied data.
pub const GROUNDING_INSTRUCTION: &str = "\
    Base every statement ONLY on the profile and eligibility data provided. \
    Do NOT speculate about interview performance, recruiter preferences, or other candidates. \
    If the data shows every stated criterion was met, say so plainly.";

/// Wraps a prompt body in the instruction markers the hosted model expects.
pub fn instruct(body: &str) -> String {
    format!("<s>[INST] {} [/INST]", body.trim())
}
