//! Rejection Coach: orchestrates the explanation pipeline.
//!
//! Flow: build prompt → rate-limit gate → model call → extract JSON →
//!       check required keys → decode. Any recoverable failure falls through
//!       to the deterministic synthesizer so the student always gets an answer.
//!
//! Only two failures reach the caller: the per-caller rate limit and an
//! authentication error from the model endpoint.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::extract::{extract_json, require_keys, ParseError};
use crate::llm_client::{GenerationParams, LlmError, TextGenerator};
use crate::ratelimit::RateLimiter;
use crate::rejection::fallback::synthesize;
use crate::rejection::models::{
    AnalysisResult, AnalysisSource, ModelExplanation, ModelPatternInsights, PatternAnalysis,
    RejectedApplication, RejectionQuery, StudentProfile,
};
use crate::rejection::patterns::{aggregate, TOP_MISSING_SKILLS};
use crate::rejection::prompts::{
    build_bulk_prompt, build_single_prompt, EXPLANATION_REQUIRED_KEYS, PATTERN_REQUIRED_KEYS,
};

/// Caller identity used when the request does not carry one.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Per-operation rate-limit ceilings.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub explain_per_window: usize,
    pub patterns_per_window: usize,
    pub window_ms: i64,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            explain_per_window: 10,
            patterns_per_window: 3,
            window_ms: 60_000,
        }
    }
}

/// Why the model path did not produce a usable answer.
#[derive(Debug, Error)]
enum ModelPathError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub struct RejectionCoach {
    llm: Arc<dyn TextGenerator>,
    limiter: Arc<RateLimiter>,
    limits: RateLimits,
    params: GenerationParams,
}

impl RejectionCoach {
    pub fn new(llm: Arc<dyn TextGenerator>, limiter: Arc<RateLimiter>, limits: RateLimits) -> Self {
        Self {
            llm,
            limiter,
            limits,
            params: GenerationParams::default(),
        }
    }

    /// Explains a single rejection.
    pub async fn explain_rejection(
        &self,
        caller_id: &str,
        query: &RejectionQuery,
    ) -> Result<AnalysisResult, AppError> {
        let prompt = build_single_prompt(query);
        self.acquire("explain", caller_id, self.limits.explain_per_window)?;

        match self.run_model::<ModelExplanation>(&prompt, EXPLANATION_REQUIRED_KEYS).await {
            Ok((text, explanation)) => {
                info!(
                    "Model explanation for {} at {} (caller {caller_id})",
                    query.job_role, query.company
                );
                Ok(AnalysisResult::Model { text, explanation })
            }
            Err(ModelPathError::Llm(LlmError::Auth)) => Err(AppError::LlmAuth(
                "text-generation endpoint rejected the API token".to_string(),
            )),
            Err(e) => {
                warn!("Model path failed, using rule-based explanation: {e}");
                Ok(AnalysisResult::Fallback(synthesize(query)))
            }
        }
    }

    /// Summarizes patterns across several rejections.
    pub async fn analyze_bulk_rejections(
        &self,
        caller_id: &str,
        student: &StudentProfile,
        rejections: &[RejectedApplication],
    ) -> Result<PatternAnalysis, AppError> {
        if rejections.is_empty() {
            return Ok(aggregate(&student.skills, rejections, student.cgpa));
        }

        let prompt = build_bulk_prompt(student, rejections);
        self.acquire("patterns", caller_id, self.limits.patterns_per_window)?;

        match self.run_model::<ModelPatternInsights>(&prompt, PATTERN_REQUIRED_KEYS).await {
            Ok((_, insights)) => {
                info!(
                    "Model pattern analysis over {} rejections (caller {caller_id})",
                    rejections.len()
                );
                Ok(from_model_insights(insights, rejections.len()))
            }
            Err(ModelPathError::Llm(LlmError::Auth)) => Err(AppError::LlmAuth(
                "text-generation endpoint rejected the API token".to_string(),
            )),
            Err(e) => {
                warn!("Model path failed, using frequency-based patterns: {e}");
                Ok(aggregate(&student.skills, rejections, student.cgpa))
            }
        }
    }

    /// Each operation keeps its own window per caller.
    fn acquire(&self, operation: &str, caller_id: &str, max_per_window: usize) -> Result<(), AppError> {
        let key = format!("{operation}:{caller_id}");
        if self
            .limiter
            .try_acquire(&key, max_per_window, self.limits.window_ms)
        {
            return Ok(());
        }
        let retry_after_ms = self.limiter.retry_after_ms(&key, self.limits.window_ms);
        warn!("Rate limit hit for caller {caller_id}, retry in {retry_after_ms}ms");
        Err(AppError::RateLimited { retry_after_ms })
    }

    /// Calls the model and decodes its JSON body. Returns the raw text too.
    async fn run_model<T: DeserializeOwned>(
        &self,
        prompt: &str,
        required_keys: &[&str],
    ) -> Result<(String, T), ModelPathError> {
        let text = self.llm.generate(prompt, &self.params).await?;
        let value = extract_json(&text)?;
        require_keys(&value, required_keys)?;
        let decoded = serde_json::from_value(value).map_err(ParseError::Invalid)?;
        Ok((text, decoded))
    }
}

fn from_model_insights(insights: ModelPatternInsights, total_rejections: usize) -> PatternAnalysis {
    let mut common_missing_skills = insights.common_missing_skills;
    common_missing_skills.truncate(TOP_MISSING_SKILLS);
    PatternAnalysis {
        source: AnalysisSource::Model,
        total_rejections,
        common_missing_skills,
        cgpa_issues: insights.cgpa_issues,
        improvement_priorities: insights.improvement_priorities,
        summary: insights.summary,
    }
}
