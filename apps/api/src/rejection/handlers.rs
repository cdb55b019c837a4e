//! Axum route handlers for the Rejection Coach API.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::rejection::coach::ANONYMOUS_CALLER;
use crate::rejection::models::{
    AnalysisResult, PatternAnalysis, RejectedApplication, RejectionQuery, StudentProfile,
};
use crate::state::AppState;

/// Header carrying the caller identity used as the rate-limit partition key.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

#[derive(Debug, Serialize, Deserialize)]
pub struct PatternRequest {
    pub student: StudentProfile,
    pub rejections: Vec<RejectedApplication>,
}

/// POST /api/v1/rejections/explain
///
/// Explains a single rejection. Always answers with an analysis unless the
/// caller is rate limited or the model endpoint rejects our credentials.
pub async fn handle_explain(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(query): Json<RejectionQuery>,
) -> Result<Json<AnalysisResult>, AppError> {
    if query.job_role.trim().is_empty() {
        return Err(AppError::Validation("job_role cannot be empty".to_string()));
    }
    validate_cgpa("student_cgpa", query.student_cgpa)?;
    validate_cgpa("min_cgpa", query.min_cgpa)?;

    let caller_id = caller_id(&headers);
    let result = state.coach.explain_rejection(&caller_id, &query).await?;
    debug!("Explained rejection for caller {caller_id} via {:?}", result.source());
    Ok(Json(result))
}

/// POST /api/v1/rejections/patterns
///
/// Summarizes missing-skill and CGPA patterns across several rejections.
pub async fn handle_patterns(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PatternRequest>,
) -> Result<Json<PatternAnalysis>, AppError> {
    validate_cgpa("student.cgpa", request.student.cgpa)?;
    for rejection in &request.rejections {
        validate_cgpa("rejections[].min_cgpa", rejection.min_cgpa)?;
    }

    let caller_id = caller_id(&headers);
    let analysis = state
        .coach
        .analyze_bulk_rejections(&caller_id, &request.student, &request.rejections)
        .await?;
    Ok(Json(analysis))
}

fn caller_id(headers: &HeaderMap) -> String {
    headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_CALLER)
        .to_string()
}

fn validate_cgpa(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        )))
    }
}
