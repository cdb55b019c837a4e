use serde::{Deserialize, Serialize};

/// Everything needed to explain one rejection. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionQuery {
    pub student_name: String,
    pub student_skills: Vec<String>,
    pub student_cgpa: f64,
    pub job_role: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub min_cgpa: f64,
}

/// Student side of a bulk pattern request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub skills: Vec<String>,
    pub cgpa: f64,
}

/// One rejected application in a bulk pattern request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedApplication {
    pub job_role: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub min_cgpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// An objective criterion (CGPA or a named skill) was not met.
    RuleBased,
    /// Every stated criterion was met.
    NonRuleBased,
}

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Model,
    Fallback,
}

/// Structured body the model is asked to return for a single rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExplanation {
    pub classification: String,
    pub core_mismatch: String,
    pub missing_skills: Vec<String>,
    pub action_plan: Vec<String>,
    #[serde(default)]
    pub resume_feedback: Vec<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

/// Rule-based analysis produced without the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackAnalysis {
    pub classification: Classification,
    pub core_mismatch: String,
    pub missing_skills: Vec<String>,
    pub cgpa_gap: bool,
    pub action_plan: Vec<String>,
    pub resume_feedback: Vec<String>,
    pub disclaimer: String,
}

/// Result of `explain_rejection`, tagged by `source` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AnalysisResult {
    Model {
        text: String,
        explanation: ModelExplanation,
    },
    Fallback(FallbackAnalysis),
}

impl AnalysisResult {
    pub fn source(&self) -> AnalysisSource {
        match self {
            AnalysisResult::Model { .. } => AnalysisSource::Model,
            AnalysisResult::Fallback(_) => AnalysisSource::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub frequency: u32,
}

/// Result of `analyze_bulk_rejections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub source: AnalysisSource,
    pub total_rejections: usize,
    pub common_missing_skills: Vec<SkillFrequency>,
    pub cgpa_issues: bool,
    pub improvement_priorities: Vec<String>,
    pub summary: String,
}

/// Structured body the model is asked to return for a bulk request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelPatternInsights {
    pub common_missing_skills: Vec<SkillFrequency>,
    pub cgpa_issues: bool,
    pub improvement_priorities: Vec<String>,
    pub summary: String,
}
