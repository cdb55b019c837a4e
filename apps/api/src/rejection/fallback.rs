//! Fallback Synthesizer: deterministic rejection analysis with no model call.
//!
//! Used whenever the model path fails for a recoverable reason, so a student
//! always receives an explanation. Pure function of the query.
//!
//! Algorithm:
//! 1. missing_skills = required skills not covered by any student skill
//! 2. cgpa_gap = student CGPA below the job minimum
//! 3. RuleBased if either check fails, otherwise NonRuleBased
//! 4. core_mismatch from a four-row table on (cgpa_gap, any missing skills)
//! 5. action_plan / resume_feedback from fixed lists chosen by classification

use crate::llm_client::prompts::DISCLAIMER;
use crate::rejection::models::{Classification, FallbackAnalysis, RejectionQuery};
use crate::rejection::skills::missing_skills;

const RULE_BASED_ACTION_PLAN: &[&str] = &[
    "Close the listed skill gaps with a focused course or certification for each missing skill.",
    "Build one small project per missing skill and link it from your resume.",
    "Check eligibility criteria before applying and prioritise roles whose cut-offs you meet.",
    "If your CGPA is below the cut-off, target roles with flexible academic criteria while you improve it.",
];

const NON_RULE_BASED_ACTION_PLAN: &[&str] = &[
    "Practise mock interviews with your faculty mentor or the placement cell.",
    "Ask the placement officer whether recruiter feedback is available for this role.",
    "Strengthen project descriptions with measurable outcomes.",
    "Keep applying to similar roles; you meet the stated requirements.",
];

const RULE_BASED_RESUME_FEEDBACK: &[&str] = &[
    "List every relevant skill explicitly in the skills section so it can be matched against requirements.",
    "Add coursework or projects that demonstrate the required skills.",
];

const NON_RULE_BASED_RESUME_FEEDBACK: &[&str] = &[
    "Tailor the summary and project order to each role you apply for.",
    "Quantify the impact of projects and internships where possible.",
];

/// Builds a rule-based analysis for `query`. Never fails.
pub fn synthesize(query: &RejectionQuery) -> FallbackAnalysis {
    let missing_skills = missing_skills(&query.student_skills, &query.required_skills);
    let cgpa_gap = query.student_cgpa < query.min_cgpa;

    let classification = if cgpa_gap || !missing_skills.is_empty() {
        Classification::RuleBased
    } else {
        Classification::NonRuleBased
    };

    let core_mismatch = core_mismatch(query, cgpa_gap, &missing_skills);

    let (action_plan, resume_feedback) = match classification {
        Classification::RuleBased => (RULE_BASED_ACTION_PLAN, RULE_BASED_RESUME_FEEDBACK),
        Classification::NonRuleBased => (NON_RULE_BASED_ACTION_PLAN, NON_RULE_BASED_RESUME_FEEDBACK),
    };

    FallbackAnalysis {
        classification,
        core_mismatch,
        missing_skills,
        cgpa_gap,
        action_plan: owned_list(action_plan),
        resume_feedback: owned_list(resume_feedback),
        disclaimer: DISCLAIMER.to_string(),
    }
}

fn core_mismatch(query: &RejectionQuery, cgpa_gap: bool, missing: &[String]) -> String {
    match (cgpa_gap, missing.is_empty()) {
        (true, false) => format!(
            "Your CGPA of {} is below the minimum of {} required for {} at {}, and your profile is missing {} required skill(s): {}.",
            query.student_cgpa,
            query.min_cgpa,
            query.job_role,
            query.company,
            missing.len(),
            missing.join(", ")
        ),
        (true, true) => format!(
            "Your CGPA of {} is below the minimum of {} required for {} at {}.",
            query.student_cgpa, query.min_cgpa, query.job_role, query.company
        ),
        (false, false) => format!(
            "Your profile is missing {} skill(s) required for {} at {}: {}.",
            missing.len(),
            query.job_role,
            query.company,
            missing.join(", ")
        ),
        (false, true) => format!(
            "You met every listed criterion for {} at {}. The decision likely depended on factors not captured in your profile, such as interview performance or the size of the applicant pool.",
            query.job_role, query.company
        ),
    }
}

fn owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
