// All LLM prompt templates for the rejection coach.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Inputs are interpolated as-is. Field types are enforced at deserialization,
// so there is nothing further to validate here.

use crate::llm_client::prompts::{instruct, DISCLAIMER, GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::rejection::models::{RejectedApplication, RejectionQuery, StudentProfile};

/// Top-level keys the single-rejection response must contain.
pub const EXPLANATION_REQUIRED_KEYS: &[&str] =
    &["classification", "core_mismatch", "missing_skills", "action_plan"];

/// Top-level keys the bulk response must contain.
pub const PATTERN_REQUIRED_KEYS: &[&str] = &[
    "common_missing_skills",
    "cgpa_issues",
    "improvement_priorities",
    "summary",
];

/// Single rejection prompt. Replace: {json_only}, {grounding}, {student_name},
/// {student_skills}, {student_cgpa}, {job_role}, {company}, {required_skills},
/// {min_cgpa}, {disclaimer}
pub const REJECTION_PROMPT_TEMPLATE: &str = r#"You are a placement coach explaining to a student why their application was not selected.

{json_only}

{grounding}

STUDENT PROFILE:
- Name: {student_name}
- Skills: {student_skills}
- CGPA: {student_cgpa}

JOB:
- Role: {job_role}
- Company: {company}
- Required skills: {required_skills}
- Minimum CGPA: {min_cgpa}

TASKS:
1. Classify the rejection as "Rule-Based" (a stated CGPA or skill requirement was not met) or "Non-Rule-Based" (every stated requirement was met).
2. List the required skills missing from the student's profile.
3. Suggest a short, concrete action plan.
4. End with this exact disclaimer: "{disclaimer}"

Return a JSON object with this EXACT schema:
{
  "classification": "Rule-Based",
  "core_mismatch": "One or two sentences naming the unmet criteria",
  "missing_skills": ["Node.js"],
  "action_plan": ["Build a REST API with Node.js and Express"],
  "resume_feedback": ["List backend coursework explicitly"],
  "disclaimer": "{disclaimer}"
}"#;

/// Bulk pattern prompt. Replace: {json_only}, {grounding}, {student_name},
/// {student_skills}, {student_cgpa}, {rejection_count}, {rejections},
/// {disclaimer}
pub const PATTERN_PROMPT_TEMPLATE: &str = r#"You are a placement coach looking for patterns across a student's rejected applications.

{json_only}

{grounding}

STUDENT PROFILE:
- Name: {student_name}
- Skills: {student_skills}
- CGPA: {student_cgpa}

REJECTED APPLICATIONS ({rejection_count}):
{rejections}

TASKS:
1. Identify the required skills that are most often missing, with how many rejections each appears in.
2. State whether the student's CGPA was below the cut-off for any of these roles.
3. Rank the top improvement priorities.
4. End the summary with this exact disclaimer: "{disclaimer}"

Return a JSON object with this EXACT schema:
{
  "common_missing_skills": [{"skill": "SQL", "frequency": 2}],
  "cgpa_issues": false,
  "improvement_priorities": ["Learn SQL"],
  "summary": "Two short sentences describing the pattern, then the disclaimer."
}"#;

/// Builds the prompt for a single rejection explanation.
pub fn build_single_prompt(query: &RejectionQuery) -> String {
    let body = REJECTION_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{student_name}", &query.student_name)
        .replace("{student_skills}", &join_or_none(&query.student_skills))
        .replace("{student_cgpa}", &query.student_cgpa.to_string())
        .replace("{job_role}", &query.job_role)
        .replace("{company}", &query.company)
        .replace("{required_skills}", &join_or_none(&query.required_skills))
        .replace("{min_cgpa}", &query.min_cgpa.to_string())
        .replace("{disclaimer}", DISCLAIMER);
    instruct(&body)
}

/// Builds the prompt for a multi-rejection pattern summary.
pub fn build_bulk_prompt(student: &StudentProfile, rejections: &[RejectedApplication]) -> String {
    let listed = rejections
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} at {} (required skills: {}; minimum CGPA: {})",
                i + 1,
                r.job_role,
                r.company,
                join_or_none(&r.required_skills),
                r.min_cgpa
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = PATTERN_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{student_name}", &student.name)
        .replace("{student_skills}", &join_or_none(&student.skills))
        .replace("{student_cgpa}", &student.cgpa.to_string())
        .replace("{rejection_count}", &rejections.len().to_string())
        .replace("{rejections}", &listed)
        .replace("{disclaimer}", DISCLAIMER);
    instruct(&body)
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none listed".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_query() -> RejectionQuery {
        RejectionQuery {
            student_name: "Asha Rao".to_string(),
            student_skills: vec!["React".to_string()],
            student_cgpa: 6.5,
            job_role: "Full Stack Intern".to_string(),
            company: "Acme Labs".to_string(),
            required_skills: vec!["React".to_string(), "Node.js".to_string()],
            min_cgpa: 8.0,
        }
    }

    #[test]
    fn test_single_prompt_interpolates_every_field() {
        let prompt = build_single_prompt(&sample_query());
        assert!(prompt.contains("Name: Asha Rao"));
        assert!(prompt.contains("Skills: React\n"));
        assert!(prompt.contains("CGPA: 6.5"));
        assert!(prompt.contains("Role: Full Stack Intern"));
        assert!(prompt.contains("Company: Acme Labs"));
        assert!(prompt.contains("Required skills: React, Node.js"));
        assert!(prompt.contains("Minimum CGPA: 8"));
        assert!(prompt.contains(DISCLAIMER));
    }

    #[test]
    fn test_single_prompt_leaves_no_placeholders() {
        let prompt = build_single_prompt(&sample_query());
        for placeholder in [
            "{json_only}",
            "{grounding}",
            "{student_name}",
            "{student_skills}",
            "{student_cgpa}",
            "{job_role}",
            "{company}",
            "{required_skills}",
            "{min_cgpa}",
            "{disclaimer}",
        ] {
            assert!(!prompt.contains(placeholder), "left {placeholder} in prompt");
        }
    }

    #[test]
    fn test_single_prompt_names_required_keys() {
        let prompt = build_single_prompt(&sample_query());
        for key in EXPLANATION_REQUIRED_KEYS {
            assert!(prompt.contains(&format!("\"{key}\"")), "schema lacks {key}");
        }
    }

    #[test]
    fn test_bulk_prompt_lists_each_rejection() {
        let student = StudentProfile {
            name: "Asha Rao".to_string(),
            skills: vec![],
            cgpa: 7.2,
        };
        let rejections = vec![
            RejectedApplication {
                job_role: "Data Analyst".to_string(),
                company: "Acme".to_string(),
                required_skills: vec!["SQL".to_string()],
                min_cgpa: 7.0,
            },
            RejectedApplication {
                job_role: "BI Intern".to_string(),
                company: "Globex".to_string(),
                required_skills: vec!["SQL".to_string(), "Tableau".to_string()],
                min_cgpa: 7.5,
            },
        ];
        let prompt = build_bulk_prompt(&student, &rejections);
        assert!(prompt.contains("REJECTED APPLICATIONS (2):"));
        assert!(prompt.contains("1. Data Analyst at Acme (required skills: SQL; minimum CGPA: 7)"));
        assert!(prompt.contains("2. BI Intern at Globex (required skills: SQL, Tableau; minimum CGPA: 7.5)"));
        assert!(prompt.contains("Skills: none listed"));
        for key in PATTERN_REQUIRED_KEYS {
            assert!(prompt.contains(&format!("\"{key}\"")), "schema lacks {key}");
        }
    }

    #[test]
    fn test_prompts_are_wrapped_for_instruct_model() {
        let prompt = build_single_prompt(&sample_query());
        assert!(prompt.starts_with("<s>[INST] "));
        assert!(prompt.ends_with(" [/INST]"));
    }
}
