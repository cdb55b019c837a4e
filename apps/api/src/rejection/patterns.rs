//! Pattern Aggregator: frequency of missing skills across many rejections.
//!
//! Produces the bulk-mode fallback and is pure. Ranking is by raw count only;
//! ties keep the order in which skills were first seen.

use std::collections::HashMap;

use crate::rejection::models::{AnalysisSource, PatternAnalysis, RejectedApplication, SkillFrequency};
use crate::rejection::skills::missing_skills;

/// Maximum entries in `common_missing_skills`.
pub const TOP_MISSING_SKILLS: usize = 5;

/// Skills from the top of the ranking that become improvement priorities.
const PRIORITY_SKILLS: usize = 2;

const CGPA_PRIORITY: &str =
    "Raise your CGPA above the most common cut-off, or target roles with flexible academic criteria.";

const GENERAL_PRIORITY: &str =
    "You met the listed criteria in these rejections; focus on interview preparation and project depth.";

/// Insertion-ordered skill counter.
#[derive(Debug, Default)]
struct PatternTally {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl PatternTally {
    fn record(&mut self, skill: &str) {
        match self.counts.get_mut(skill) {
            Some(count) => *count += 1,
            None => {
                self.order.push(skill.to_string());
                self.counts.insert(skill.to_string(), 1);
            }
        }
    }

    /// Descending by count; `sort_by` is stable so first-seen order breaks ties.
    fn ranked(self, limit: usize) -> Vec<SkillFrequency> {
        let PatternTally { order, counts } = self;
        let mut ranked: Vec<SkillFrequency> = order
            .into_iter()
            .map(|skill| {
                let frequency = counts.get(&skill).copied().unwrap_or_default();
                SkillFrequency { skill, frequency }
            })
            .collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        ranked.truncate(limit);
        ranked
    }
}

/// Tallies unmet skill requirements across `rejections` and ranks them.
pub fn aggregate(
    student_skills: &[String],
    rejections: &[RejectedApplication],
    student_cgpa: f64,
) -> PatternAnalysis {
    let mut tally = PatternTally::default();
    for rejection in rejections {
        for skill in missing_skills(student_skills, &rejection.required_skills) {
            tally.record(&skill);
        }
    }

    let cgpa_issues = rejections
        .iter()
        .any(|rejection| student_cgpa < rejection.min_cgpa);

    let common_missing_skills = tally.ranked(TOP_MISSING_SKILLS);

    let mut improvement_priorities: Vec<String> = common_missing_skills
        .iter()
        .take(PRIORITY_SKILLS)
        .map(|entry| format!("Learn {}", entry.skill))
        .collect();
    if cgpa_issues {
        improvement_priorities.push(CGPA_PRIORITY.to_string());
    }
    if improvement_priorities.is_empty() {
        improvement_priorities.push(GENERAL_PRIORITY.to_string());
    }

    let summary = summarize(rejections.len(), &common_missing_skills, cgpa_issues);

    PatternAnalysis {
        source: AnalysisSource::Fallback,
        total_rejections: rejections.len(),
        common_missing_skills,
        cgpa_issues,
        improvement_priorities,
        summary,
    }
}

fn summarize(total: usize, ranked: &[SkillFrequency], cgpa_issues: bool) -> String {
    let skills_part = match ranked.first() {
        Some(top) => format!(
            "The most frequent missing skill is {} ({} of {} rejections).",
            top.skill, top.frequency, total
        ),
        None => "No required skill was missing from your profile.".to_string(),
    };
    let cgpa_part = if cgpa_issues {
        " Your CGPA was below the cut-off for at least one role."
    } else {
        ""
    };
    format!("Analyzed {total} rejection(s). {skills_part}{cgpa_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(required: &[&str], min_cgpa: f64) -> RejectedApplication {
        RejectedApplication {
            job_role: "Analyst".to_string(),
            company: "Acme".to_string(),
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            min_cgpa,
        }
    }

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_skill_missing_from_two_rejections() {
        let analysis = aggregate(
            &skills(&["Excel"]),
            &[rejection(&["SQL"], 6.0), rejection(&["SQL", "Excel"], 6.0)],
            8.0,
        );
        assert!(analysis.common_missing_skills.contains(&SkillFrequency {
            skill: "SQL".to_string(),
            frequency: 2,
        }));
        assert_eq!(analysis.total_rejections, 2);
        assert_eq!(analysis.source, AnalysisSource::Fallback);
    }

    #[test]
    fn test_ranking_is_descending_and_ties_keep_first_seen_order() {
        let analysis = aggregate(
            &[],
            &[
                rejection(&["Docker", "AWS", "SQL"], 0.0),
                rejection(&["SQL", "Kafka"], 0.0),
                rejection(&["AWS"], 0.0),
            ],
            9.0,
        );
        let order: Vec<(&str, u32)> = analysis
            .common_missing_skills
            .iter()
            .map(|e| (e.skill.as_str(), e.frequency))
            .collect();
        assert_eq!(
            order,
            vec![("AWS", 2), ("SQL", 2), ("Docker", 1), ("Kafka", 1)]
        );
    }

    #[test]
    fn test_top_five_only() {
        let analysis = aggregate(
            &[],
            &[rejection(&["A", "B", "C", "D", "E", "F", "G"], 0.0)],
            9.0,
        );
        assert_eq!(analysis.common_missing_skills.len(), TOP_MISSING_SKILLS);
        assert_eq!(analysis.common_missing_skills[4].skill, "E");
    }

    #[test]
    fn test_cgpa_issue_from_any_rejection() {
        let analysis = aggregate(
            &skills(&["SQL"]),
            &[rejection(&["SQL"], 6.0), rejection(&["SQL"], 8.5)],
            7.0,
        );
        assert!(analysis.cgpa_issues);
        assert_eq!(analysis.improvement_priorities, vec![CGPA_PRIORITY]);
    }

    #[test]
    fn test_priorities_are_top_two_skills_then_cgpa() {
        let analysis = aggregate(
            &[],
            &[
                rejection(&["SQL", "Docker", "Go"], 9.0),
                rejection(&["SQL", "Docker"], 6.0),
                rejection(&["SQL"], 6.0),
            ],
            7.0,
        );
        assert_eq!(
            analysis.improvement_priorities,
            vec!["Learn SQL", "Learn Docker", CGPA_PRIORITY]
        );
    }

    #[test]
    fn test_nothing_missing_gives_general_priority() {
        let analysis = aggregate(&skills(&["SQL"]), &[rejection(&["sql"], 6.0)], 9.0);
        assert!(analysis.common_missing_skills.is_empty());
        assert!(!analysis.cgpa_issues);
        assert_eq!(analysis.improvement_priorities, vec![GENERAL_PRIORITY]);
        assert!(analysis.summary.contains("No required skill was missing"));
    }

    #[test]
    fn test_short_student_skill_still_counts_as_missing() {
        let analysis = aggregate(
            &skills(&["Java"]),
            &[rejection(&["JavaScript"], 0.0), rejection(&["JavaScript", "Java"], 0.0)],
            9.0,
        );
        assert_eq!(
            analysis.common_missing_skills,
            vec![SkillFrequency {
                skill: "JavaScript".to_string(),
                frequency: 2,
            }]
        );
    }

    #[test]
    fn test_empty_rejections() {
        let analysis = aggregate(&skills(&["SQL"]), &[], 9.0);
        assert_eq!(analysis.total_rejections, 0);
        assert!(analysis.common_missing_skills.is_empty());
        assert!(!analysis.cgpa_issues);
    }

    #[test]
    fn test_summary_mentions_top_skill() {
        let analysis = aggregate(&[], &[rejection(&["SQL"], 0.0), rejection(&["SQL"], 0.0)], 9.0);
        assert_eq!(
            analysis.summary,
            "Analyzed 2 rejection(s). The most frequent missing skill is SQL (2 of 2 rejections)."
        );
    }
}
