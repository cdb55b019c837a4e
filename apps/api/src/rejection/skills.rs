//! Skill matching shared by the fallback synthesizer and the pattern aggregator.

/// True when some student skill name contains `required`, ignoring case and
/// surrounding whitespace. A shorter student skill never covers a longer
/// requirement ("Java" does not cover "JavaScript"). Blank names never match.
pub fn has_skill(student_skills: &[String], required: &str) -> bool {
    let required = required.trim().to_lowercase();
    if required.is_empty() {
        return false;
    }

    student_skills.iter().any(|skill| {
        let skill = skill.trim().to_lowercase();
        !skill.is_empty() && skill.contains(&required)
    })
}

/// Required skills the student does not cover, in the order they were listed.
/// Blank requirement names are skipped.
pub fn missing_skills(student_skills: &[String], required_skills: &[String]) -> Vec<String> {
    required_skills
        .iter()
        .filter(|required| !required.trim().is_empty())
        .filter(|required| !has_skill(student_skills, required))
        .cloned()
        .collect()
}
