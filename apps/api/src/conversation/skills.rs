//! Tech stack parsing: turns a free-text skills answer into an ordered,
//! de-duplicated list.

use std::collections::HashSet;

const MAX_SKILLS: usize = 30;
const MAX_SKILL_LEN: usize = 60;

/// Splits on commas, semicolons and newlines. Keeps the first spelling of
/// each skill (case-insensitive), drops blanks and entries longer than
/// `MAX_SKILL_LEN`, and caps the list at `MAX_SKILLS`.
pub fn parse_tech_stack(answer: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    answer
        .split([',', ';', '\n'])
        .map(|s| s.trim().trim_end_matches('.').trim())
        .filter(|s| !s.is_empty() && s.chars().count() <= MAX_SKILL_LEN)
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(MAX_SKILLS)
        .map(String::from)
        .collect()
}

/// True when an assistant turn asks the candidate for their skill list.
pub fn requests_skill_list(assistant_text: &str) -> bool {
    let lower = assistant_text.to_lowercase();
    (lower.contains("skills") || lower.contains("tech stack")) && lower.contains("comma")
}
