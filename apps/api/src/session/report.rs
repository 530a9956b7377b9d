use std::fmt::Write;

use crate::models::session::Session;

/// Renders the downloadable Markdown report. `None` until the current
/// screening has a completed assessment.
pub fn render_report(session: &Session) -> Option<String> {
    let assessment = session.completed_assessment()?;
    let info = &session.candidate_info;

    let mut out = String::from("# TalentScout Pro Candidate Report\n\n## Candidate Details\n\n");
    for (label, value) in [
        ("Full name", &info.full_name),
        ("Email", &info.email),
        ("Phone", &info.phone),
        ("Experience", &info.experience),
        ("Position", &info.position),
        ("Location", &info.location),
    ] {
        let value = if value.is_empty() { "-" } else { value.as_str() };
        let _ = writeln!(out, "- **{label}:** {value}");
    }
    if let Some(file) = &info.resume_file {
        let _ = writeln!(out, "- **Resume:** {}", file.file_name);
    }

    out.push_str("\n## Technical Skills\n\n");
    if session.tech_stack.is_empty() {
        out.push_str("_None declared_\n");
    } else {
        for skill in &session.tech_stack {
            let _ = writeln!(out, "- {skill}");
        }
    }

    let _ = write!(out, "\n## Final Assessment\n\n{}\n", assessment.trim_end());
    Some(out)
}
