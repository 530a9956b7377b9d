use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::session::{CandidateInfo, Session};

/// Current on-disk snapshot format. Files written before versioning read as 0.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// The persisted record of one session: candidate data, skills and the
/// final assessment text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
    #[serde(default)]
    pub format_version: u32,
    pub timestamp: NaiveDateTime,
    pub candidate_info: CandidateInfo,
    pub tech_stack: Vec<String>,
    pub assessment: Option<String>,
}

impl AssessmentSnapshot {
    pub fn capture(session: &Session, timestamp: NaiveDateTime) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            timestamp,
            candidate_info: session.candidate_info.clone(),
            tech_stack: session.tech_stack.clone(),
            assessment: session.final_assessment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_unversioned_file() {
        let json = r#"{
            "timestamp": "2024-05-01T09:30:12.123456",
            "candidate_info": {
                "full_name": "Ada", "email": "", "phone": "", "experience": "3",
                "position": "", "location": "", "resume_text": "", "resume_file": null
            },
            "tech_stack": [],
            "assessment": null
        }"#;
        let snapshot: AssessmentSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.format_version, 0);
        assert_eq!(snapshot.candidate_info.full_name, "Ada");
        assert!(snapshot.assessment.is_none());
    }
}
