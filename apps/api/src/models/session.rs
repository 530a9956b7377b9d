use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// First assistant turn of every session.
pub const WELCOME_MESSAGE: &str = "Welcome to TalentScout Pro! May I have your full name to begin?";

/// Stored in `resume_text` while an image resume waits for the vision call.
pub const IMAGE_RESUME_MARKER: &str = "IMAGE_RESUME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Uploaded resume. The bytes live only as long as the session; snapshots
/// keep the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    #[serde(skip)]
    pub data: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: String, mime_type: String, data: Bytes) -> Self {
        Self {
            file_name,
            mime_type,
            size_bytes: data.len(),
            data,
        }
    }
}

/// Text fields of `CandidateInfo` that the update operation may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    FullName,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    ResumeText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub position: String,
    pub location: String,
    pub resume_text: String,
    pub resume_file: Option<ResumeFile>,
}

impl CandidateInfo {
    pub fn update(&mut self, field: CandidateField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CandidateField::FullName => self.full_name = value,
            CandidateField::Email => self.email = value,
            CandidateField::Phone => self.phone = value,
            CandidateField::Experience => self.experience = value,
            CandidateField::Position => self.position = value,
            CandidateField::Location => self.location = value,
            CandidateField::ResumeText => self.resume_text = value,
        }
    }

    /// True while an uploaded image still needs the deferred text extraction.
    pub fn has_pending_image(&self) -> bool {
        self.resume_text == IMAGE_RESUME_MARKER && self.resume_file.is_some()
    }
}

/// Per-session conversation context. Owned by the session store and passed
/// by `&mut` into every driver, summary and upload call.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub messages: Vec<Message>,
    pub candidate_info: CandidateInfo,
    pub tech_stack: Vec<String>,
    pub current_tech_index: Option<usize>,
    pub assessment_complete: bool,
    pub final_assessment: Option<String>,
    pub conversation_ended: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            messages: vec![Message::assistant(WELCOME_MESSAGE)],
            candidate_info: CandidateInfo::default(),
            tech_stack: Vec::new(),
            current_tech_index: None,
            assessment_complete: false,
            final_assessment: None,
            conversation_ended: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipes the session back to defaults, keeping only the last assessment.
    pub fn reset(&mut self) {
        let kept = self.final_assessment.take();
        *self = Session::new();
        self.final_assessment = kept;
    }

    /// The assessment of the current screening. An assessment carried over
    /// by `reset` belongs to the previous candidate and is not returned.
    pub fn completed_assessment(&self) -> Option<&str> {
        if self.assessment_complete {
            self.final_assessment.as_deref()
        } else {
            None
        }
    }

    /// Replaces the declared skills; a non-empty stack starts at its first entry.
    pub fn set_tech_stack(&mut self, skills: Vec<String>) {
        self.current_tech_index = if skills.is_empty() { None } else { Some(0) };
        self.tech_stack = skills;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert_eq!(session.messages, vec![Message::assistant(WELCOME_MESSAGE)]);
        assert_eq!(session.candidate_info, CandidateInfo::default());
        assert!(session.tech_stack.is_empty());
        assert_eq!(session.current_tech_index, None);
        assert!(!session.assessment_complete);
        assert!(session.final_assessment.is_none());
        assert!(!session.conversation_ended);
    }

    #[test]
    fn test_reset_keeps_only_final_assessment() {
        let mut session = Session::new();
        session.messages.push(Message::user("Ada Lovelace"));
        session
            .candidate_info
            .update(CandidateField::FullName, "Ada Lovelace");
        session.set_tech_stack(vec!["Rust".into()]);
        session.assessment_complete = true;
        session.conversation_ended = true;
        session.final_assessment = Some("Strong candidate".into());

        session.reset();

        let mut expected = Session::new();
        expected.final_assessment = Some("Strong candidate".into());
        assert_eq!(session, expected);
        assert_eq!(session.completed_assessment(), None);
    }

    #[test]
    fn test_completed_assessment_requires_completion() {
        let mut session = Session::new();
        session.final_assessment = Some("Strong candidate".into());
        assert_eq!(session.completed_assessment(), None);

        session.assessment_complete = true;
        assert_eq!(session.completed_assessment(), Some("Strong candidate"));
    }

    #[test]
    fn test_reset_without_assessment_returns_defaults() {
        let mut session = Session::new();
        session.messages.push(Message::user("hello"));
        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_update_sets_single_field() {
        let mut info = CandidateInfo::default();
        info.update(CandidateField::Email, "ada@example.com");
        assert_eq!(info.email, "ada@example.com");
        assert_eq!(
            info,
            CandidateInfo {
                email: "ada@example.com".into(),
                ..CandidateInfo::default()
            }
        );
    }

    #[test]
    fn test_pending_image_requires_file() {
        let mut info = CandidateInfo {
            resume_text: IMAGE_RESUME_MARKER.into(),
            ..CandidateInfo::default()
        };
        assert!(!info.has_pending_image());
        info.resume_file = Some(ResumeFile::new(
            "cv.png".into(),
            "image/png".into(),
            Bytes::from_static(b"img"),
        ));
        assert!(info.has_pending_image());
    }

    #[test]
    fn test_resume_file_bytes_not_serialized() {
        let file = ResumeFile::new(
            "cv.pdf".into(),
            "application/pdf".into(),
            Bytes::from_static(b"%PDF-1.4"),
        );
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["size_bytes"], 8);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
