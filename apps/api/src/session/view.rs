//! Response shapes returned to the UI after every session action.

use serde::Serialize;
use uuid::Uuid;

use crate::models::notice::Notice;
use crate::models::session::{CandidateInfo, Message, Session};

/// Which controls the UI should currently enable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub can_chat: bool,
    pub can_upload: bool,
    pub can_generate_summary: bool,
    pub can_download_report: bool,
}

impl Controls {
    pub fn for_session(session: &Session) -> Self {
        Self {
            can_chat: !session.conversation_ended,
            can_upload: session.candidate_info.resume_file.is_none(),
            can_generate_summary: !session.messages.is_empty(),
            can_download_report: session.completed_assessment().is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
    pub candidate_info: CandidateInfo,
    pub tech_stack: Vec<String>,
    pub current_tech_index: Option<usize>,
    pub assessment_complete: bool,
    pub final_assessment: Option<String>,
    pub conversation_ended: bool,
    pub controls: Controls,
}

impl SessionView {
    pub fn new(session_id: Uuid, session: &Session) -> Self {
        Self {
            session_id,
            messages: session.messages.clone(),
            candidate_info: session.candidate_info.clone(),
            tech_stack: session.tech_stack.clone(),
            current_tech_index: session.current_tech_index,
            assessment_complete: session.assessment_complete,
            final_assessment: session.final_assessment.clone(),
            conversation_ended: session.conversation_ended,
            controls: Controls::for_session(session),
        }
    }
}

/// Updated state plus any notices raised while handling the action.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
    pub notices: Vec<Notice>,
}

impl SessionResponse {
    pub fn new(session_id: Uuid, session: &Session, notices: Vec<Notice>) -> Self {
        Self {
            session: SessionView::new(session_id, session),
            notices,
        }
    }
}
