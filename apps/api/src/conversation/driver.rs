//! Conversation Driver: runs one chat turn against the generation service.
//!
//! Flow: deferred image extraction (if pending) OR
//!       [system prompt, last HISTORY_WINDOW messages, utterance] → model,
//!       then append the user and assistant turns to the session.
//!
//! External failures never escape a turn: they become the apology reply.

use tracing::{debug, info, warn};

use crate::conversation::prompts::{
    IMAGE_EXTRACTION_PROMPT, IMAGE_TRANSITION_MESSAGE, SCREENING_SYSTEM_PROMPT,
};
use crate::conversation::skills::{parse_tech_stack, requests_skill_list};
use crate::llm_client::{GenerationRequest, GenerationService, ImagePayload, Turn};
use crate::models::notice::Notice;
use crate::models::session::{Message, Role, Session};

/// Number of prior messages forwarded with each turn.
pub const HISTORY_WINDOW: usize = 40;

/// Runs one turn: computes the reply, then appends the user utterance and the
/// assistant reply to the history. Returns notices for the caller to surface.
pub async fn run_turn(
    session: &mut Session,
    utterance: &str,
    llm: &dyn GenerationService,
) -> Vec<Notice> {
    let mut notices = Vec::new();

    let skills_requested = session
        .messages
        .last()
        .is_some_and(|m| m.role == Role::Assistant && requests_skill_list(&m.content));

    let reply = if session.candidate_info.has_pending_image() {
        process_pending_image(session, llm, &mut notices).await;
        IMAGE_TRANSITION_MESSAGE.to_string()
    } else {
        generate_reply(&session.messages, utterance, llm).await
    };

    session.messages.push(Message::user(utterance));

    if skills_requested && session.tech_stack.is_empty() {
        let skills = parse_tech_stack(utterance);
        if !skills.is_empty() {
            info!("Captured {} declared skills", skills.len());
            session.set_tech_stack(skills);
        }
    }

    session.messages.push(Message::assistant(reply));
    notices
}

/// Forwards the windowed transcript to the model and returns its text, or
/// the apology message when the call fails.
pub async fn generate_reply(
    history: &[Message],
    utterance: &str,
    llm: &dyn GenerationService,
) -> String {
    let turns = build_turns(history, utterance);
    debug!("Sending {} turns to the generation service", turns.len());

    match llm.generate(GenerationRequest::text(turns)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Conversation turn failed: {e}");
            apology(&e.to_string())
        }
    }
}

pub fn apology(detail: &str) -> String {
    format!("Sorry, I encountered an error: {detail}. Please try again.")
}

/// `[system instruction, last HISTORY_WINDOW history messages, utterance]`.
/// The system instruction is sent as a user turn.
pub fn build_turns(history: &[Message], utterance: &str) -> Vec<Turn> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut turns = Vec::with_capacity(history.len() - start + 2);
    turns.push(Turn::user(SCREENING_SYSTEM_PROMPT));
    turns.extend(history[start..].iter().map(|m| match m.role {
        Role::User => Turn::user(m.content.as_str()),
        Role::Assistant => Turn::model(m.content.as_str()),
    }));
    turns.push(Turn::user(utterance));
    turns
}

/// Sends the uploaded image to the model and stores the returned text as
/// `resume_text`. On failure `resume_text` becomes empty and a notice is added.
async fn process_pending_image(
    session: &mut Session,
    llm: &dyn GenerationService,
    notices: &mut Vec<Notice>,
) {
    let Some(file) = session.candidate_info.resume_file.as_ref() else {
        return;
    };

    let request = GenerationRequest {
        turns: vec![Turn::user(IMAGE_EXTRACTION_PROMPT)],
        image: Some(ImagePayload {
            mime_type: file.mime_type.clone(),
            data: file.data.clone(),
        }),
    };

    session.candidate_info.resume_text = match llm.generate(request).await {
        Ok(text) => {
            info!("Extracted {} chars from image resume", text.len());
            text
        }
        Err(e) => {
            warn!("Image resume extraction failed: {e}");
            notices.push(Notice::error(format!("Failed to process image: {e}")));
            String::new()
        }
    };
}
