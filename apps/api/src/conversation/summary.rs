//! Summary Generator: one evaluation call over the full transcript.
//! No caching: every invocation regenerates.

use tracing::{info, warn};

use crate::conversation::prompts::SUMMARY_PROMPT_TEMPLATE;
use crate::llm_client::{GenerationRequest, GenerationService, Turn};
use crate::models::session::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Generated(String),
    /// Carries the user-facing "Could not generate summary" text.
    Failed(String),
    NothingToSummarize,
}

/// `role: content` lines in chronological order.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn generate_summary(
    messages: &[Message],
    llm: &dyn GenerationService,
) -> SummaryOutcome {
    if messages.is_empty() {
        return SummaryOutcome::NothingToSummarize;
    }

    let prompt = SUMMARY_PROMPT_TEMPLATE.replace("{conversation}", &render_transcript(messages));

    match llm
        .generate(GenerationRequest::text(vec![Turn::user(prompt)]))
        .await
    {
        Ok(text) => {
            info!("Generated assessment summary ({} chars)", text.len());
            SummaryOutcome::Generated(text)
        }
        Err(e) => {
            warn!("Summary generation failed: {e}");
            SummaryOutcome::Failed(format!("Could not generate summary: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;

    #[test]
    fn test_render_transcript() {
        let messages = vec![
            Message::assistant("May I have your full name?"),
            Message::user("Ada"),
        ];
        assert_eq!(
            render_transcript(&messages),
            "assistant: May I have your full name?\nuser: Ada"
        );
    }

    #[tokio::test]
    async fn test_summary_embeds_transcript() {
        let llm = ScriptedLlm::new().reply("Rust: 8/10");
        let messages = vec![Message::assistant("Explain ownership."), Message::user("Moves.")];

        let outcome = generate_summary(&messages, &llm).await;

        assert_eq!(outcome, SummaryOutcome::Generated("Rust: 8/10".into()));
        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].turns.len(), 1);
        let prompt = &requests[0].turns[0].text;
        assert!(prompt.contains("assistant: Explain ownership.\nuser: Moves."));
        assert!(prompt.contains("proficiency score out of 10"));
        assert!(!prompt.contains("{conversation}"));
    }

    #[tokio::test]
    async fn test_summary_regenerates_each_call() {
        let llm = ScriptedLlm::new().reply("first").reply("second");
        let messages = vec![Message::user("hi")];

        assert_eq!(
            generate_summary(&messages, &llm).await,
            SummaryOutcome::Generated("first".into())
        );
        assert_eq!(
            generate_summary(&messages, &llm).await,
            SummaryOutcome::Generated("second".into())
        );
        assert_eq!(llm.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_failure_message() {
        let llm = ScriptedLlm::new().fail(500, "internal");
        let outcome = generate_summary(&[Message::user("hi")], &llm).await;
        match outcome {
            SummaryOutcome::Failed(msg) => {
                assert!(msg.starts_with("Could not generate summary:"));
                assert!(msg.contains("internal"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_history_skips_call() {
        let llm = ScriptedLlm::new();
        assert_eq!(
            generate_summary(&[], &llm).await,
            SummaryOutcome::NothingToSummarize
        );
        assert!(llm.requests().is_empty());
    }
}
