use std::sync::Arc;

use crate::application::ports::{ChatClient, ChatClientError, CompletionOptions};
use crate::domain::{ChatRole, ChatTurn};

/// History turns beyond this are dropped, oldest first.
pub const MAX_HISTORY_TURNS: usize = 10;

const CHAT_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 2000,
    temperature: 0.7,
};

const REFINE_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 4000,
    temperature: 0.3,
};

/// Stateless bridge between a transcript and the conversational provider.
/// Builds the message list, forwards it, returns the assistant text
/// verbatim.
pub struct RefinementService {
    client: Option<Arc<dyn ChatClient>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RefinementError {
    #[error("no chat provider configured")]
    ProviderUnavailable,
    #[error(transparent)]
    Client(#[from] ChatClientError),
}

impl RefinementService {
    pub fn new(client: Option<Arc<dyn ChatClient>>) -> Self {
        Self { client }
    }

    /// Free-form conversation about the transcript.
    pub async fn converse(
        &self,
        transcript: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, RefinementError> {
        let client = self.client()?;

        let mut turns = Vec::with_capacity(history.len().min(MAX_HISTORY_TURNS) + 2);
        turns.push(ChatTurn::new(ChatRole::System, chat_preamble(transcript)));

        let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
        turns.extend_from_slice(recent);

        turns.push(ChatTurn::new(ChatRole::User, message));

        let reply = client.complete(&turns, CHAT_OPTIONS).await?;
        Ok(reply)
    }

    /// One-shot rewrite of the transcript under explicit instructions.
    pub async fn refine(
        &self,
        transcript: &str,
        instruction: &str,
    ) -> Result<String, RefinementError> {
        let client = self.client()?;

        let turns = vec![
            ChatTurn::new(ChatRole::System, refine_preamble(transcript, instruction)),
            ChatTurn::new(
                ChatRole::User,
                "Please refine the transcription according to my instructions.",
            ),
        ];

        let refined = client.complete(&turns, REFINE_OPTIONS).await?;
        Ok(refined)
    }

    fn client(&self) -> Result<&Arc<dyn ChatClient>, RefinementError> {
        self.client
            .as_ref()
            .ok_or(RefinementError::ProviderUnavailable)
    }
}

fn chat_preamble(transcript: &str) -> String {
    let transcript = if transcript.trim().is_empty() {
        "No transcription provided yet"
    } else {
        transcript
    };

    format!(
        "You are an assistant specialized in refining and improving audio \
transcriptions. You help users fix recognition errors, grammar and \
formatting, add punctuation and structure, translate when asked, answer \
questions about the transcription, and make the text more readable and \
professional. Follow the user's instructions precisely.\n\n\
Current transcription:\n{}",
        transcript
    )
}

fn refine_preamble(transcript: &str, instruction: &str) -> String {
    format!(
        "You are a transcription refinement expert. Refine the following \
transcription according to the user's instructions. Return ONLY the \
refined transcription text, without additional commentary unless \
specifically requested.\n\n\
Original transcription:\n{}\n\n\
User instructions:\n{}",
        transcript, instruction
    )
}
