use async_trait::async_trait;

use crate::domain::ChatTurn;

/// Tuning knobs forwarded with every completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub max_tokens: usize,
    pub temperature: f32,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        turns: &[ChatTurn],
        options: CompletionOptions,
    ) -> Result<String, ChatClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
