// Error types for the assistant

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Errors that can surface from the agent loop.
///
/// Tool failures are NOT here: a tool that cannot answer returns a
/// [`crate::tools::ToolOutcome::Failed`] value and the conversation
/// continues. These variants are for the loop itself.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// LLM endpoint error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Loop terminated due to max iterations
    #[error("Max iterations ({0}) reached")]
    MaxIterationsReached(usize),
}

impl AssistantError {
    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        AssistantError::Llm(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AssistantError::Configuration(msg.into())
    }
}
