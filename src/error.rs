use thiserror::Error;

/// Failures surfaced to the user as messages in the conversation or as a
/// blocking configuration screen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// Missing or unusable provider credential. Not recoverable without
    /// reconfiguring.
    #[error("{0}")]
    Configuration(String),

    /// The document could not be turned into text.
    #[error("{0}")]
    Extraction(String),

    /// The remote answer call failed.
    #[error("{0}")]
    Answer(String),
}

impl ChatError {
    pub fn missing_api_key() -> Self {
        ChatError::Configuration(
            "The Gemini API key is not configured. Set the API_KEY (or GEMINI_API_KEY) \
             environment variable, or add it to the config file."
                .to_string(),
        )
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Configuration(_) => "configuration",
            ChatError::Extraction(_) => "extraction",
            ChatError::Answer(_) => "answer",
        }
    }
}
