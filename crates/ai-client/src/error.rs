use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP request to the AI service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI service returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to serialize the analysis payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid header value for '{0}'")]
    InvalidHeader(&'static str),
}
