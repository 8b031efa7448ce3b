use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),
}
