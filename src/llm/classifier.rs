use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single classification request
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Request(String),

    #[error("classifier responded with error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse classifier response: {0}")]
    Parse(String),

    #[error("classifier gave neither yes nor no: {0:?}")]
    UnexpectedAnswer(String),
}

/// Decides whether a question is structurally a yes/no question
///
/// Implementations are called concurrently and must not hold per-call state.
#[async_trait]
pub trait QuestionClassifier: Send + Sync {
    async fn classify_yes_no(&self, question: &str) -> Result<bool, ClassifierError>;
}
