#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),
}
