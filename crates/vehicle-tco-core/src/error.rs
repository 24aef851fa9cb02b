use thiserror::Error;

#[derive(Debug, Error)]
pub enum TcoError {
    #[error("Unsupported configuration: category {category} with usage {usage}")]
    Configuration { category: String, usage: String },

    #[error("Invalid loan term: {term_months} months (must be > 0)")]
    InvalidTerm { term_months: u32 },

    #[error("Unsupported contract duration: {months} months (allowed: 24, 36, 48, 60)")]
    UnsupportedDuration { months: u32 },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TcoError {
    fn from(e: serde_json::Error) -> Self {
        TcoError::Serialization(e.to_string())
    }
}
