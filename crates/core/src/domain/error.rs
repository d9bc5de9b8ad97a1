use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid option key '{0}': must be 1 to 10 characters")]
    InvalidOptionKey(String),

    #[error("invalid {entity} id '{value}'")]
    InvalidId { entity: &'static str, value: String },
}
