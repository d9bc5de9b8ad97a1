use codequiz_core::domain::{DomainError, QuestionId, QuizId};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("option key '{key}' already exists for question {question_id}")]
    DuplicateKey { question_id: QuestionId, key: String },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("quiz {0} has more than one question")]
    AmbiguousQuestion(QuizId),

    #[error("correct option key '{key}' matches no option of question {question_id}")]
    CorrectOptionMissing { question_id: QuestionId, key: String },

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

/// Maps a failed option insert, turning a unique index hit into `DuplicateKey`.
pub(crate) fn classify_option_insert(
    err: DbErr,
    question_id: QuestionId,
    key: &str,
) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateKey {
            question_id,
            key: key.to_string(),
        },
        _ => StoreError::Database(err),
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
