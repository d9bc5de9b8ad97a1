mod error;
mod ids;
mod option_key;

pub use error::DomainError;
pub use ids::{OptionId, QuestionId, QuizId};
pub use option_key::OptionKey;
