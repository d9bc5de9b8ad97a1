//! Serialized quiz documents exchanged with the store: import files and reviews.

use serde::{Deserialize, Serialize};

/// One quiz with everything it owns, as written in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDocument {
    pub code: String,
    pub instruction: String,
    pub correct_code: String,
    #[serde(default)]
    pub questions: Vec<QuestionDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub correct_option_key: String,
    #[serde(default)]
    pub correct_option_explanation: String,
    pub topic_id: i32,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDocument {
    pub key: String,
    pub content: String,
}

/// Reviewer corrections for a quiz that carries a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReviewRequest {
    pub quiz_id: String,
    pub code: String,
    pub instruction: String,
    pub correct_option_key: String,
    pub topic_id: i32,
    pub options: Vec<OptionDocument>,
}
