//! Shared handle over the three repositories.

use std::sync::Arc;

use codequiz_core::domain::{OptionId, OptionKey, QuestionId, QuizId};
use sea_orm::DatabaseConnection;

use crate::error::Result;
use crate::repository::{
    NewOption, NewQuestion, NewQuiz, OptionRecord, OptionRepository, QuestionRecord,
    QuestionRepository, QuizRecord, QuizRepository, SeaOrmOptionRepository,
    SeaOrmQuestionRepository, SeaOrmQuizRepository,
};

/// Quiz schema store. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct QuizStore {
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub options: Arc<dyn OptionRepository>,
}

impl QuizStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            quizzes: Arc::new(SeaOrmQuizRepository::new(db.clone())),
            questions: Arc::new(SeaOrmQuestionRepository::new(db.clone())),
            options: Arc::new(SeaOrmOptionRepository::new(db)),
        }
    }

    pub async fn create_quiz(
        &self,
        code: impl Into<String>,
        instruction: impl Into<String>,
        correct_code: impl Into<String>,
    ) -> Result<QuizRecord> {
        self.quizzes
            .create(NewQuiz {
                code: code.into(),
                instruction: instruction.into(),
                correct_code: correct_code.into(),
            })
            .await
    }

    /// The correct key is not checked against options here; they do not exist yet.
    pub async fn create_question(
        &self,
        quiz_id: QuizId,
        correct_option_key: &str,
        correct_option_explanation: impl Into<String>,
        topic_id: i32,
    ) -> Result<QuestionRecord> {
        self.questions
            .create(NewQuestion {
                quiz_id,
                correct_option_key: OptionKey::new(correct_option_key)?,
                correct_option_explanation: correct_option_explanation.into(),
                topic_id,
            })
            .await
    }

    pub async fn create_option(
        &self,
        question_id: QuestionId,
        option_key: &str,
        option_content: impl Into<String>,
    ) -> Result<OptionRecord> {
        self.options
            .create(NewOption {
                question_id,
                option_key: OptionKey::new(option_key)?,
                option_content: option_content.into(),
            })
            .await
    }

    pub async fn get_quiz(&self, quiz_id: QuizId) -> Result<QuizRecord> {
        self.quizzes.get(quiz_id).await
    }

    pub async fn get_question(&self, question_id: QuestionId) -> Result<QuestionRecord> {
        self.questions.get(question_id).await
    }

    pub async fn get_option(&self, option_id: OptionId) -> Result<OptionRecord> {
        self.options.get(option_id).await
    }

    pub async fn delete_quiz(&self, quiz_id: QuizId) -> Result<()> {
        self.quizzes.delete(quiz_id).await
    }

    pub async fn delete_question(&self, question_id: QuestionId) -> Result<()> {
        self.questions.delete(question_id).await
    }
}
