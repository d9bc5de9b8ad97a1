use crate::entity::question;
use crate::error::{Result, StoreError};
use crate::repository::{option_repository, quiz_repository};
use async_trait::async_trait;
use codequiz_core::domain::{OptionId, OptionKey, QuestionId, QuizId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub quiz_id: QuizId,
    pub correct_option_key: OptionKey,
    pub correct_option_explanation: String,
    pub topic_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub quiz_id: QuizId,
    pub correct_option_key: OptionKey,
    pub correct_option_explanation: String,
    pub topic_id: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateQuestion {
    pub correct_option_key: OptionKey,
    pub correct_option_explanation: String,
    pub topic_id: i32,
}

/// Whether a question's correct key points at one of its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectOptionStatus {
    Matched(OptionId),
    Missing,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord>;
    async fn find_by_id(&self, question_id: QuestionId) -> Result<Option<QuestionRecord>>;
    async fn get(&self, question_id: QuestionId) -> Result<QuestionRecord>;
    async fn list_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<QuestionRecord>>;
    async fn update(
        &self,
        question_id: QuestionId,
        update: UpdateQuestion,
    ) -> Result<QuestionRecord>;
    /// Removes the question together with its options.
    async fn delete(&self, question_id: QuestionId) -> Result<()>;
    async fn check_correct_option(&self, question_id: QuestionId) -> Result<CorrectOptionStatus>;
}

#[derive(Clone)]
pub struct SeaOrmQuestionRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn map_model(model: question::Model) -> Result<QuestionRecord> {
    let id = QuestionId::from_str(&model.id).map_err(|e| {
        StoreError::Corrupt(format!("invalid question.id '{}' from database: {e}", model.id))
    })?;
    let quiz_id = QuizId::from_str(&model.quiz_id).map_err(|e| {
        StoreError::Corrupt(format!(
            "invalid question.quiz_id '{}' from database: {e}",
            model.quiz_id
        ))
    })?;
    let correct_option_key = OptionKey::new(model.correct_option_key).map_err(|e| {
        StoreError::Corrupt(format!("invalid question.correct_option_key from database: {e}"))
    })?;

    Ok(QuestionRecord {
        id,
        quiz_id,
        correct_option_key,
        correct_option_explanation: model.correct_option_explanation,
        topic_id: model.topic_id,
    })
}

pub(crate) async fn load_question<C: ConnectionTrait>(
    conn: &C,
    question_id: QuestionId,
) -> Result<question::Model> {
    question::Entity::find_by_id(question_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found(QuestionId::ENTITY, question_id))
}

pub(crate) async fn insert_question<C: ConnectionTrait>(
    conn: &C,
    quiz_id: QuizId,
    correct_option_key: OptionKey,
    correct_option_explanation: String,
    topic_id: i32,
) -> Result<QuestionRecord> {
    let active_model = question::ActiveModel {
        id: Set(QuestionId::new().to_string()),
        quiz_id: Set(quiz_id.to_string()),
        correct_option_key: Set(correct_option_key.into_inner()),
        correct_option_explanation: Set(correct_option_explanation),
        topic_id: Set(topic_id),
    };

    let model = active_model.insert(conn).await?;
    map_model(model)
}

pub(crate) async fn list_for_quiz<C: ConnectionTrait>(
    conn: &C,
    quiz_id: QuizId,
) -> Result<Vec<QuestionRecord>> {
    let models = question::Entity::find()
        .filter(question::Column::QuizId.eq(quiz_id.to_string()))
        .order_by_asc(question::Column::Id)
        .all(conn)
        .await
        .inspect_err(|error| tracing::error!(%error, %quiz_id, "failed to load questions"))?;

    models.into_iter().map(map_model).collect()
}

/// Deletes every question of a quiz, options first. Returns `(questions, options)` removed.
pub(crate) async fn delete_for_quiz<C: ConnectionTrait>(
    conn: &C,
    quiz_id: QuizId,
) -> Result<(u64, u64)> {
    let question_ids: Vec<String> = question::Entity::find()
        .filter(question::Column::QuizId.eq(quiz_id.to_string()))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| model.id)
        .collect();

    if question_ids.is_empty() {
        return Ok((0, 0));
    }

    let options = option_repository::delete_for_questions(conn, &question_ids).await?;
    let questions = question::Entity::delete_many()
        .filter(question::Column::Id.is_in(question_ids))
        .exec(conn)
        .await?
        .rows_affected;

    Ok((questions, options))
}

#[async_trait]
impl QuestionRepository for SeaOrmQuestionRepository {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord> {
        let txn = self.db.begin().await?;

        quiz_repository::load_quiz(&txn, new_question.quiz_id).await?;
        let record = insert_question(
            &txn,
            new_question.quiz_id,
            new_question.correct_option_key,
            new_question.correct_option_explanation,
            new_question.topic_id,
        )
        .await?;

        txn.commit().await?;

        tracing::debug!(question_id = %record.id, quiz_id = %record.quiz_id, "question created");
        Ok(record)
    }

    async fn find_by_id(&self, question_id: QuestionId) -> Result<Option<QuestionRecord>> {
        let model = question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?;

        model.map(map_model).transpose()
    }

    async fn get(&self, question_id: QuestionId) -> Result<QuestionRecord> {
        self.find_by_id(question_id)
            .await?
            .ok_or_else(|| StoreError::not_found(QuestionId::ENTITY, question_id))
    }

    async fn list_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<QuestionRecord>> {
        quiz_repository::load_quiz(&self.db, quiz_id).await?;
        list_for_quiz(&self.db, quiz_id).await
    }

    async fn update(
        &self,
        question_id: QuestionId,
        update: UpdateQuestion,
    ) -> Result<QuestionRecord> {
        let model = load_question(&self.db, question_id).await?;

        let mut active_model: question::ActiveModel = model.into();
        active_model.correct_option_key = Set(update.correct_option_key.into_inner());
        active_model.correct_option_explanation = Set(update.correct_option_explanation);
        active_model.topic_id = Set(update.topic_id);

        let updated = active_model.update(&self.db).await?;
        map_model(updated)
    }

    async fn delete(&self, question_id: QuestionId) -> Result<()> {
        let txn = self.db.begin().await?;

        load_question(&txn, question_id).await?;
        let options =
            option_repository::delete_for_questions(&txn, &[question_id.to_string()]).await?;
        question::Entity::delete_by_id(question_id.to_string())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(%question_id, options, "question deleted");
        Ok(())
    }

    async fn check_correct_option(&self, question_id: QuestionId) -> Result<CorrectOptionStatus> {
        let question = map_model(load_question(&self.db, question_id).await?)?;
        let options =
            option_repository::list_for_questions(&self.db, &[question_id.to_string()]).await?;

        let status = options
            .iter()
            .find(|option| option.option_key == question.correct_option_key)
            .map_or(CorrectOptionStatus::Missing, |option| {
                CorrectOptionStatus::Matched(option.id)
            });
        Ok(status)
    }
}
