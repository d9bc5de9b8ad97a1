use crate::entity::{question, quiz};
use crate::error::{Result, StoreError};
use crate::repository::option_repository::{self, OptionDraft, OptionRecord};
use crate::repository::question_repository::{self, QuestionRecord};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use codequiz_core::domain::{OptionKey, QuestionId, QuizId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRecord {
    pub id: QuizId,
    pub code: String,
    pub instruction: String,
    pub correct_code: String,
    pub reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub code: String,
    pub instruction: String,
    pub correct_code: String,
}

#[derive(Debug, Clone)]
pub struct UpdateQuiz {
    pub code: String,
    pub instruction: String,
    pub correct_code: String,
}

#[derive(Debug, Clone)]
pub struct NewQuestionTree {
    pub correct_option_key: OptionKey,
    pub correct_option_explanation: String,
    pub topic_id: i32,
    pub options: Vec<OptionDraft>,
}

#[derive(Debug, Clone)]
pub struct NewQuizTree {
    pub quiz: NewQuiz,
    pub questions: Vec<NewQuestionTree>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTree {
    pub question: QuestionRecord,
    pub options: Vec<OptionRecord>,
}

/// A quiz with its questions and their options, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizTree {
    pub quiz: QuizRecord,
    pub questions: Vec<QuestionTree>,
}

/// Reviewer corrections for a single-question quiz.
#[derive(Debug, Clone)]
pub struct QuizReview {
    pub quiz_id: QuizId,
    pub code: String,
    pub instruction: String,
    pub correct_option_key: OptionKey,
    pub topic_id: i32,
    pub options: Vec<OptionDraft>,
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, new_quiz: NewQuiz) -> Result<QuizRecord>;
    async fn find_by_id(&self, quiz_id: QuizId) -> Result<Option<QuizRecord>>;
    async fn get(&self, quiz_id: QuizId) -> Result<QuizRecord>;
    async fn list(&self) -> Result<Vec<QuizRecord>>;
    async fn update(&self, quiz_id: QuizId, update: UpdateQuiz) -> Result<QuizRecord>;
    /// Removes the quiz, its questions and their options in one transaction.
    async fn delete(&self, quiz_id: QuizId) -> Result<()>;
    async fn load_tree(&self, quiz_id: QuizId) -> Result<QuizTree>;
    async fn create_tree(&self, tree: NewQuizTree) -> Result<QuizTree>;
    async fn review(&self, review: QuizReview) -> Result<QuizTree>;
}

#[derive(Clone)]
pub struct SeaOrmQuizRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuizRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn map_model(model: quiz::Model) -> Result<QuizRecord> {
    let id = QuizId::from_str(&model.id).map_err(|e| {
        StoreError::Corrupt(format!("invalid quiz.id '{}' from database: {e}", model.id))
    })?;

    Ok(QuizRecord {
        id,
        code: model.code,
        instruction: model.instruction,
        correct_code: model.correct_code,
        reviewed_at: model.reviewed_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub(crate) async fn load_quiz<C: ConnectionTrait>(
    conn: &C,
    quiz_id: QuizId,
) -> Result<quiz::Model> {
    quiz::Entity::find_by_id(quiz_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found(QuizId::ENTITY, quiz_id))
}

async fn insert_quiz<C: ConnectionTrait>(conn: &C, new_quiz: NewQuiz) -> Result<QuizRecord> {
    let now = Utc::now().naive_utc();
    let active_model = quiz::ActiveModel {
        id: Set(QuizId::new().to_string()),
        code: Set(new_quiz.code),
        instruction: Set(new_quiz.instruction),
        correct_code: Set(new_quiz.correct_code),
        reviewed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await?;
    map_model(model)
}

fn ensure_correct_option(
    question_id: QuestionId,
    correct_option_key: &OptionKey,
    options: &[OptionDraft],
) -> Result<()> {
    if options
        .iter()
        .any(|draft| &draft.option_key == correct_option_key)
    {
        return Ok(());
    }

    Err(StoreError::CorrectOptionMissing {
        question_id,
        key: correct_option_key.to_string(),
    })
}

async fn load_tree_with<C: ConnectionTrait>(conn: &C, quiz_id: QuizId) -> Result<QuizTree> {
    let quiz = map_model(load_quiz(conn, quiz_id).await?)?;
    let questions = question_repository::list_for_quiz(conn, quiz_id).await?;

    let question_ids: Vec<String> = questions.iter().map(|q| q.id.to_string()).collect();
    let mut options_by_question: HashMap<_, Vec<OptionRecord>> = HashMap::new();
    for option in option_repository::list_for_questions(conn, &question_ids).await? {
        options_by_question
            .entry(option.question_id)
            .or_default()
            .push(option);
    }

    let questions = questions
        .into_iter()
        .map(|question| QuestionTree {
            options: options_by_question.remove(&question.id).unwrap_or_default(),
            question,
        })
        .collect();

    Ok(QuizTree { quiz, questions })
}

#[async_trait]
impl QuizRepository for SeaOrmQuizRepository {
    async fn create(&self, new_quiz: NewQuiz) -> Result<QuizRecord> {
        let record = insert_quiz(&self.db, new_quiz).await?;

        tracing::debug!(quiz_id = %record.id, "quiz created");
        Ok(record)
    }

    async fn find_by_id(&self, quiz_id: QuizId) -> Result<Option<QuizRecord>> {
        let model = quiz::Entity::find_by_id(quiz_id.to_string())
            .one(&self.db)
            .await?;

        model.map(map_model).transpose()
    }

    async fn get(&self, quiz_id: QuizId) -> Result<QuizRecord> {
        self.find_by_id(quiz_id)
            .await?
            .ok_or_else(|| StoreError::not_found(QuizId::ENTITY, quiz_id))
    }

    async fn list(&self) -> Result<Vec<QuizRecord>> {
        let models = quiz::Entity::find()
            .order_by_asc(quiz::Column::Id)
            .all(&self.db)
            .await
            .inspect_err(|error| tracing::error!(%error, "failed to load quizzes"))?;

        models.into_iter().map(map_model).collect()
    }

    async fn update(&self, quiz_id: QuizId, update: UpdateQuiz) -> Result<QuizRecord> {
        let model = load_quiz(&self.db, quiz_id).await?;

        let mut active_model: quiz::ActiveModel = model.into();
        active_model.code = Set(update.code);
        active_model.instruction = Set(update.instruction);
        active_model.correct_code = Set(update.correct_code);
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(&self.db).await?;
        map_model(updated)
    }

    async fn delete(&self, quiz_id: QuizId) -> Result<()> {
        let txn = self.db.begin().await?;

        load_quiz(&txn, quiz_id).await?;
        let (questions, options) = question_repository::delete_for_quiz(&txn, quiz_id).await?;
        quiz::Entity::delete_by_id(quiz_id.to_string())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(%quiz_id, questions, options, "quiz deleted");
        Ok(())
    }

    async fn load_tree(&self, quiz_id: QuizId) -> Result<QuizTree> {
        load_tree_with(&self.db, quiz_id).await
    }

    async fn create_tree(&self, tree: NewQuizTree) -> Result<QuizTree> {
        let txn = self.db.begin().await?;

        let quiz = insert_quiz(&txn, tree.quiz).await?;
        for new_question in tree.questions {
            let question = question_repository::insert_question(
                &txn,
                quiz.id,
                new_question.correct_option_key,
                new_question.correct_option_explanation,
                new_question.topic_id,
            )
            .await?;
            ensure_correct_option(
                question.id,
                &question.correct_option_key,
                &new_question.options,
            )?;
            option_repository::insert_drafts(&txn, question.id, new_question.options).await?;
        }

        let created = load_tree_with(&txn, quiz.id).await?;
        txn.commit().await?;

        tracing::info!(
            quiz_id = %created.quiz.id,
            questions = created.questions.len(),
            "quiz tree created"
        );
        Ok(created)
    }

    async fn review(&self, review: QuizReview) -> Result<QuizTree> {
        let txn = self.db.begin().await?;

        let quiz_model = load_quiz(&txn, review.quiz_id).await?;
        let mut questions = question::Entity::find()
            .filter(question::Column::QuizId.eq(review.quiz_id.to_string()))
            .all(&txn)
            .await?;
        if questions.len() > 1 {
            return Err(StoreError::AmbiguousQuestion(review.quiz_id));
        }
        let question_model = questions
            .pop()
            .ok_or_else(|| StoreError::not_found("question of quiz", review.quiz_id))?;
        let question_id = question_repository::map_model(question_model.clone())?.id;
        ensure_correct_option(question_id, &review.correct_option_key, &review.options)?;

        let mut quiz_active: quiz::ActiveModel = quiz_model.into();
        let now = Utc::now().naive_utc();
        quiz_active.code = Set(review.code);
        quiz_active.instruction = Set(review.instruction);
        quiz_active.reviewed_at = Set(Some(now));
        quiz_active.updated_at = Set(now);
        quiz_active.update(&txn).await?;

        let mut question_active: question::ActiveModel = question_model.into();
        question_active.correct_option_key = Set(review.correct_option_key.into_inner());
        question_active.topic_id = Set(review.topic_id);
        question_active.update(&txn).await?;

        option_repository::delete_for_questions(&txn, &[question_id.to_string()]).await?;
        option_repository::insert_drafts(&txn, question_id, review.options).await?;

        let reviewed = load_tree_with(&txn, review.quiz_id).await?;
        txn.commit().await?;

        tracing::info!(quiz_id = %review.quiz_id, %question_id, "quiz reviewed");
        Ok(reviewed)
    }
}
