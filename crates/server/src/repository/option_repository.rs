use crate::entity::option;
use crate::error::{Result, StoreError, classify_option_insert};
use crate::repository::question_repository;
use async_trait::async_trait;
use codequiz_core::domain::{OptionId, OptionKey, QuestionId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecord {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub option_key: OptionKey,
    pub option_content: String,
}

#[derive(Debug, Clone)]
pub struct NewOption {
    pub question_id: QuestionId,
    pub option_key: OptionKey,
    pub option_content: String,
}

/// An answer choice that is not yet attached to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDraft {
    pub option_key: OptionKey,
    pub option_content: String,
}

impl OptionDraft {
    pub fn new(option_key: OptionKey, option_content: impl Into<String>) -> Self {
        Self {
            option_key,
            option_content: option_content.into(),
        }
    }
}

#[async_trait]
pub trait OptionRepository: Send + Sync {
    async fn create(&self, new_option: NewOption) -> Result<OptionRecord>;
    async fn find_by_id(&self, option_id: OptionId) -> Result<Option<OptionRecord>>;
    async fn get(&self, option_id: OptionId) -> Result<OptionRecord>;
    async fn list_by_question(&self, question_id: QuestionId) -> Result<Vec<OptionRecord>>;
    /// Swaps the whole option set of a question for `drafts`.
    async fn replace_all(
        &self,
        question_id: QuestionId,
        drafts: Vec<OptionDraft>,
    ) -> Result<Vec<OptionRecord>>;
    async fn delete(&self, option_id: OptionId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmOptionRepository {
    db: DatabaseConnection,
}

impl SeaOrmOptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn map_model(model: option::Model) -> Result<OptionRecord> {
    let id = OptionId::from_str(&model.id).map_err(|e| {
        StoreError::Corrupt(format!("invalid option.id '{}' from database: {e}", model.id))
    })?;
    let question_id = QuestionId::from_str(&model.question_id).map_err(|e| {
        StoreError::Corrupt(format!(
            "invalid option.question_id '{}' from database: {e}",
            model.question_id
        ))
    })?;
    let option_key = OptionKey::new(model.option_key).map_err(|e| {
        StoreError::Corrupt(format!("invalid option.option_key from database: {e}"))
    })?;

    Ok(OptionRecord {
        id,
        question_id,
        option_key,
        option_content: model.option_content,
    })
}

/// Inserts one option, rejecting a key the question already uses.
pub(crate) async fn insert_option<C: ConnectionTrait>(
    conn: &C,
    question_id: QuestionId,
    draft: OptionDraft,
) -> Result<OptionRecord> {
    let taken = option::Entity::find()
        .filter(option::Column::QuestionId.eq(question_id.to_string()))
        .filter(option::Column::OptionKey.eq(draft.option_key.as_str()))
        .count(conn)
        .await?;
    if taken > 0 {
        return Err(StoreError::DuplicateKey {
            question_id,
            key: draft.option_key.into_inner(),
        });
    }

    let key = draft.option_key.into_inner();
    let active_model = option::ActiveModel {
        id: Set(OptionId::new().to_string()),
        question_id: Set(question_id.to_string()),
        option_key: Set(key.clone()),
        option_content: Set(draft.option_content),
    };

    let model = active_model
        .insert(conn)
        .await
        .map_err(|err| classify_option_insert(err, question_id, &key))?;
    map_model(model)
}

/// Inserts a batch of options for one question. Keys must be unique within the batch.
pub(crate) async fn insert_drafts<C: ConnectionTrait>(
    conn: &C,
    question_id: QuestionId,
    drafts: Vec<OptionDraft>,
) -> Result<Vec<OptionRecord>> {
    let mut seen = HashSet::new();
    for draft in &drafts {
        if !seen.insert(draft.option_key.as_str()) {
            return Err(StoreError::DuplicateKey {
                question_id,
                key: draft.option_key.to_string(),
            });
        }
    }

    let mut records = Vec::with_capacity(drafts.len());
    for draft in drafts {
        records.push(insert_option(conn, question_id, draft).await?);
    }
    Ok(records)
}

pub(crate) async fn list_for_questions<C: ConnectionTrait>(
    conn: &C,
    question_ids: &[String],
) -> Result<Vec<OptionRecord>> {
    if question_ids.is_empty() {
        return Ok(Vec::new());
    }

    let models = option::Entity::find()
        .filter(option::Column::QuestionId.is_in(question_ids.iter().cloned()))
        .order_by_asc(option::Column::Id)
        .all(conn)
        .await
        .inspect_err(|error| tracing::error!(%error, "failed to load options"))?;

    models.into_iter().map(map_model).collect()
}

pub(crate) async fn delete_for_questions<C: ConnectionTrait>(
    conn: &C,
    question_ids: &[String],
) -> Result<u64> {
    if question_ids.is_empty() {
        return Ok(0);
    }

    let result = option::Entity::delete_many()
        .filter(option::Column::QuestionId.is_in(question_ids.iter().cloned()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[async_trait]
impl OptionRepository for SeaOrmOptionRepository {
    async fn create(&self, new_option: NewOption) -> Result<OptionRecord> {
        let txn = self.db.begin().await?;

        question_repository::load_question(&txn, new_option.question_id).await?;
        let record = insert_option(
            &txn,
            new_option.question_id,
            OptionDraft::new(new_option.option_key, new_option.option_content),
        )
        .await?;

        txn.commit().await?;

        tracing::debug!(
            option_id = %record.id,
            question_id = %record.question_id,
            option_key = %record.option_key,
            "option created"
        );
        Ok(record)
    }

    async fn find_by_id(&self, option_id: OptionId) -> Result<Option<OptionRecord>> {
        let model = option::Entity::find_by_id(option_id.to_string())
            .one(&self.db)
            .await?;

        model.map(map_model).transpose()
    }

    async fn get(&self, option_id: OptionId) -> Result<OptionRecord> {
        self.find_by_id(option_id)
            .await?
            .ok_or_else(|| StoreError::not_found(OptionId::ENTITY, option_id))
    }

    async fn list_by_question(&self, question_id: QuestionId) -> Result<Vec<OptionRecord>> {
        question_repository::load_question(&self.db, question_id).await?;
        list_for_questions(&self.db, &[question_id.to_string()]).await
    }

    async fn replace_all(
        &self,
        question_id: QuestionId,
        drafts: Vec<OptionDraft>,
    ) -> Result<Vec<OptionRecord>> {
        let txn = self.db.begin().await?;

        question_repository::load_question(&txn, question_id).await?;
        let removed = delete_for_questions(&txn, &[question_id.to_string()]).await?;
        let records = insert_drafts(&txn, question_id, drafts).await?;

        txn.commit().await?;

        tracing::info!(
            %question_id,
            removed,
            inserted = records.len(),
            "options replaced"
        );
        Ok(records)
    }

    async fn delete(&self, option_id: OptionId) -> Result<()> {
        let result = option::Entity::delete_by_id(option_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(OptionId::ENTITY, option_id));
        }
        Ok(())
    }
}
