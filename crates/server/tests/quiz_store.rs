mod common;

use codequiz_core::domain::{OptionId, OptionKey, QuestionId, QuizId};
use codequiz_server::StoreError;
use codequiz_server::entity::{option, question, quiz};
use codequiz_server::repository::{CorrectOptionStatus, OptionDraft, UpdateQuestion, UpdateQuiz};
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::common::setup_store;

fn key(value: &str) -> OptionKey {
    OptionKey::new(value).expect("test key should be valid")
}

#[tokio::test]
async fn test_quiz_round_trip() {
    let ctx = setup_store().await;

    let created = ctx
        .store
        .create_quiz("print(1)", "What prints?", "1")
        .await
        .expect("create quiz");
    let loaded = ctx.store.get_quiz(created.id).await.expect("get quiz");

    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.code, "print(1)");
    assert_eq!(loaded.instruction, "What prints?");
    assert_eq!(loaded.correct_code, "1");
    assert!(loaded.reviewed_at.is_none());
}

#[tokio::test]
async fn test_get_unknown_ids_is_not_found() {
    let ctx = setup_store().await;

    assert!(ctx.store.get_quiz(QuizId::new()).await.unwrap_err().is_not_found());
    assert!(
        ctx.store
            .get_question(QuestionId::new())
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(ctx.store.get_option(OptionId::new()).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_question_for_unknown_quiz_is_not_found() {
    let ctx = setup_store().await;

    let err = ctx
        .store
        .create_question(QuizId::new(), "A", "explanation", 1)
        .await
        .expect_err("quiz does not exist");

    assert!(matches!(err, StoreError::NotFound { entity: "quiz", .. }));
    let stored = question::Entity::find().count(&ctx.db).await.expect("count");
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_option_for_unknown_question_is_not_found() {
    let ctx = setup_store().await;

    let err = ctx
        .store
        .create_option(QuestionId::new(), "A", "1")
        .await
        .expect_err("question does not exist");

    assert!(matches!(err, StoreError::NotFound { entity: "question", .. }));
}

#[tokio::test]
async fn test_duplicate_option_key_within_question() {
    let ctx = setup_store().await;
    let quiz = ctx
        .store
        .create_quiz("print(1)", "What prints?", "1")
        .await
        .unwrap();
    let question = ctx
        .store
        .create_question(quiz.id, "A", "print writes its argument", 1)
        .await
        .unwrap();

    ctx.store.create_option(question.id, "A", "1").await.expect("first key");
    ctx.store.create_option(question.id, "B", "2").await.expect("different key");
    let err = ctx
        .store
        .create_option(question.id, "A", "3")
        .await
        .expect_err("same key twice");

    assert!(err.is_duplicate_key());
    assert_eq!(
        err.to_string(),
        format!("option key 'A' already exists for question {}", question.id)
    );
    let options = ctx.store.options.list_by_question(question.id).await.unwrap();
    assert_eq!(options.len(), 2);
}

#[tokio::test]
async fn test_same_option_key_under_other_question() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("x = 1", "Value of x?", "1").await.unwrap();
    let first = ctx.store.create_question(quiz.id, "A", "", 1).await.unwrap();
    let second = ctx.store.create_question(quiz.id, "A", "", 2).await.unwrap();

    ctx.store.create_option(first.id, "A", "1").await.unwrap();
    let option = ctx
        .store
        .create_option(second.id, "A", "1")
        .await
        .expect("key is only unique per question");

    assert_eq!(option.question_id, second.id);
    assert_eq!(option.option_key.as_str(), "A");
}

#[tokio::test]
async fn test_invalid_option_key_is_rejected() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("", "", "").await.unwrap();

    let err = ctx
        .store
        .create_question(quiz.id, "", "", 1)
        .await
        .expect_err("empty key");
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let question = ctx.store.create_question(quiz.id, "A", "", 1).await.unwrap();
    let err = ctx
        .store
        .create_option(question.id, "ABCDEFGHIJK", "too long")
        .await
        .expect_err("eleven chars");
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[tokio::test]
async fn test_delete_quiz_cascades() {
    let ctx = setup_store().await;
    let doomed = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let kept = ctx.store.create_quiz("d", "e", "f").await.unwrap();

    let mut question_ids = Vec::new();
    let mut option_ids = Vec::new();
    for topic in 0..2 {
        let question = ctx.store.create_question(doomed.id, "A", "", topic).await.unwrap();
        for option_key in ["A", "B", "C"] {
            let option = ctx.store.create_option(question.id, option_key, "").await.unwrap();
            option_ids.push(option.id);
        }
        question_ids.push(question.id);
    }
    let kept_question = ctx.store.create_question(kept.id, "A", "", 1).await.unwrap();
    let kept_option = ctx.store.create_option(kept_question.id, "A", "").await.unwrap();

    ctx.store.delete_quiz(doomed.id).await.expect("delete quiz");

    assert!(ctx.store.get_quiz(doomed.id).await.unwrap_err().is_not_found());
    for question_id in question_ids {
        assert!(ctx.store.get_question(question_id).await.unwrap_err().is_not_found());
    }
    for option_id in option_ids {
        assert!(ctx.store.get_option(option_id).await.unwrap_err().is_not_found());
    }
    ctx.store.get_quiz(kept.id).await.expect("other quiz survives");
    ctx.store.get_question(kept_question.id).await.expect("other question survives");
    ctx.store.get_option(kept_option.id).await.expect("other option survives");
}

#[tokio::test]
async fn test_delete_missing_quiz_is_not_found() {
    let ctx = setup_store().await;

    let err = ctx.store.delete_quiz(QuizId::new()).await.expect_err("nothing to delete");

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_question_cascades_to_options_only() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let doomed = ctx.store.create_question(quiz.id, "A", "", 1).await.unwrap();
    let kept = ctx.store.create_question(quiz.id, "B", "", 1).await.unwrap();
    let doomed_option = ctx.store.create_option(doomed.id, "A", "").await.unwrap();
    let kept_option = ctx.store.create_option(kept.id, "B", "").await.unwrap();

    ctx.store.delete_question(doomed.id).await.expect("delete question");

    assert!(ctx.store.get_question(doomed.id).await.unwrap_err().is_not_found());
    assert!(ctx.store.get_option(doomed_option.id).await.unwrap_err().is_not_found());
    ctx.store.get_quiz(quiz.id).await.expect("quiz survives");
    ctx.store.get_option(kept_option.id).await.expect("sibling option survives");
    assert!(ctx.store.delete_question(doomed.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_schema_cascades_on_direct_delete() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let question = ctx.store.create_question(quiz.id, "A", "", 1).await.unwrap();
    ctx.store.create_option(question.id, "A", "").await.unwrap();

    quiz::Entity::delete_by_id(quiz.id.to_string())
        .exec(&ctx.db)
        .await
        .expect("direct delete");

    assert_eq!(question::Entity::find().count(&ctx.db).await.unwrap(), 0);
    assert_eq!(option::Entity::find().count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_quiz_replaces_text_fields() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();

    let updated = ctx
        .store
        .quizzes
        .update(
            quiz.id,
            UpdateQuiz {
                code: "print(2)".to_string(),
                instruction: "And now?".to_string(),
                correct_code: "2".to_string(),
            },
        )
        .await
        .expect("update quiz");

    assert_eq!(updated.id, quiz.id);
    assert_eq!(updated.code, "print(2)");
    assert!(updated.updated_at >= quiz.updated_at);
    let loaded = ctx.store.get_quiz(quiz.id).await.unwrap();
    assert_eq!(loaded.correct_code, "2");
}

#[tokio::test]
async fn test_update_question() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let question = ctx.store.create_question(quiz.id, "A", "old", 1).await.unwrap();

    let updated = ctx
        .store
        .questions
        .update(
            question.id,
            UpdateQuestion {
                correct_option_key: key("B"),
                correct_option_explanation: "new".to_string(),
                topic_id: 7,
            },
        )
        .await
        .expect("update question");

    assert_eq!(updated.quiz_id, quiz.id);
    assert_eq!(updated.correct_option_key, key("B"));
    assert_eq!(updated.topic_id, 7);

    let err = ctx
        .store
        .questions
        .update(
            QuestionId::new(),
            UpdateQuestion {
                correct_option_key: key("A"),
                correct_option_explanation: String::new(),
                topic_id: 1,
            },
        )
        .await
        .expect_err("unknown question");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_listing_follows_creation_order() {
    let ctx = setup_store().await;
    let first = ctx.store.create_quiz("1", "", "").await.unwrap();
    let second = ctx.store.create_quiz("2", "", "").await.unwrap();
    let q1 = ctx.store.create_question(first.id, "A", "", 1).await.unwrap();
    let q2 = ctx.store.create_question(first.id, "A", "", 2).await.unwrap();

    let quizzes = ctx.store.quizzes.list().await.unwrap();
    assert_eq!(
        quizzes.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let questions = ctx.store.questions.list_by_quiz(first.id).await.unwrap();
    assert_eq!(
        questions.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![q1.id, q2.id]
    );
    assert!(ctx.store.questions.list_by_quiz(second.id).await.unwrap().is_empty());
    assert!(
        ctx.store
            .questions
            .list_by_quiz(QuizId::new())
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_check_correct_option() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let question = ctx.store.create_question(quiz.id, "B", "", 1).await.unwrap();
    ctx.store.create_option(question.id, "A", "1").await.unwrap();

    let status = ctx.store.questions.check_correct_option(question.id).await.unwrap();
    assert_eq!(status, CorrectOptionStatus::Missing);

    let correct = ctx.store.create_option(question.id, "B", "2").await.unwrap();
    let status = ctx.store.questions.check_correct_option(question.id).await.unwrap();
    assert_eq!(status, CorrectOptionStatus::Matched(correct.id));
}

#[tokio::test]
async fn test_replace_options() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let question = ctx.store.create_question(quiz.id, "C", "", 1).await.unwrap();
    let old = ctx.store.create_option(question.id, "A", "old").await.unwrap();

    let replaced = ctx
        .store
        .options
        .replace_all(
            question.id,
            vec![
                OptionDraft::new(key("A"), "new a"),
                OptionDraft::new(key("C"), "new c"),
            ],
        )
        .await
        .expect("replace options");

    assert_eq!(replaced.len(), 2);
    assert!(ctx.store.get_option(old.id).await.unwrap_err().is_not_found());
    let contents: Vec<_> = ctx
        .store
        .options
        .list_by_question(question.id)
        .await
        .unwrap()
        .into_iter()
        .map(|option| option.option_content)
        .collect();
    assert_eq!(contents, vec!["new a", "new c"]);
}

#[tokio::test]
async fn test_replace_options_with_duplicates_keeps_old_set() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let question = ctx.store.create_question(quiz.id, "A", "", 1).await.unwrap();
    let old = ctx.store.create_option(question.id, "A", "old").await.unwrap();

    let err = ctx
        .store
        .options
        .replace_all(
            question.id,
            vec![
                OptionDraft::new(key("B"), "1"),
                OptionDraft::new(key("B"), "2"),
            ],
        )
        .await
        .expect_err("duplicate drafts");

    assert!(err.is_duplicate_key());
    let kept = ctx.store.get_option(old.id).await.expect("old option untouched");
    assert_eq!(kept.option_content, "old");
}

#[tokio::test]
async fn test_delete_option() {
    let ctx = setup_store().await;
    let quiz = ctx.store.create_quiz("a", "b", "c").await.unwrap();
    let question = ctx.store.create_question(quiz.id, "A", "", 1).await.unwrap();
    let option = ctx.store.create_option(question.id, "A", "").await.unwrap();

    ctx.store.options.delete(option.id).await.expect("delete option");

    assert!(ctx.store.get_option(option.id).await.unwrap_err().is_not_found());
    assert!(ctx.store.options.delete(option.id).await.unwrap_err().is_not_found());
    ctx.store
        .create_option(question.id, "A", "again")
        .await
        .expect("key is free after delete");
}

#[tokio::test]
async fn test_update_unknown_quiz_is_not_found() {
    let ctx = setup_store().await;

    let err = ctx
        .store
        .quizzes
        .update(
            QuizId::new(),
            UpdateQuiz {
                code: "print(2)".to_string(),
                instruction: String::new(),
                correct_code: "2".to_string(),
            },
        )
        .await
        .expect_err("unknown quiz");

    assert!(matches!(err, StoreError::NotFound { entity: "quiz", .. }));
    assert!(ctx.store.quizzes.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_options_of_unknown_question_is_not_found() {
    let ctx = setup_store().await;

    let err = ctx
        .store
        .options
        .list_by_question(QuestionId::new())
        .await
        .expect_err("unknown question");

    assert!(matches!(err, StoreError::NotFound { entity: "question", .. }));
}

#[tokio::test]
async fn test_load_tree_of_unknown_quiz_is_not_found() {
    let ctx = setup_store().await;

    let err = ctx
        .store
        .quizzes
        .load_tree(QuizId::new())
        .await
        .expect_err("unknown quiz");

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_pool_without_connections_is_rejected() {
    let config = codequiz_server::StoreConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 0,
        ..Default::default()
    };

    let err = codequiz_server::db::init_pool_and_migrate(&config)
        .await
        .expect_err("zero connections must not reach the pool builder");

    assert!(err.to_string().contains("max_connections must be at least 1"));
}
