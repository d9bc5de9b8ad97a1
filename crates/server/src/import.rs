//! Bulk import of quiz documents from a JSON file.

use std::path::Path;

use anyhow::Context;
use codequiz_api_types::QuizDocument;

use crate::repository::{NewQuizTree, QuizTree};
use crate::store::QuizStore;

pub fn read_documents(path: impl AsRef<Path>) -> anyhow::Result<Vec<QuizDocument>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz documents: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse quiz documents: {}", path.display()))
}

/// Creates one quiz tree per document. Each document is atomic; the first
/// failure stops the import and names how many documents made it in.
pub async fn import_documents(
    store: &QuizStore,
    documents: Vec<QuizDocument>,
) -> anyhow::Result<Vec<QuizTree>> {
    let mut imported = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        let done = imported.len();
        let tree = NewQuizTree::try_from(document).with_context(|| {
            format!("quiz document #{index} is invalid ({done} imported before it)")
        })?;
        let created = store.quizzes.create_tree(tree).await.with_context(|| {
            format!("failed to import quiz document #{index} ({done} imported before it)")
        })?;

        tracing::debug!(index, quiz_id = %created.quiz.id, "quiz document imported");
        imported.push(created);
    }

    Ok(imported)
}

pub async fn import_file(
    store: &QuizStore,
    path: impl AsRef<Path>,
) -> anyhow::Result<Vec<QuizTree>> {
    let documents = read_documents(path)?;
    import_documents(store, documents).await
}
