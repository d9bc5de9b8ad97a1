//! Conversions from serialized documents into repository inputs.

use codequiz_api_types::{OptionDocument, QuestionDocument, QuizDocument, QuizReviewRequest};
use codequiz_core::domain::{OptionKey, QuizId};

use crate::error::StoreError;
use crate::repository::{NewQuestionTree, NewQuiz, NewQuizTree, OptionDraft, QuizReview};

impl TryFrom<OptionDocument> for OptionDraft {
    type Error = StoreError;

    fn try_from(doc: OptionDocument) -> Result<Self, Self::Error> {
        Ok(OptionDraft::new(OptionKey::new(doc.key)?, doc.content))
    }
}

fn drafts(options: Vec<OptionDocument>) -> Result<Vec<OptionDraft>, StoreError> {
    options.into_iter().map(OptionDraft::try_from).collect()
}

impl TryFrom<QuestionDocument> for NewQuestionTree {
    type Error = StoreError;

    fn try_from(doc: QuestionDocument) -> Result<Self, Self::Error> {
        Ok(NewQuestionTree {
            correct_option_key: OptionKey::new(doc.correct_option_key)?,
            correct_option_explanation: doc.correct_option_explanation,
            topic_id: doc.topic_id,
            options: drafts(doc.options)?,
        })
    }
}

impl TryFrom<QuizDocument> for NewQuizTree {
    type Error = StoreError;

    fn try_from(doc: QuizDocument) -> Result<Self, Self::Error> {
        let questions = doc
            .questions
            .into_iter()
            .map(NewQuestionTree::try_from)
            .collect::<Result<_, _>>()?;

        Ok(NewQuizTree {
            quiz: NewQuiz {
                code: doc.code,
                instruction: doc.instruction,
                correct_code: doc.correct_code,
            },
            questions,
        })
    }
}

impl TryFrom<QuizReviewRequest> for QuizReview {
    type Error = StoreError;

    fn try_from(request: QuizReviewRequest) -> Result<Self, Self::Error> {
        // An id that does not parse cannot name a stored quiz.
        let quiz_id = request
            .quiz_id
            .parse::<QuizId>()
            .map_err(|_| StoreError::not_found(QuizId::ENTITY, &request.quiz_id))?;

        Ok(QuizReview {
            quiz_id,
            code: request.code,
            instruction: request.instruction,
            correct_option_key: OptionKey::new(request.correct_option_key)?,
            topic_id: request.topic_id,
            options: drafts(request.options)?,
        })
    }
}
