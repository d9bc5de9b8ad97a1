pub mod option_repository;
pub mod question_repository;
pub mod quiz_repository;

pub use option_repository::{
    NewOption, OptionDraft, OptionRecord, OptionRepository, SeaOrmOptionRepository,
};
pub use question_repository::{
    CorrectOptionStatus, NewQuestion, QuestionRecord, QuestionRepository,
    SeaOrmQuestionRepository, UpdateQuestion,
};
pub use quiz_repository::{
    NewQuestionTree, NewQuiz, NewQuizTree, QuestionTree, QuizRecord, QuizRepository, QuizReview,
    QuizTree, SeaOrmQuizRepository, UpdateQuiz,
};
