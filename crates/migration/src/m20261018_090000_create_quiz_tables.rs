use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quiz::Table)
                    .if_not_exists()
                    .col(string_len(Quiz::Id, 36).primary_key())
                    .col(text(Quiz::Code))
                    .col(text(Quiz::Instruction))
                    .col(text(Quiz::CorrectCode))
                    .col(timestamp_null(Quiz::ReviewedAt))
                    .col(timestamp(Quiz::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Quiz::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(string_len(Question::Id, 36).primary_key())
                    .col(string_len(Question::QuizId, 36))
                    .col(string_len(Question::CorrectOptionKey, 10))
                    .col(text(Question::CorrectOptionExplanation))
                    // Bare category tag, no topic table behind it.
                    .col(integer(Question::TopicId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question-quiz_id")
                            .from(Question::Table, Question::QuizId)
                            .to(Quiz::Table, Quiz::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizOption::Table)
                    .if_not_exists()
                    .col(string_len(QuizOption::Id, 36).primary_key())
                    .col(string_len(QuizOption::QuestionId, 36))
                    .col(string_len(QuizOption::OptionKey, 10))
                    .col(text(QuizOption::OptionContent))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-option-question_id")
                            .from(QuizOption::Table, QuizOption::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_quiz_id")
                    .table(Question::Table)
                    .col(Question::QuizId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_topic_id")
                    .table(Question::Table)
                    .col(Question::TopicId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_option_question_id_option_key")
                    .table(QuizOption::Table)
                    .col(QuizOption::QuestionId)
                    .col(QuizOption::OptionKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuizOption::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Quiz::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Quiz {
    Table,
    Id,
    Code,
    Instruction,
    CorrectCode,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    QuizId,
    CorrectOptionKey,
    CorrectOptionExplanation,
    TopicId,
}

#[derive(DeriveIden)]
enum QuizOption {
    #[sea_orm(iden = "option")]
    Table,
    Id,
    QuestionId,
    OptionKey,
    OptionContent,
}
