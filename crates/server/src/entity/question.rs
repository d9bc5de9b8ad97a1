use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub quiz_id: String,
    pub correct_option_key: String,
    pub correct_option_explanation: String,
    pub topic_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz::Entity",
        from = "Column::QuizId",
        to = "super::quiz::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Quiz,
    #[sea_orm(has_many = "super::option::Entity")]
    QuizOption,
}

impl Related<super::quiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
