use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Un tracker est un événement d'humeur : un utilisateur a ressenti
// une émotion à un instant donné, avec un commentaire facultatif.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracker")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datetime: DateTime,
    pub commentaire: Option<String>,
    pub actif: bool, // false = supprimé logiquement, non modifiable
    pub user_id: i32,
    pub emotion_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::emotion::Entity",
        from = "Column::EmotionId",
        to = "super::emotion::Column::Id"
    )]
    Emotion,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::emotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Emotion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
