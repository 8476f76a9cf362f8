use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "emotion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nom: String,
    pub icone: String, // Chemin public de l'image uploadée, ex: "/uploads/emotions/emotion_xxx.png"
    pub actif: bool,
    pub date_creation: DateTime,
    pub date_suppression: Option<DateTime>,
    pub dernier_modificateur_id: Option<i32>, // Dernier utilisateur à avoir modifié l'émotion
    pub categorie_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categorie_emotion::Entity",
        from = "Column::CategorieId",
        to = "super::categorie_emotion::Column::Id"
    )]
    Categorie,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DernierModificateurId",
        to = "super::users::Column::Id"
    )]
    DernierModificateur,

    #[sea_orm(has_many = "super::tracker::Entity")]
    Tracker,
}

impl Related<super::categorie_emotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categorie.def()
    }
}

impl Related<super::tracker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tracker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
