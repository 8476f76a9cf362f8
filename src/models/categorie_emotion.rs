use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Données de référence statiques : une catégorie regroupe des émotions
// sous une couleur commune (ex: "Joie" en jaune, "Colère" en rouge).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categorie_emotion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nom: String,
    pub couleur: String, // Code couleur hexadécimal, ex: "#FFD700"
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::emotion::Entity")]
    Emotion,
}

impl Related<super::emotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Emotion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
