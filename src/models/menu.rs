use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Rubrique de navigation regroupant des articles d'information.
// Contrairement aux émotions, l'icône est une simple chaîne (pas d'upload).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nom: String,
    pub icone: String,
    pub actif: bool,
    pub date_creation: DateTime,
    pub date_suppression: Option<DateTime>,
    pub dernier_modificateur_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::info::Entity")]
    Info,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DernierModificateurId",
        to = "super::users::Column::Id"
    )]
    DernierModificateur,
}

impl Related<super::info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Info.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
