use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Article d'information rattaché à un menu, avec piste d'audit complète
// (créateur, modificateur, supprimeur).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub titre: String,
    #[sea_orm(column_type = "Text")]
    pub contenu: String,
    pub image: Option<String>, // Chemin public de l'image uploadée, optionnelle
    pub actif: bool,
    pub date_creation: DateTime,
    pub date_modification: Option<DateTime>,
    pub date_suppression: Option<DateTime>,
    pub createur_id: i32,
    pub modificateur_id: Option<i32>,
    pub supprimeur_id: Option<i32>,
    pub menu_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu::Entity",
        from = "Column::MenuId",
        to = "super::menu::Column::Id"
    )]
    Menu,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreateurId",
        to = "super::users::Column::Id"
    )]
    Createur,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ModificateurId",
        to = "super::users::Column::Id"
    )]
    Modificateur,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SupprimeurId",
        to = "super::users::Column::Id"
    )]
    Supprimeur,
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
