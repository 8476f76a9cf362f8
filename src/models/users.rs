use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String,
    pub roles: Json, // Tableau JSON de rôles, contient toujours ROLE_USER
    pub actif: bool,
    pub date_creation: DateTime,
    pub date_suppression: Option<DateTime>, // Suppression logique
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tracker::Entity")]
    Tracker,
}

impl Related<super::tracker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tracker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Les rôles sous forme de liste de chaînes
    pub fn role_names(&self) -> Vec<String> {
        self.roles
            .as_array()
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(|r| r.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role_names().iter().any(|r| r == ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user_with_roles(roles: serde_json::Value) -> Model {
        Model {
            id: 1,
            username: "marie_dupont".to_string(),
            password_hash: String::new(),
            roles,
            actif: true,
            date_creation: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            date_suppression: None,
        }
    }

    #[test]
    fn test_role_names() {
        let user = user_with_roles(serde_json::json!([ROLE_USER, ROLE_ADMIN]));
        assert_eq!(user.role_names(), vec![ROLE_USER, ROLE_ADMIN]);
        assert!(user.is_admin());
    }

    #[test]
    fn test_simple_user_is_not_admin() {
        let user = user_with_roles(serde_json::json!([ROLE_USER]));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_malformed_roles_column() {
        let user = user_with_roles(serde_json::json!("pas un tableau"));
        assert!(user.role_names().is_empty());
        assert!(!user.is_admin());
    }
}
