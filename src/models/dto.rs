// DTOs de réponse partagés entre les routes.
// Les dates sont formatées en "YYYY-MM-DD HH:MM:SS" pour le front.
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{emotion, info, menu, tracker, users};

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_date_opt(date: &Option<NaiveDateTime>) -> Option<String> {
    date.as_ref().map(format_date)
}

/// Projection publique d'un utilisateur (jamais de hash de mot de passe)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub roles: Vec<String>,
    pub actif: bool,
    pub date_creation: String,
    pub date_suppression: Option<String>,
}

impl From<&users::Model> for UserResponse {
    fn from(user: &users::Model) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            roles: user.role_names(),
            actif: user.actif,
            date_creation: format_date(&user.date_creation),
            date_suppression: format_date_opt(&user.date_suppression),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmotionResponse {
    pub id: i32,
    pub nom: String,
    pub icone: String,
    pub actif: bool,
    pub date_creation: String,
    pub date_suppression: Option<String>,
    pub categorie: i32,
    pub dernier_modificateur: Option<i32>,
}

impl From<&emotion::Model> for EmotionResponse {
    fn from(emotion: &emotion::Model) -> Self {
        EmotionResponse {
            id: emotion.id,
            nom: emotion.nom.clone(),
            icone: emotion.icone.clone(),
            actif: emotion.actif,
            date_creation: format_date(&emotion.date_creation),
            date_suppression: format_date_opt(&emotion.date_suppression),
            categorie: emotion.categorie_id,
            dernier_modificateur: emotion.dernier_modificateur_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub id: i32,
    pub nom: String,
    pub icone: String,
    pub actif: bool,
    pub date_creation: String,
    pub date_suppression: Option<String>,
    pub dernier_modificateur: i32,
}

impl From<&menu::Model> for MenuResponse {
    fn from(menu: &menu::Model) -> Self {
        MenuResponse {
            id: menu.id,
            nom: menu.nom.clone(),
            icone: menu.icone.clone(),
            actif: menu.actif,
            date_creation: format_date(&menu.date_creation),
            date_suppression: format_date_opt(&menu.date_suppression),
            dernier_modificateur: menu.dernier_modificateur_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub id: i32,
    pub titre: String,
    pub contenu: String,
    pub image: Option<String>,
    pub actif: bool,
    pub date_creation: String,
    pub date_modification: Option<String>,
    pub createur: i32,
    pub modificateur: Option<i32>,
    pub menu: i32,
}

impl From<&info::Model> for InfoResponse {
    fn from(info: &info::Model) -> Self {
        InfoResponse {
            id: info.id,
            titre: info.titre.clone(),
            contenu: info.contenu.clone(),
            image: info.image.clone(),
            actif: info.actif,
            date_creation: format_date(&info.date_creation),
            date_modification: format_date_opt(&info.date_modification),
            createur: info.createur_id,
            modificateur: info.modificateur_id,
            menu: info.menu_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackerResponse {
    pub id: i32,
    pub datetime: String,
    pub commentaire: Option<String>,
    pub actif: bool,
    pub user: i32,
    pub emotion: i32,
}

impl From<&tracker::Model> for TrackerResponse {
    fn from(tracker: &tracker::Model) -> Self {
        TrackerResponse {
            id: tracker.id,
            datetime: format_date(&tracker.datetime),
            commentaire: tracker.commentaire.clone(),
            actif: tracker.actif,
            user: tracker.user_id,
            emotion: tracker.emotion_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();
        assert_eq!(format_date(&date), "2024-02-29 08:05:03");
    }
}
