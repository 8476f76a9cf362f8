pub mod auth;
pub mod categorie_emotion;
pub mod emotion;
pub mod health;
pub mod info;
pub mod menu;
pub mod tracker;
pub mod user;

use actix_web::{HttpResponse, web};
use sea_orm::DbErr;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(user::user_routes)
            .configure(categorie_emotion::categorie_emotion_routes)
            .configure(emotion::emotion_routes)
            .configure(menu::menu_routes)
            .configure(info::info_routes)
            .configure(tracker::tracker_routes),
    );
}

/// Réponse 500 commune : le détail part dans les logs, jamais au client
pub(crate) fn db_error(e: DbErr) -> HttpResponse {
    tracing::error!("Erreur base de données: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Erreur base de données"
    }))
}
