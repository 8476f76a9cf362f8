use actix_web::{HttpResponse, get, web};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::models::categorie_emotion::Entity as CategorieEmotion;
use crate::routes::db_error;

/// GET /api/categorie-emotion - Toutes les catégories (données de référence)
#[get("")]
pub async fn get_all_categories(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match CategorieEmotion::find().all(db.get_ref()).await {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => db_error(e),
    }
}

pub fn categorie_emotion_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/categorie-emotion").service(get_all_categories));
}
