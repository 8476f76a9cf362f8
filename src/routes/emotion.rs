use actix_web::{HttpRequest, HttpResponse, delete, get, guard, post, web};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::config::AppConfig;
use crate::middleware::AuthUser;
use crate::models::categorie_emotion::Entity as CategorieEmotion;
use crate::models::dto::EmotionResponse;
use crate::models::emotion;
use crate::routes::db_error;
use crate::services::upload_service::UploadService;
use crate::utils::request::extract_form_data;

fn emotion_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Émotion non trouvée"
    }))
}

fn invalid_categorie() -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "message": "La catégorie d'émotion est invalide"
    }))
}

fn upload_failure(e: std::io::Error) -> HttpResponse {
    tracing::error!("Échec d'écriture d'une image uploadée: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Échec de l'enregistrement de l'image"
    }))
}

/// GET /api/emotion/all - Toutes les émotions, actives ou non
pub async fn get_all_emotions(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match emotion::Entity::find().all(db.get_ref()).await {
        Ok(emotions) => {
            let response: Vec<EmotionResponse> = emotions.iter().map(EmotionResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/emotion - Les émotions actives
pub async fn get_active_emotions(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match emotion::Entity::find()
        .filter(emotion::Column::Actif.eq(true))
        .all(db.get_ref())
        .await
    {
        Ok(emotions) => {
            let response: Vec<EmotionResponse> = emotions.iter().map(EmotionResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/emotion/categorie/{categorieId} - Les émotions actives d'une catégorie
#[get("/categorie/{categorieId}")]
pub async fn get_emotions_by_categorie(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match emotion::Entity::find()
        .filter(emotion::Column::CategorieId.eq(path.into_inner()))
        .filter(emotion::Column::Actif.eq(true))
        .all(db.get_ref())
        .await
    {
        Ok(emotions) => {
            let response: Vec<EmotionResponse> = emotions.iter().map(EmotionResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/emotion/{id} - Une émotion par son id
#[get("/{id}")]
pub async fn get_emotion_by_id(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match emotion::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(emotion)) => HttpResponse::Ok().json(EmotionResponse::from(&emotion)),
        Ok(None) => emotion_not_found(),
        Err(e) => db_error(e),
    }
}

/// POST /api/emotion - Créer une émotion (PROTÉGÉE, multipart)
/// L'icône est une image uploadée obligatoire.
#[post("")]
pub async fn create_emotion(
    req: HttpRequest,
    payload: web::Payload,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let form = match extract_form_data(&req, payload).await {
        Ok(form) => form,
        Err(message) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "message": message }));
        }
    };

    // 1. Champs obligatoires
    let (nom, categorie_id) = match (form.string("nom"), form.int("categorie")) {
        (Some(nom), Some(categorie_id)) => (nom, categorie_id),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Le nom et la catégorie de l'émotion sont requis"
            }));
        }
    };

    // 2. La catégorie doit exister
    match CategorieEmotion::find_by_id(categorie_id)
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return invalid_categorie(),
        Err(e) => return db_error(e),
    }

    // 3. Image obligatoire à la création
    let image = match form.file("icone") {
        Some(file) if !file.data.is_empty() => file,
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Une image est requise pour créer une émotion"
            }));
        }
    };

    let icone = match UploadService::save_image(
        &config.upload_dir,
        "emotions",
        "emotion",
        &image.filename,
        &image.data,
    ) {
        Ok(path) => path,
        Err(e) => return upload_failure(e),
    };

    let new_emotion = emotion::ActiveModel {
        nom: Set(nom),
        icone: Set(icone),
        actif: Set(true),
        date_creation: Set(Utc::now().naive_utc()),
        date_suppression: Set(None),
        dernier_modificateur_id: Set(Some(auth_user.user_id)),
        categorie_id: Set(categorie_id),
        ..Default::default()
    };

    match new_emotion.insert(db.get_ref()).await {
        Ok(created) => HttpResponse::Created().json(EmotionResponse::from(&created)),
        Err(e) => db_error(e),
    }
}

/// POST /api/emotion/{id} - Mise à jour partielle (PROTÉGÉE, JSON ou multipart)
/// Remplacer l'icône supprime d'abord l'ancien fichier.
#[post("/{id}")]
pub async fn update_emotion(
    req: HttpRequest,
    payload: web::Payload,
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let form = match extract_form_data(&req, payload).await {
        Ok(form) => form,
        Err(message) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "message": message }));
        }
    };

    let existing = match emotion::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(emotion)) => emotion,
        Ok(None) => return emotion_not_found(),
        Err(e) => return db_error(e),
    };

    let old_icone = existing.icone.clone();
    let mut active: emotion::ActiveModel = existing.into();

    if let Some(nom) = form.string("nom") {
        active.nom = Set(nom);
    }

    if let Some(actif) = form.bool("actif") {
        active.actif = Set(actif);
    }

    if let Some(categorie_id) = form.int("categorie") {
        match CategorieEmotion::find_by_id(categorie_id)
            .one(db.get_ref())
            .await
        {
            Ok(Some(_)) => active.categorie_id = Set(categorie_id),
            Ok(None) => return invalid_categorie(),
            Err(e) => return db_error(e),
        }
    }

    if let Some(image) = form.file("icone").filter(|f| !f.data.is_empty()) {
        // L'ancienne image est supprimée avant d'écrire la nouvelle
        UploadService::delete_image(&config.upload_dir, &old_icone);

        match UploadService::save_image(
            &config.upload_dir,
            "emotions",
            "emotion",
            &image.filename,
            &image.data,
        ) {
            Ok(path) => active.icone = Set(path),
            Err(e) => return upload_failure(e),
        }
    }

    active.dernier_modificateur_id = Set(Some(auth_user.user_id));

    match active.update(db.get_ref()).await {
        Ok(updated) => HttpResponse::Ok().json(EmotionResponse::from(&updated)),
        Err(e) => db_error(e),
    }
}

/// DELETE /api/emotion/{id} - Suppression logique (PROTÉGÉE)
/// L'image est conservée puisque la ligne reste en base.
#[delete("/{id}")]
pub async fn delete_emotion(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let existing = match emotion::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(emotion)) => emotion,
        Ok(None) => return emotion_not_found(),
        Err(e) => return db_error(e),
    };

    let mut active: emotion::ActiveModel = existing.into();
    active.actif = Set(false);
    active.date_suppression = Set(Some(Utc::now().naive_utc()));
    active.dernier_modificateur_id = Set(Some(auth_user.user_id));

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => db_error(e),
    }
}

pub fn emotion_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/emotion")
            .service(
                web::resource("/all")
                    .name("get_all_emotions")
                    .guard(guard::Get())
                    .to(get_all_emotions),
            )
            .service(get_emotions_by_categorie)
            .service(
                web::resource("")
                    .name("get_active_emotions")
                    .guard(guard::Get())
                    .to(get_active_emotions),
            )
            .service(create_emotion)
            .service(get_emotion_by_id)
            .service(update_emotion)
            .service(delete_emotion),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_active_listing_filters_out_soft_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<emotion::Model>::new()])
            .into_connection();

        let db = web::Data::new(db);
        let resp = get_active_emotions(db.clone()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let db = std::sync::Arc::try_unwrap(db.into_inner()).unwrap();
        let log = db
            .into_transaction_log()
            .iter()
            .flat_map(|t| t.statements())
            .map(|s| s.sql.clone())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(log.contains(r#""actif""#));
    }

    #[actix_web::test]
    async fn test_full_listing_has_no_actif_filter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<emotion::Model>::new()])
            .into_connection();

        let db = web::Data::new(db);
        let resp = get_all_emotions(db.clone()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let db = std::sync::Arc::try_unwrap(db.into_inner()).unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("WHERE"));
    }
}
