use actix_web::{HttpRequest, HttpResponse, delete, get, guard, post, put, web};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::config::AppConfig;
use crate::middleware::AuthUser;
use crate::models::dto::InfoResponse;
use crate::models::info;
use crate::models::menu::Entity as Menu;
use crate::routes::db_error;
use crate::services::upload_service::UploadService;
use crate::utils::request::extract_form_data;

fn info_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Info non trouvée"
    }))
}

fn upload_failure(e: std::io::Error) -> HttpResponse {
    tracing::error!("Échec d'écriture d'une image uploadée: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Échec de l'enregistrement de l'image"
    }))
}

/// GET /api/info - Les infos actives, des plus récentes aux plus anciennes
pub async fn get_active_infos(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match info::Entity::find()
        .filter(info::Column::Actif.eq(true))
        .order_by_desc(info::Column::DateCreation)
        .all(db.get_ref())
        .await
    {
        Ok(infos) => {
            let response: Vec<InfoResponse> = infos.iter().map(InfoResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/info/menu/{id} - Les infos actives d'un menu.
/// Un menu sans info donne un tableau vide, pas une 404.
pub async fn get_infos_by_menu(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match info::Entity::find()
        .filter(info::Column::MenuId.eq(path.into_inner()))
        .filter(info::Column::Actif.eq(true))
        .order_by_desc(info::Column::DateCreation)
        .all(db.get_ref())
        .await
    {
        Ok(infos) => {
            let response: Vec<InfoResponse> = infos.iter().map(InfoResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/info/{id} - Une info par son id
#[get("/{id}")]
pub async fn get_info_by_id(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match info::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(info)) => HttpResponse::Ok().json(InfoResponse::from(&info)),
        Ok(None) => info_not_found(),
        Err(e) => db_error(e),
    }
}

/// POST /api/info/ - Créer un article (PROTÉGÉE, JSON ou multipart)
/// L'image est optionnelle, contrairement aux émotions.
#[post("/")]
pub async fn create_info(
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

    let (titre, contenu, menu_id) = match (
        form.string("titre"),
        form.string("contenu"),
        form.int("menu"),
    ) {
        (Some(titre), Some(contenu), Some(menu_id)) => (titre, contenu, menu_id),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Titre, contenu et menu requis"
            }));
        }
    };

    match Menu::find_by_id(menu_id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Menu non trouvé"
            }));
        }
        Err(e) => return db_error(e),
    }

    let image = match form.file("image").filter(|f| !f.data.is_empty()) {
        Some(file) => {
            match UploadService::save_image(
                &config.upload_dir,
                "infos",
                "info",
                &file.filename,
                &file.data,
            ) {
                Ok(path) => Some(path),
                Err(e) => return upload_failure(e),
            }
        }
        None => None,
    };

    let new_info = info::ActiveModel {
        titre: Set(titre),
        contenu: Set(contenu),
        image: Set(image),
        actif: Set(true),
        date_creation: Set(Utc::now().naive_utc()),
        date_modification: Set(None),
        date_suppression: Set(None),
        createur_id: Set(auth_user.user_id),
        modificateur_id: Set(None),
        supprimeur_id: Set(None),
        menu_id: Set(menu_id),
        ..Default::default()
    };

    match new_info.insert(db.get_ref()).await {
        Ok(created) => HttpResponse::Created().json(InfoResponse::from(&created)),
        Err(e) => db_error(e),
    }
}

/// PUT /api/info/{id} - Mettre à jour un article (PROTÉGÉE, JSON ou multipart)
#[put("/{id}")]
pub async fn update_info(
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

    let existing = match info::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(info)) => info,
        Ok(None) => return info_not_found(),
        Err(e) => return db_error(e),
    };

    let (titre, contenu) = match (form.string("titre"), form.string("contenu")) {
        (Some(titre), Some(contenu)) => (titre, contenu),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Titre et contenu requis"
            }));
        }
    };

    let old_image = existing.image.clone();
    let mut active: info::ActiveModel = existing.into();
    active.titre = Set(titre);
    active.contenu = Set(contenu);
    active.date_modification = Set(Some(Utc::now().naive_utc()));
    active.modificateur_id = Set(Some(auth_user.user_id));

    if let Some(file) = form.file("image").filter(|f| !f.data.is_empty()) {
        if let Some(old_path) = &old_image {
            UploadService::delete_image(&config.upload_dir, old_path);
        }

        match UploadService::save_image(
            &config.upload_dir,
            "infos",
            "info",
            &file.filename,
            &file.data,
        ) {
            Ok(path) => active.image = Set(Some(path)),
            Err(e) => return upload_failure(e),
        }
    }

    match active.update(db.get_ref()).await {
        Ok(updated) => HttpResponse::Ok().json(InfoResponse::from(&updated)),
        Err(e) => db_error(e),
    }
}

/// DELETE /api/info/{id} - Suppression logique (PROTÉGÉE)
/// Même politique que les autres entités : la ligne et l'image restent,
/// le supprimeur est tracé.
#[delete("/{id}")]
pub async fn delete_info(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let existing = match info::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(info)) => info,
        Ok(None) => return info_not_found(),
        Err(e) => return db_error(e),
    };

    let mut active: info::ActiveModel = existing.into();
    active.actif = Set(false);
    active.date_suppression = Set(Some(Utc::now().naive_utc()));
    active.supprimeur_id = Set(Some(auth_user.user_id));

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => db_error(e),
    }
}

pub fn info_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/info")
            .service(
                web::resource("")
                    .name("get_active_infos")
                    .guard(guard::Get())
                    .to(get_active_infos),
            )
            .service(
                web::resource("/menu/{id}")
                    .name("get_infos_by_menu")
                    .guard(guard::Get())
                    .to(get_infos_by_menu),
            )
            .service(create_info)
            .service(get_info_by_id)
            .service(update_info)
            .service(delete_info),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_active_listing_filters_and_sorts() {
        // Seules les infos actives sortent, des plus récentes aux plus anciennes
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<info::Model>::new()])
            .into_connection();

        let db = web::Data::new(db);
        let resp = get_active_infos(db.clone()).await;
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
        assert!(log.contains("ORDER BY"));
        assert!(log.contains("DESC"));
    }

    #[actix_web::test]
    async fn test_listing_by_menu_without_rows_returns_empty_array() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<info::Model>::new()])
            .into_connection();

        let resp = get_infos_by_menu(web::Path::from(99), web::Data::new(db)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
