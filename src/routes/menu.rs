use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::dto::MenuResponse;
use crate::models::menu;
use crate::routes::db_error;

// DTO de création : l'icône d'un menu est une simple chaîne
#[derive(Deserialize)]
pub struct CreateMenuRequest {
    pub nom: Option<String>,
    pub icone: Option<String>,
}

// DTO de mise à jour partielle
#[derive(Deserialize)]
pub struct UpdateMenuRequest {
    pub nom: Option<String>,
    pub icone: Option<String>,
}

fn menu_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Menu non trouvé"
    }))
}

/// GET /api/menu/all - Tous les menus, actifs ou non
#[get("/all")]
pub async fn get_all_menus(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match menu::Entity::find().all(db.get_ref()).await {
        Ok(menus) => {
            let response: Vec<MenuResponse> = menus.iter().map(MenuResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/menu - Les menus actifs
#[get("")]
pub async fn get_active_menus(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match menu::Entity::find()
        .filter(menu::Column::Actif.eq(true))
        .all(db.get_ref())
        .await
    {
        Ok(menus) => {
            let response: Vec<MenuResponse> = menus.iter().map(MenuResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/menu/{id} - Un menu par son id
#[get("/{id}")]
pub async fn get_menu_by_id(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match menu::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(menu)) => HttpResponse::Ok().json(MenuResponse::from(&menu)),
        Ok(None) => menu_not_found(),
        Err(e) => db_error(e),
    }
}

/// POST /api/menu - Créer un menu (PROTÉGÉE)
#[post("")]
pub async fn create_menu(
    auth_user: AuthUser,
    body: web::Json<CreateMenuRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (nom, icone) = match (&body.nom, &body.icone) {
        (Some(nom), Some(icone)) if !nom.is_empty() && !icone.is_empty() => (nom, icone),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Nom and icone sont requis"
            }));
        }
    };

    let new_menu = menu::ActiveModel {
        nom: Set(nom.clone()),
        icone: Set(icone.clone()),
        actif: Set(true),
        date_creation: Set(Utc::now().naive_utc()),
        date_suppression: Set(None),
        dernier_modificateur_id: Set(auth_user.user_id),
        ..Default::default()
    };

    match new_menu.insert(db.get_ref()).await {
        Ok(created) => HttpResponse::Created().json(MenuResponse::from(&created)),
        Err(e) => db_error(e),
    }
}

/// PUT /api/menu/{id} - Mise à jour partielle nom/icône (PROTÉGÉE)
#[put("/{id}")]
pub async fn update_menu(
    path: web::Path<i32>,
    auth_user: AuthUser,
    body: web::Json<UpdateMenuRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let existing = match menu::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(menu)) => menu,
        Ok(None) => return menu_not_found(),
        Err(e) => return db_error(e),
    };

    let mut active: menu::ActiveModel = existing.into();

    if let Some(nom) = &body.nom {
        active.nom = Set(nom.clone());
        active.dernier_modificateur_id = Set(auth_user.user_id);
    }
    if let Some(icone) = &body.icone {
        active.icone = Set(icone.clone());
        active.dernier_modificateur_id = Set(auth_user.user_id);
    }

    match active.update(db.get_ref()).await {
        Ok(updated) => HttpResponse::Ok().json(MenuResponse::from(&updated)),
        Err(e) => db_error(e),
    }
}

/// DELETE /api/menu/{id} - Suppression logique (PROTÉGÉE)
#[delete("/{id}")]
pub async fn delete_menu(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let existing = match menu::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(menu)) => menu,
        Ok(None) => return menu_not_found(),
        Err(e) => return db_error(e),
    };

    let mut active: menu::ActiveModel = existing.into();
    active.actif = Set(false);
    active.date_suppression = Set(Some(Utc::now().naive_utc()));
    active.dernier_modificateur_id = Set(auth_user.user_id);

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => db_error(e),
    }
}

pub fn menu_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/menu")
            .service(get_all_menus)
            .service(get_active_menus)
            .service(create_menu)
            .service(get_menu_by_id)
            .service(update_menu)
            .service(delete_menu),
    );
}
