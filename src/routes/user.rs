use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;

use crate::middleware::{AdminUser, AuthUser};
use crate::models::dto::UserResponse;
use crate::models::users::{self, ROLE_ADMIN, ROLE_USER};
use crate::routes::db_error;
use crate::utils::{jwt, password, validation};

// DTO pour l'inscription via /api/user (politique stricte)
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// DTO pour le changement de nom d'utilisateur
#[derive(Deserialize)]
pub struct ChangeUsernameRequest {
    pub id: Option<i32>,
    pub username: Option<String>,
}

// DTO pour la réinitialisation de son propre mot de passe
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

// DTO pour la réinitialisation par un admin
#[derive(Deserialize)]
pub struct AdminResetPasswordRequest {
    pub id: Option<i32>,
    pub new_password: Option<String>,
}

// DTO pour la création par un admin
#[derive(Deserialize)]
pub struct AdminCreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
    pub actif: Option<bool>,
}

// DTO pour la mise à jour par un admin
#[derive(Deserialize)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    pub roles: Option<Vec<String>>,
}

fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Utilisateur non trouvé"
    }))
}

fn username_taken() -> HttpResponse {
    HttpResponse::Conflict().json(serde_json::json!({
        "message": "Nom d'utilisateur déjà pris"
    }))
}

fn hash_failure(e: String) -> HttpResponse {
    tracing::error!("Échec du hash du mot de passe: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Erreur interne du serveur"
    }))
}

/// POST /api/user/change-username - Renommer un utilisateur
#[post("/change-username")]
pub async fn change_username(
    body: web::Json<ChangeUsernameRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (user_id, new_username) = match (body.id, &body.username) {
        (Some(id), Some(username)) => (id, username),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "ID de l'utilisateur et nouveau nom d'utilisateur requis"
            }));
        }
    };

    let user = match users::Entity::find_by_id(user_id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return db_error(e),
    };

    // Conflit uniquement si le nom est pris par un autre utilisateur
    match users::Entity::find()
        .filter(users::Column::Username.eq(new_username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(existing)) if existing.id != user.id => return username_taken(),
        Ok(_) => {}
        Err(e) => return db_error(e),
    }

    let mut active: users::ActiveModel = user.into();
    active.username = Set(new_username.clone());
    if let Err(e) = active.update(db.get_ref()).await {
        return db_error(e);
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Nom d'utilisateur mis à jour avec succès"
    }))
}

/// POST /api/user/reset-password - Changer son propre mot de passe (PROTÉGÉE)
#[post("/reset-password")]
pub async fn reset_password(
    auth_user: AuthUser,
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (old_password, new_password) = match (&body.old_password, &body.new_password) {
        (Some(old), Some(new)) => (old, new),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Ancien mot de passe et nouveau mot de passe requis"
            }));
        }
    };

    let user = match users::Entity::find_by_id(auth_user.user_id)
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        // Token valide mais compte disparu : on refuse comme un non-authentifié
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Non autorisé"
            }));
        }
        Err(e) => return db_error(e),
    };

    match password::verify_password(old_password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Ancien mot de passe incorrect"
            }));
        }
        Err(e) => return hash_failure(e),
    }

    if !validation::password_basic_valid(new_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Le mot de passe doit contenir au moins 6 caractères, une lettre, un chiffre et un caractère spécial"
        }));
    }

    let new_hash = match password::hash_password(new_password) {
        Ok(hash) => hash,
        Err(e) => return hash_failure(e),
    };

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(new_hash);
    if let Err(e) = active.update(db.get_ref()).await {
        return db_error(e);
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Mot de passe réinitialisé avec succès"
    }))
}

/// POST /api/user/admin/reset-password - Réinitialiser le mot de passe
/// d'un utilisateur (ADMIN)
#[post("/admin/reset-password")]
pub async fn admin_reset_password(
    _admin: AdminUser,
    body: web::Json<AdminResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (user_id, new_password) = match (body.id, &body.new_password) {
        (Some(id), Some(password)) => (id, password),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "ID de l'utilisateur et nouveau mot de passe requis"
            }));
        }
    };

    let user = match users::Entity::find_by_id(user_id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return db_error(e),
    };

    if !validation::password_basic_valid(new_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Le mot de passe doit contenir au moins 6 caractères, une lettre, un chiffre et un caractère spécial"
        }));
    }

    let new_hash = match password::hash_password(new_password) {
        Ok(hash) => hash,
        Err(e) => return hash_failure(e),
    };

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(new_hash);
    if let Err(e) = active.update(db.get_ref()).await {
        return db_error(e);
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Mot de passe réinitialisé avec succès"
    }))
}

/// GET /api/user/admin/list - Tous les utilisateurs, sans filtre (ADMIN)
#[get("/admin/list")]
pub async fn admin_list_users(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match users::Entity::find().all(db.get_ref()).await {
        Ok(users) => {
            let response: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// POST /api/user/admin/create - Créer un utilisateur (ADMIN)
#[post("/admin/create")]
pub async fn admin_create_user(
    _admin: AdminUser,
    body: web::Json<AdminCreateUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (username, plain_password) = match (&body.username, &body.password) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Username et mot de passe requis"
            }));
        }
    };

    match users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => return username_taken(),
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    // Politique stricte pour les créations de compte côté admin
    if !validation::password_strict_valid(plain_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Le mot de passe doit contenir au moins 8 caractères, une majuscule et un chiffre"
        }));
    }

    let password_hash = match password::hash_password(plain_password) {
        Ok(hash) => hash,
        Err(e) => return hash_failure(e),
    };

    // Gestion simplifiée des rôles : tous ont ROLE_USER, certains ont aussi ROLE_ADMIN
    let mut roles = vec![ROLE_USER];
    if body.is_admin.unwrap_or(false) {
        roles.push(ROLE_ADMIN);
    }

    let new_user = users::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(password_hash),
        roles: Set(serde_json::json!(roles)),
        actif: Set(body.actif.unwrap_or(true)),
        date_creation: Set(Utc::now().naive_utc()),
        date_suppression: Set(None),
        ..Default::default()
    };

    match new_user.insert(db.get_ref()).await {
        Ok(user) => HttpResponse::Created().json(UserResponse::from(&user)),
        Err(e) => db_error(e),
    }
}

/// POST /api/user/admin/update/{id} - Mettre à jour username/rôles (ADMIN)
#[post("/admin/update/{id}")]
pub async fn admin_update_user(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<AdminUpdateUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user_id = path.into_inner();

    let user = match users::Entity::find_by_id(user_id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return db_error(e),
    };

    let mut active: users::ActiveModel = user.clone().into();

    if let Some(new_username) = &body.username {
        match users::Entity::find()
            .filter(users::Column::Username.eq(new_username))
            .one(db.get_ref())
            .await
        {
            Ok(Some(existing)) if existing.id != user.id => return username_taken(),
            Ok(_) => {}
            Err(e) => return db_error(e),
        }
        active.username = Set(new_username.clone());
    }

    if let Some(roles) = &body.roles {
        active.roles = Set(serde_json::json!(roles));
    }

    match active.update(db.get_ref()).await {
        Ok(updated) => HttpResponse::Ok().json(UserResponse::from(&updated)),
        Err(e) => db_error(e),
    }
}

/// POST /api/user/admin/toggle-status/{id} - Activer/désactiver (ADMIN)
#[post("/admin/toggle-status/{id}")]
pub async fn admin_toggle_user_status(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match users::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return db_error(e),
    };

    let new_status = !user.actif;
    let mut active: users::ActiveModel = user.into();
    active.actif = Set(new_status);

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Statut de l'utilisateur modifié avec succès",
            "actif": new_status,
        })),
        Err(e) => db_error(e),
    }
}

/// POST /api/user/admin/update-roles/{id} - Basculer le rôle admin (ADMIN)
/// ROLE_USER est toujours conservé.
#[post("/admin/update-roles/{id}")]
pub async fn admin_update_user_roles(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match users::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return db_error(e),
    };

    let new_roles = if user.is_admin() {
        vec![ROLE_USER]
    } else {
        vec![ROLE_USER, ROLE_ADMIN]
    };
    let is_now_admin = new_roles.contains(&ROLE_ADMIN);

    let mut active: users::ActiveModel = user.into();
    active.roles = Set(serde_json::json!(new_roles));

    match active.update(db.get_ref()).await {
        Ok(updated) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Statut administrateur basculé avec succès",
            "roles": updated.role_names(),
            "isAdmin": is_now_admin,
        })),
        Err(e) => db_error(e),
    }
}

/// DELETE /api/user/admin/{id} - Suppression logique (ADMIN)
#[delete("/admin/{id}")]
pub async fn admin_delete_user(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match users::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return db_error(e),
    };

    let mut active: users::ActiveModel = user.into();
    active.actif = Set(false);
    active.date_suppression = Set(Some(Utc::now().naive_utc()));

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Utilisateur supprimé avec succès"
        })),
        Err(e) => db_error(e),
    }
}

/// GET /api/user/{id} - Projection publique d'un utilisateur
#[get("/{id}")]
pub async fn get_user_by_id(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match users::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => HttpResponse::Ok().json(UserResponse::from(&user)),
        Ok(None) => user_not_found(),
        Err(e) => db_error(e),
    }
}

/// POST /api/user/ - Créer un compte, variante à politique stricte (PUBLIC)
#[post("/")]
pub async fn create_user(
    body: web::Json<CreateUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (username, plain_password) = match (&body.username, &body.password) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Username et mot de passe requis"
            }));
        }
    };

    match users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => return username_taken(),
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    if !validation::password_strict_valid(plain_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Le mot de passe doit contenir au moins 8 caractères, une majuscule et un chiffre"
        }));
    }

    let password_hash = match password::hash_password(plain_password) {
        Ok(hash) => hash,
        Err(e) => return hash_failure(e),
    };

    let new_user = users::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(password_hash),
        roles: Set(serde_json::json!([ROLE_USER])),
        actif: Set(true),
        date_creation: Set(Utc::now().naive_utc()),
        date_suppression: Set(None),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => return db_error(e),
    };

    let token = match jwt::generate_token(user.id, &user.username, &user.role_names()) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Échec de génération du token: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur interne du serveur"
            }));
        }
    };

    HttpResponse::Created().json(serde_json::json!({
        "id": user.id,
        "username": user.username,
        "roles": user.role_names(),
        "token": token,
    }))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    // Les routes littérales sont enregistrées avant "/{id}"
    cfg.service(
        web::scope("/user")
            .service(change_username)
            .service(reset_password)
            .service(admin_reset_password)
            .service(admin_list_users)
            .service(admin_create_user)
            .service(admin_update_user)
            .service(admin_toggle_user_status)
            .service(admin_update_user_roles)
            .service(admin_delete_user)
            .service(get_user_by_id)
            .service(create_user),
    );
}
