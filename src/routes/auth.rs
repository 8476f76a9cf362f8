use actix_web::{HttpResponse, post, web};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::models::dto::UserResponse;
use crate::models::users::{self, ROLE_USER};
use crate::routes::db_error;
use crate::utils::validation::{validate_password_basic, validate_username};
use crate::utils::{jwt, password};

// DTO pour la connexion : champs optionnels pour pouvoir répondre
// "Identifiants manquants" plutôt qu'une erreur de désérialisation
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// DTO pour l'inscription
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = validate_username))]
    pub username: String,
    #[validate(custom(function = validate_password_basic))]
    pub password: String,
}

/// Aplatit les erreurs de validation en une liste de messages pour le front
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect()
}

/// Date d'expiration affichée au client, alignée sur la durée de vie du JWT
fn token_expires_at() -> String {
    (Utc::now() + Duration::hours(jwt::TOKEN_TTL_HOURS))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// POST /api/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (username, plain_password) = match (&body.username, &body.password) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Identifiants manquants"
            }));
        }
    };

    // 1. Recherche de l'utilisateur
    let user = match users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Utilisateur non trouvé"
            }));
        }
        Err(e) => return db_error(e),
    };

    // 2. Un compte désactivé est refusé avant toute vérification du mot de passe
    if !user.actif {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "message": "Compte utilisateur désactivé"
        }));
    }

    // 3. Vérification du mot de passe
    match password::verify_password(plain_password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Identifiants invalides"
            }));
        }
        Err(e) => {
            tracing::error!("Erreur de vérification du mot de passe: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur interne du serveur"
            }));
        }
    }

    // 4. Génération du JWT (1 heure)
    let roles = user.role_names();
    let token = match jwt::generate_token(user.id, &user.username, &roles) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Échec de génération du token: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur interne du serveur"
            }));
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Connexion réussie",
        "token": token,
        "expires_at": token_expires_at(),
        "user": UserResponse::from(&user),
    }))
}

/// POST /api/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Valider username et mot de passe (politique basique)
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Données d'inscription invalides",
            "errors": validation_messages(&errors),
        }));
    }

    // 2. Vérifier si le nom d'utilisateur est déjà pris
    match users::Entity::find()
        .filter(users::Column::Username.eq(&body.username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "message": "Nom d'utilisateur déjà pris"
            }));
        }
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    // 3. Hasher le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Échec du hash du mot de passe: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur interne du serveur"
            }));
        }
    };

    // 4. Créer l'utilisateur avec le rôle par défaut
    let new_user = users::ActiveModel {
        username: Set(body.username.clone()),
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

    // 5. Générer le JWT, même forme de réponse que le login
    let roles = user.role_names();
    let token = match jwt::generate_token(user.id, &user.username, &roles) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Échec de génération du token: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur interne du serveur"
            }));
        }
    };

    HttpResponse::Created().json(serde_json::json!({
        "message": "Inscription réussie",
        "token": token,
        "expires_at": token_expires_at(),
        "user": UserResponse::from(&user),
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(register);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_flattened_to_messages() {
        // Username trop court et mot de passe hors politique : deux messages
        let body = RegisterRequest {
            username: "ab".to_string(),
            password: "court".to_string(),
        };
        let errors = body.validate().unwrap_err();
        let messages = validation_messages(&errors);

        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("nom d'utilisateur")));
        assert!(messages.iter().any(|m| m.contains("mot de passe")));
    }

    #[test]
    fn test_valid_registration_data_passes() {
        let body = RegisterRequest {
            username: "marie_dupont".to_string(),
            password: "abc12!".to_string(),
        };
        assert!(body.validate().is_ok());
    }
}
