use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};

use crate::models::users::ROLE_ADMIN;
use crate::utils::jwt;

/// Utilisateur authentifié, extrait du token JWT porté par la requête.
/// Utilisé comme extracteur dans les routes protégées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "message": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_str = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
        {
            Some(s) => s,
            None => return ready(Err(unauthorized("Token d'authentification manquant"))),
        };

        // 2. Extraire le token (format: "Bearer <token>")
        let token = match auth_str.strip_prefix("Bearer ") {
            Some(token) => token,
            None => {
                return ready(Err(unauthorized(
                    "Format d'autorisation invalide (attendu: Bearer <token>)",
                )));
            }
        };

        // 3. Vérifier le token JWT
        let claims = match jwt::verify_token(token) {
            Ok(claims) => claims,
            Err(_) => return ready(Err(unauthorized("Token invalide ou expiré"))),
        };

        ready(Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            roles: claims.roles,
        }))
    }
}

/// Utilisateur authentifié avec le rôle ROLE_ADMIN.
/// Centralise le contrôle d'accès des routes d'administration : une
/// requête sans rôle admin est rejetée en 403 avant le handler.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let result = match AuthUser::from_request(req, payload).into_inner() {
            Ok(user) if user.is_admin() => Ok(AdminUser(user)),
            Ok(_) => {
                let response = HttpResponse::Forbidden().json(serde_json::json!({
                    "message": "Accès réservé aux administrateurs"
                }));
                Err(actix_web::error::InternalError::from_response("", response).into())
            }
            Err(e) => Err(e),
        };
        ready(result)
    }
}
