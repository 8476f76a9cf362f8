use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::env;

/// Durée de vie des tokens : 1 heure
pub const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub username: String,
    pub roles: Vec<String>,
    pub exp: i64, // expiration timestamp
}

/// Récupère la clé secrète JWT depuis les variables d'environnement
fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET absent du .env, clé par défaut utilisée (NON SÉCURISÉ)");
        "default-insecure-key-change-this".to_string()
    })
}

/// Génère un JWT pour un utilisateur (id, username et rôles dans le payload)
pub fn generate_token(user_id: i32, username: &str, roles: &[String]) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        roles: roles.to_vec(),
        exp: expiration,
    };

    let secret = get_jwt_secret();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let user_id = 123;
        let username = "testuser";
        let roles = vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()];

        let token = generate_token(user_id, username, &roles).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, username);
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_token_expires_in_one_hour() {
        let token = generate_token(1, "testuser", &["ROLE_USER".to_string()]).unwrap();
        let claims = verify_token(&token).unwrap();

        let expected = Utc::now().timestamp() + 3600;
        // Marge de quelques secondes pour l'exécution du test
        assert!((claims.exp - expected).abs() < 10);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here");
        assert!(result.is_err());
    }
}
