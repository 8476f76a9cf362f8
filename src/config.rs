use std::env;

/// Configuration applicative lue depuis l'environnement (.env inclus)
#[derive(Clone)]
pub struct AppConfig {
    /// Adresse d'écoute du serveur HTTP
    pub bind_addr: String,
    /// Racine des fichiers publics, les uploads vont dans <upload_dir>/uploads
    pub upload_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./public".to_string()),
        }
    }
}
