mod config;
mod db;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env();

    info!("Connexion à la base de données...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    info!("Base de données connectée");

    info!("Démarrage du serveur sur http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    let uploads_dir = format!("{}/uploads", config.upload_dir);
    std::fs::create_dir_all(&uploads_dir)?;

    // DatabaseConnection n'est pas Clone quand la feature "mock" est activée :
    // on partage la connexion via web::Data (Arc) plutôt que de la cloner.
    let db = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(web::Data::new(config.clone()))
            // Les images uploadées sont servies telles quelles
            .service(Files::new("/uploads", uploads_dir.clone()))
            .configure(routes::configure_routes)
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
