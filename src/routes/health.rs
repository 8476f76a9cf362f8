use actix_web::{HttpResponse, get};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    time: DateTime<Utc>,
}

/// GET /api/health - Sonde de vie pour le front et le déploiement (PUBLIC)
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now(),
    })
}
