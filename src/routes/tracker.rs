use actix_web::{HttpResponse, get, guard, post, web};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::dto::TrackerResponse;
use crate::models::emotion::Entity as Emotion;
use crate::models::tracker;
use crate::routes::db_error;
use crate::services::tracker_service::TrackerService;
use crate::utils::validation;

// DTO de création : emotion et datetime obligatoires
#[derive(Deserialize)]
pub struct CreateTrackerRequest {
    pub emotion: Option<i32>,
    pub datetime: Option<String>,
    pub commentaire: Option<String>,
}

// DTO de mise à jour partielle
#[derive(Deserialize)]
pub struct UpdateTrackerRequest {
    pub emotion: Option<i32>,
    pub datetime: Option<String>,
    pub commentaire: Option<String>,
}

fn tracker_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Tracker non trouvé"
    }))
}

fn emotion_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Emotion non trouvée"
    }))
}

fn to_responses(trackers: Vec<tracker::Model>) -> Vec<TrackerResponse> {
    trackers.iter().map(TrackerResponse::from).collect()
}

/// GET /api/tracker/me - Mes trackers actifs (PROTÉGÉE)
#[get("/me")]
pub async fn get_my_trackers(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match TrackerService::find_active_by_user(db.get_ref(), auth_user.user_id).await {
        Ok(trackers) => HttpResponse::Ok().json(to_responses(trackers)),
        Err(e) => db_error(e),
    }
}

/// POST /api/tracker/me/date/{date} - Mes trackers d'une journée (PROTÉGÉE)
/// La date doit être au format strict YYYY-MM-DD et calendaire valide.
#[post("/me/date/{date}")]
pub async fn get_my_trackers_by_date(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let day = match validation::parse_day(&path.into_inner()) {
        Some(day) => day,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Format de date invalide, utilisez YYYY-MM-DD"
            }));
        }
    };

    let (start, end) = TrackerService::day_bounds(day);
    match TrackerService::find_by_user_and_range(db.get_ref(), auth_user.user_id, start, end).await
    {
        Ok(trackers) => HttpResponse::Ok().json(to_responses(trackers)),
        Err(e) => db_error(e),
    }
}

/// GET /api/tracker/me/month/{year}/{month} - Mes trackers d'un mois (PROTÉGÉE)
/// Les segments sont parsés à la main : un segment non numérique reçoit
/// la même 400 qu'un mois hors calendrier.
pub async fn get_my_trackers_by_month(
    auth_user: AuthUser,
    path: web::Path<(String, String)>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (year_raw, month_raw) = path.into_inner();

    let bounds = year_raw
        .parse::<i32>()
        .ok()
        .zip(month_raw.parse::<u32>().ok())
        .and_then(|(year, month)| TrackerService::month_bounds(year, month));

    let (start, end) = match bounds {
        Some(bounds) => bounds,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Mois ou année invalide"
            }));
        }
    };

    match TrackerService::find_by_user_and_range(db.get_ref(), auth_user.user_id, start, end).await
    {
        Ok(trackers) => HttpResponse::Ok().json(to_responses(trackers)),
        Err(e) => db_error(e),
    }
}

/// GET /api/tracker/{id} - Un tracker par son id (PROTÉGÉE)
/// La lecture est limitée au propriétaire, comme l'update et le delete.
#[get("/{id}")]
pub async fn get_tracker_by_id(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let tracker = match tracker::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(tracker)) => tracker,
        Ok(None) => return tracker_not_found(),
        Err(e) => return db_error(e),
    };

    if tracker.user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "message": "Vous ne pouvez pas consulter ce tracker"
        }));
    }

    HttpResponse::Ok().json(TrackerResponse::from(&tracker))
}

/// POST /api/tracker - Enregistrer une humeur (PROTÉGÉE)
pub async fn create_tracker(
    auth_user: AuthUser,
    body: web::Json<CreateTrackerRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (emotion_id, datetime_str) = match (body.emotion, &body.datetime) {
        (Some(emotion_id), Some(datetime)) => (emotion_id, datetime),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Emotion et datetime sont requis"
            }));
        }
    };

    // L'émotion doit exister avant toute écriture
    match Emotion::find_by_id(emotion_id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
        Ok(None) => return emotion_not_found(),
        Err(e) => return db_error(e),
    }

    let datetime = match validation::parse_datetime(datetime_str) {
        Some(datetime) => datetime,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Format de date invalide"
            }));
        }
    };

    let new_tracker = tracker::ActiveModel {
        datetime: Set(datetime),
        commentaire: Set(body.commentaire.clone()),
        actif: Set(true),
        user_id: Set(auth_user.user_id),
        emotion_id: Set(emotion_id),
        ..Default::default()
    };

    match new_tracker.insert(db.get_ref()).await {
        Ok(created) => HttpResponse::Created().json(TrackerResponse::from(&created)),
        Err(e) => db_error(e),
    }
}

/// POST /api/tracker/{id} - Mise à jour partielle (PROTÉGÉE, propriétaire)
/// Un tracker inactif n'est plus modifiable, même par son propriétaire.
pub async fn update_tracker(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateTrackerRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let existing = match tracker::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(tracker)) => tracker,
        Ok(None) => return tracker_not_found(),
        Err(e) => return db_error(e),
    };

    if !existing.actif {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Tracker inactif, impossible de le modifier"
        }));
    }

    if existing.user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "message": "Vous ne pouvez pas modifier ce tracker"
        }));
    }

    let mut active: tracker::ActiveModel = existing.into();

    if let Some(emotion_id) = body.emotion {
        match Emotion::find_by_id(emotion_id).one(db.get_ref()).await {
            Ok(Some(_)) => active.emotion_id = Set(emotion_id),
            Ok(None) => return emotion_not_found(),
            Err(e) => return db_error(e),
        }
    }

    if let Some(datetime_str) = &body.datetime {
        match validation::parse_datetime(datetime_str) {
            Some(datetime) => active.datetime = Set(datetime),
            None => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Format de date invalide"
                }));
            }
        }
    }

    if let Some(commentaire) = &body.commentaire {
        active.commentaire = Set(Some(commentaire.clone()));
    }

    match active.update(db.get_ref()).await {
        Ok(updated) => HttpResponse::Ok().json(TrackerResponse::from(&updated)),
        Err(e) => db_error(e),
    }
}

/// DELETE /api/tracker/{id} - Suppression logique (PROTÉGÉE, propriétaire)
pub async fn delete_tracker(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let existing = match tracker::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
    {
        Ok(Some(tracker)) => tracker,
        Ok(None) => return tracker_not_found(),
        Err(e) => return db_error(e),
    };

    if existing.user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "message": "Vous ne pouvez pas supprimer ce tracker"
        }));
    }

    let mut active: tracker::ActiveModel = existing.into();
    active.actif = Set(false);

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => db_error(e),
    }
}

pub fn tracker_routes(cfg: &mut web::ServiceConfig) {
    // Les routes /me sont enregistrées avant "/{id}"
    cfg.service(
        web::scope("/tracker")
            .service(get_my_trackers)
            .service(get_my_trackers_by_date)
            .service(
                web::resource("/me/month/{year}/{month}")
                    .name("get_my_trackers_by_month")
                    .guard(guard::Get())
                    .to(get_my_trackers_by_month),
            )
            .service(
                web::resource("")
                    .name("create_tracker")
                    .guard(guard::Post())
                    .to(create_tracker),
            )
            .service(get_tracker_by_id)
            .service(
                web::resource("/{id}")
                    .name("update_tracker")
                    .guard(guard::Post())
                    .to(update_tracker),
            )
            .service(
                web::resource("/{id}")
                    .name("delete_tracker")
                    .guard(guard::Delete())
                    .to(delete_tracker),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::models::emotion;

    fn tracker_row(user_id: i32, actif: bool) -> tracker::Model {
        tracker::Model {
            id: 7,
            datetime: NaiveDate::from_ymd_opt(2024, 5, 12)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            commentaire: None,
            actif,
            user_id,
            emotion_id: 3,
        }
    }

    fn caller(user_id: i32) -> AuthUser {
        AuthUser {
            user_id,
            username: "marie_dupont".to_string(),
            roles: vec!["ROLE_USER".to_string()],
        }
    }

    fn update_body(commentaire: &str) -> web::Json<UpdateTrackerRequest> {
        web::Json(UpdateTrackerRequest {
            emotion: None,
            datetime: None,
            commentaire: Some(commentaire.to_string()),
        })
    }

    #[actix_web::test]
    async fn test_update_foreign_tracker_forbidden() {
        // Le tracker appartient à l'utilisateur 2, l'appelant est le 1
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracker_row(2, true)]])
            .into_connection();

        let resp = update_tracker(
            caller(1),
            web::Path::from(7),
            update_body("intrus"),
            web::Data::new(db),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_update_inactive_tracker_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracker_row(1, false)]])
            .into_connection();

        let resp = update_tracker(
            caller(1),
            web::Path::from(7),
            update_body("trop tard"),
            web::Data::new(db),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_inactive_check_precedes_ownership_check() {
        // Tracker inactif ET étranger : la 400 prime sur la 403
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracker_row(2, false)]])
            .into_connection();

        let resp = update_tracker(
            caller(1),
            web::Path::from(7),
            update_body("intrus"),
            web::Data::new(db),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_foreign_tracker_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracker_row(2, true)]])
            .into_connection();

        let resp = delete_tracker(caller(1), web::Path::from(7), web::Data::new(db)).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_create_with_unknown_emotion_writes_nothing() {
        // Seule réponse préparée : la recherche d'émotion, vide
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<emotion::Model>::new()])
            .into_connection();

        let body = web::Json(CreateTrackerRequest {
            emotion: Some(42),
            datetime: Some("2024-05-12T14:30:00".to_string()),
            commentaire: None,
        });
        let db = web::Data::new(db);
        let resp = create_tracker(caller(1), body, db.clone()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // Une seule requête exécutée : aucun INSERT n'a suivi
        let db = std::sync::Arc::try_unwrap(db.into_inner()).unwrap();
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[actix_web::test]
    async fn test_month_route_rejects_non_numeric_segments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let path = web::Path::from(("2024".to_string(), "abc".to_string()));
        let resp = get_my_trackers_by_month(caller(1), path, web::Data::new(db)).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_month_route_rejects_out_of_range_month() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let path = web::Path::from(("2024".to_string(), "13".to_string()));
        let resp = get_my_trackers_by_month(caller(1), path, web::Data::new(db)).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
