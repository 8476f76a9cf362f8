use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::*;

use crate::models::tracker;

pub struct TrackerService;

impl TrackerService {
    /// Bornes d'une journée calendaire : [00:00:00, 23:59:59]
    pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = day.and_hms_opt(0, 0, 0).expect("minuit est toujours valide");
        let end = day
            .and_hms_opt(23, 59, 59)
            .expect("23:59:59 est toujours valide");
        (start, end)
    }

    /// Bornes d'un mois calendaire : du 1er à 00:00:00 au dernier jour
    /// du mois à 23:59:59. None si le couple (année, mois) est invalide.
    pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;

        // Premier jour du mois suivant, moins un jour
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)? - Duration::days(1);

        let start = first_day.and_hms_opt(0, 0, 0)?;
        let end = last_day.and_hms_opt(23, 59, 59)?;
        Some((start, end))
    }

    /// Trackers actifs de l'utilisateur, sans tri particulier
    pub async fn find_active_by_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<tracker::Model>, DbErr> {
        tracker::Entity::find()
            .filter(tracker::Column::UserId.eq(user_id))
            .filter(tracker::Column::Actif.eq(true))
            .all(db)
            .await
    }

    /// Trackers de l'utilisateur dans un intervalle de datetime (bornes
    /// incluses), triés par datetime croissant
    pub async fn find_by_user_and_range(
        db: &DatabaseConnection,
        user_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<tracker::Model>, DbErr> {
        tracker::Entity::find()
            .filter(tracker::Column::UserId.eq(user_id))
            .filter(tracker::Column::Datetime.gte(start))
            .filter(tracker::Column::Datetime.lte(end))
            .order_by_asc(tracker::Column::Datetime)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_day_bounds() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        let (start, end) = TrackerService::day_bounds(day);

        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(start.date(), day);
        assert_eq!(end.date(), day);
    }

    #[test]
    fn test_month_bounds_standard() {
        let (start, end) = TrackerService::month_bounds(2024, 4).unwrap();
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn test_month_bounds_february_leap_year() {
        let (_, end) = TrackerService::month_bounds(2024, 2).unwrap();
        assert_eq!(end.date().day(), 29);

        let (_, end) = TrackerService::month_bounds(2023, 2).unwrap();
        assert_eq!(end.date().day(), 28);
    }

    #[test]
    fn test_month_bounds_december_rollover() {
        let (start, end) = TrackerService::month_bounds(2024, 12).unwrap();
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds_invalid_month() {
        assert!(TrackerService::month_bounds(2024, 0).is_none());
        assert!(TrackerService::month_bounds(2024, 13).is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_user_filters_on_user_and_actif() {
        // Les trackers supprimés logiquement ne sortent pas de cette requête
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<tracker::Model>::new()])
            .into_connection();

        TrackerService::find_active_by_user(&db, 42).await.unwrap();

        let log = db
            .into_transaction_log()
            .iter()
            .flat_map(|t| t.statements())
            .map(|s| s.sql.clone())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(log.contains(r#""user_id""#));
        assert!(log.contains(r#""actif""#));
    }

    #[tokio::test]
    async fn test_find_by_range_is_bounded_and_sorted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<tracker::Model>::new()])
            .into_connection();

        let day = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        let (start, end) = TrackerService::day_bounds(day);
        TrackerService::find_by_user_and_range(&db, 42, start, end)
            .await
            .unwrap();

        let log = db
            .into_transaction_log()
            .iter()
            .flat_map(|t| t.statements())
            .map(|s| s.sql.clone())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(log.contains(r#""datetime" >="#));
        assert!(log.contains(r#""datetime" <="#));
        assert!(log.contains("ORDER BY"));
    }
}
