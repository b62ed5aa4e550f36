use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use tracing::info;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        itinerary::Itinerary,
        trip::{Mood, NewTrip, Trip},
    },
};

/// Row as stored. The itinerary column is JSON text; it is parsed into the
/// typed document here and nowhere else.
#[derive(Debug, FromRow)]
struct TripRow {
    id: i64,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    travelers: i64,
    budget: f64,
    mood: String,
    preferences: Option<String>,
    itinerary: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for Trip {
    type Error = AppError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        let itinerary = Itinerary::from_json(&row.itinerary).map_err(|source| {
            AppError::CorruptRecord {
                id: row.id,
                source,
            }
        })?;
        Ok(Trip {
            id: row.id,
            destination: row.destination,
            start_date: row.start_date,
            end_date: row.end_date,
            travelers: u32::try_from(row.travelers).unwrap_or(1),
            budget: row.budget,
            mood: Mood::from_label(Some(&row.mood)),
            preferences: row.preferences,
            itinerary,
            created_at: row.created_at,
        })
    }
}

const SELECT_TRIP: &str = "SELECT id, destination, start_date, end_date, travelers, budget, \
     mood, preferences, itinerary, created_at FROM trips";

#[derive(Clone)]
pub struct TripStore {
    pool: DbPool,
}

impl TripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Inserts a trip and returns its new id.
    pub async fn create(&self, trip: &NewTrip) -> Result<i64, AppError> {
        let itinerary = trip.itinerary.to_json().map_err(anyhow::Error::from)?;
        let result = sqlx::query(
            "INSERT INTO trips \
             (destination, start_date, end_date, travelers, budget, mood, preferences, itinerary, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(i64::from(trip.travelers))
        .bind(trip.budget)
        .bind(trip.mood.as_str())
        .bind(trip.preferences.as_deref())
        .bind(itinerary)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(trip_id = id, destination = %trip.destination, "trip created");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Trip, AppError> {
        let row = sqlx::query_as::<_, TripRow>(&format!("{SELECT_TRIP} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)?;
        Trip::try_from(row)
    }

    /// All trips, newest first.
    pub async fn list(&self) -> Result<Vec<Trip>, AppError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{SELECT_TRIP} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Trip::try_from).collect()
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        info!(trip_id = id, "trip deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trips")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, run_migrations};
    use crate::models::itinerary::RiskAlert;
    use tempfile::TempDir;

    async fn store() -> (TripStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let url = format!("sqlite://{}", dir.path().join("trips.sqlite").to_string_lossy());
        let pool = init_pool(&url).await.expect("pool");
        run_migrations(&pool).await.expect("migrations");
        (TripStore::new(pool), dir)
    }

    fn new_trip(destination: &str) -> NewTrip {
        let mut itinerary = Itinerary::default();
        itinerary.trip_summary.destination = destination.to_string();
        itinerary.risk_alert = Some(RiskAlert {
            level: "Low".into(),
            details: "Sunny".into(),
        });
        itinerary.quick_insights = vec!["Book ahead".into()];
        NewTrip {
            destination: destination.to_string(),
            start_date: NaiveDate::from_ymd_opt(2030, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
            travelers: 2,
            budget: 1200.0,
            mood: Mood::Romantic,
            preferences: Some("sea view".into()),
            itinerary,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (store, _dir) = store().await;
        let input = new_trip("Santorini");
        let id = store.create(&input).await.unwrap();

        let trip = store.get(id).await.unwrap();
        assert_eq!(trip.destination, "Santorini");
        assert_eq!(trip.start_date, input.start_date);
        assert_eq!(trip.mood, Mood::Romantic);
        assert_eq!(trip.preferences.as_deref(), Some("sea view"));
        assert_eq!(trip.itinerary, input.itinerary);
    }

    #[tokio::test]
    async fn ids_are_sequential_and_list_is_newest_first() {
        let (store, _dir) = store().await;
        let first = store.create(&new_trip("Porto")).await.unwrap();
        let second = store.create(&new_trip("Seville")).await.unwrap();
        assert!(second > first);

        let listed: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|trip| trip.destination)
            .collect();
        assert_eq!(listed, vec!["Seville".to_string(), "Porto".to_string()]);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (store, _dir) = store().await;
        assert!(matches!(store.delete(42).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn deleted_trip_is_gone() {
        let (store, _dir) = store().await;
        let id = store.create(&new_trip("Tallinn")).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound)));
        assert!(matches!(store.delete(id).await, Err(AppError::NotFound)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unreadable_itinerary_is_reported() {
        let (store, _dir) = store().await;
        let id = store.create(&new_trip("Riga")).await.unwrap();
        sqlx::query("UPDATE trips SET itinerary = 'not json' WHERE id = ?")
            .bind(id)
            .execute(store.pool())
            .await
            .unwrap();
        assert!(matches!(
            store.get(id).await,
            Err(AppError::CorruptRecord { .. })
        ));
    }
}
