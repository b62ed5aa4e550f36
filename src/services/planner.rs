use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    error::AppError,
    models::trip::NewTrip,
    services::{
        normalize::normalize_response,
        prompt::build_prompt,
        validation::{validate, TripForm},
    },
    state::AppState,
};

/// Validates the form, asks the model for an itinerary and stores the trip.
/// Nothing is written unless every earlier step succeeded.
pub async fn generate_trip(
    state: &AppState,
    form: &TripForm,
    today: NaiveDate,
) -> Result<i64, AppError> {
    let request = validate(form, today)?;
    debug!(
        destination = %request.destination,
        days = request.day_count(),
        mood = %request.mood,
        "generate_trip: request validated"
    );

    let prompt = build_prompt(&request)?;
    let reply = state.model.generate(&prompt).await.map_err(|err| {
        warn!(model = state.model.name(), kind = err.kind(), error = %err, "model call failed");
        AppError::Model(err)
    })?;
    let itinerary = normalize_response(&reply)?;

    let id = state
        .store
        .create(&NewTrip {
            destination: request.destination,
            start_date: request.start_date,
            end_date: request.end_date,
            travelers: request.travelers,
            budget: request.budget,
            mood: request.mood,
            preferences: request.preferences,
            itinerary,
        })
        .await?;
    info!(trip_id = id, "itinerary generated");
    Ok(id)
}
