use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::AppError,
    models::trip::Trip,
    services::{
        budget::format_currency,
        dashboard::DashboardView,
        export, planner,
        validation::{TripForm, DATE_FORMAT},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate))
        .route("/dashboard/:trip_id", get(dashboard))
        .route("/trips", get(trips_list))
        .route("/trip/:trip_id", get(trip_detail))
        .route("/export/:trip_id", get(export_pdf))
        .route("/delete_trip/:trip_id", post(delete_trip))
}

#[derive(Serialize)]
struct GenerateResponse {
    trip_id: i64,
}

/// Planner form body. Urlencoded is what the planner page sends; multipart
/// `FormData` and bodies without a content type are read as well. Anything
/// unreadable is a validation error, so callers always get the JSON envelope.
struct TripFormBody(TripForm);

#[async_trait]
impl<S> FromRequest<S> for TripFormBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with("multipart/form-data")
            });

        if multipart {
            let mut fields = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
            let mut form = TripForm::default();
            while let Some(field) = fields
                .next_field()
                .await
                .map_err(|err| AppError::Validation(err.body_text()))?
            {
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::Validation(err.body_text()))?;
                form.set(&name, value);
            }
            return Ok(Self(form));
        }

        let (mut parts, body) = req.into_parts();
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let Form(form) = Form::<TripForm>::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(form))
    }
}

async fn generate(
    State(state): State<AppState>,
    TripFormBody(form): TripFormBody,
) -> Result<Json<GenerateResponse>, AppError> {
    let today = Local::now().date_naive();
    let trip_id = planner::generate_trip(&state, &form, today).await?;
    Ok(Json(GenerateResponse { trip_id }))
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    view: DashboardView,
}

async fn dashboard(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.get(trip_id).await?;
    Ok(AskamaTemplateResponse::into_response(DashboardTemplate {
        view: DashboardView::from_trip(&trip),
    }))
}

#[derive(Clone)]
struct TripRow {
    id: i64,
    destination: String,
    dates: String,
    travelers: u32,
    budget: String,
    mood: String,
    theme: String,
    created_at: String,
}

impl From<&Trip> for TripRow {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination.clone(),
            dates: format_dates(trip),
            travelers: trip.travelers,
            budget: format_currency(trip.budget),
            mood: trip.mood.to_string(),
            theme: trip.itinerary.trip_summary.overall_theme.clone(),
            created_at: format_timestamp(trip.created_at),
        }
    }
}

#[derive(Template)]
#[template(path = "trips_list.html")]
struct TripsListTemplate {
    trips: Vec<TripRow>,
}

async fn trips_list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trips = state.store.list().await?;
    Ok(AskamaTemplateResponse::into_response(TripsListTemplate {
        trips: trips.iter().map(TripRow::from).collect(),
    }))
}

#[derive(Template)]
#[template(path = "trip_detail.html")]
struct TripDetailTemplate {
    trip: TripRow,
    day_count: i64,
    preferences: String,
    raw_json: String,
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.get(trip_id).await?;
    let raw_json =
        serde_json::to_string_pretty(&trip.itinerary).map_err(|err| AppError::Other(err.into()))?;
    Ok(AskamaTemplateResponse::into_response(TripDetailTemplate {
        trip: TripRow::from(&trip),
        day_count: trip.day_count(),
        preferences: trip.preferences_text().to_string(),
        raw_json,
    }))
}

async fn export_pdf(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Response, AppError> {
    let trip = state.store.get(trip_id).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        trip.export_filename().replace('"', "'")
    );
    let bytes = tokio::task::spawn_blocking(move || export::render_pdf(&trip))
        .await
        .map_err(|err| AppError::Other(err.into()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.delete(trip_id).await?;
    Ok(Json(json!({ "success": true })))
}

fn format_dates(trip: &Trip) -> String {
    format!(
        "{} to {}",
        trip.start_date.format(DATE_FORMAT),
        trip.end_date.format(DATE_FORMAT)
    )
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
