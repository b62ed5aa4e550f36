use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{response::IntoResponse, routing::get, Router};
use chrono::Local;

use crate::{models::trip::Mood, services::validation::DATE_FORMAT, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/planner", get(planner))
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate;

async fn landing() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(LandingTemplate)
}

#[derive(Template)]
#[template(path = "planner.html")]
struct PlannerTemplate {
    today: String,
    moods: Vec<&'static str>,
}

async fn planner() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(PlannerTemplate {
        today: Local::now().date_naive().format(DATE_FORMAT).to_string(),
        moods: Mood::ALL.iter().map(Mood::as_str).collect(),
    })
}
