use askama::Template;

use crate::{
    error::AppError,
    models::trip::Mood,
    services::{
        budget::{self, format_currency, Category},
        validation::{TripRequest, DATE_FORMAT},
    },
};

#[derive(Template)]
#[template(path = "prompts/itinerary.txt", escape = "none")]
struct ItineraryPrompt<'a> {
    destination: &'a str,
    start_date: String,
    end_date: String,
    travelers: u32,
    budget: String,
    mood: &'static str,
    preferences: &'a str,
    day_count: i64,
    categories: Vec<&'static str>,
    mood_rules: Vec<MoodRule>,
}

struct MoodRule {
    label: &'static str,
    shares: String,
}

fn mood_rules() -> Vec<MoodRule> {
    Mood::ALL
        .into_iter()
        .map(|mood| MoodRule {
            label: mood.as_str(),
            shares: Category::ALL
                .iter()
                .zip(budget::percentages(mood))
                .map(|(category, pct)| format!("{category} {pct}%"))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

/// Renders the generation instruction for a validated request.
pub fn build_prompt(request: &TripRequest) -> Result<String, AppError> {
    let prompt = ItineraryPrompt {
        destination: &request.destination,
        start_date: request.start_date.format(DATE_FORMAT).to_string(),
        end_date: request.end_date.format(DATE_FORMAT).to_string(),
        travelers: request.travelers,
        budget: format_currency(request.budget),
        mood: request.mood.as_str(),
        preferences: request.preferences.as_deref().unwrap_or(""),
        day_count: request.day_count(),
        categories: Category::ALL.iter().map(Category::as_str).collect(),
        mood_rules: mood_rules(),
    };
    Ok(prompt.render()?)
}
