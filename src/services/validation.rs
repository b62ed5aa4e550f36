use chrono::NaiveDate;
use serde::Deserialize;

use crate::{error::AppError, models::trip::Mood};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Planner form exactly as submitted. Every field is optional so that a
/// missing field is reported as a validation error instead of an extractor
/// rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripForm {
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub travelers: Option<String>,
    pub budget: Option<String>,
    pub mood: Option<String>,
    pub preferences: Option<String>,
}

impl TripForm {
    /// Stores a submitted field by its form name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "destination" => &mut self.destination,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            "travelers" => &mut self.travelers,
            "budget" => &mut self.budget,
            "mood" => &mut self.mood,
            "preferences" => &mut self.preferences,
            _ => return,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub budget: f64,
    pub mood: Mood,
    pub preferences: Option<String>,
}

impl TripRequest {
    /// Both endpoints count: June 1st to June 5th is five days.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

const MSG_DESTINATION: &str = "Destination is required.";
const MSG_FORMAT: &str = "Invalid date, number, or budget format.";
const MSG_PAST_START: &str = "Start date cannot be in the past.";
const MSG_END_ORDER: &str = "End date must be after start date.";
const MSG_TRAVELERS: &str = "Number of travelers must be at least 1.";
const MSG_BUDGET: &str = "Budget must be greater than 0.";

/// Checks the form against `today` and returns the first problem found.
pub fn validate(form: &TripForm, today: NaiveDate) -> Result<TripRequest, AppError> {
    let destination = normalize_optional(form.destination.as_deref())
        .ok_or_else(|| AppError::Validation(MSG_DESTINATION.into()))?;

    let (start_date, end_date, travelers, budget) =
        parse_fields(form).ok_or_else(|| AppError::Validation(MSG_FORMAT.into()))?;

    if start_date < today {
        return Err(AppError::Validation(MSG_PAST_START.into()));
    }
    if end_date <= start_date {
        return Err(AppError::Validation(MSG_END_ORDER.into()));
    }
    if travelers < 1 {
        return Err(AppError::Validation(MSG_TRAVELERS.into()));
    }
    if budget <= 0.0 {
        return Err(AppError::Validation(MSG_BUDGET.into()));
    }

    Ok(TripRequest {
        destination,
        start_date,
        end_date,
        travelers: travelers as u32,
        budget,
        mood: Mood::from_label(form.mood.as_deref()),
        preferences: normalize_optional(form.preferences.as_deref()),
    })
}

fn parse_fields(form: &TripForm) -> Option<(NaiveDate, NaiveDate, i64, f64)> {
    let start = parse_date(form.start_date.as_deref()?)?;
    let end = parse_date(form.end_date.as_deref()?)?;
    let travelers = form.travelers.as_deref()?.trim().parse::<i64>().ok()?;
    if travelers > i64::from(u32::MAX) {
        return None;
    }
    let budget = form
        .budget
        .as_deref()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())?;
    Some((start, end, travelers, budget))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn normalize_optional(input: Option<&str>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
