use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::itinerary::Itinerary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Relaxed,
    Adventurous,
    Romantic,
    Cultural,
    #[serde(rename = "Budget-Friendly")]
    BudgetFriendly,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Relaxed,
        Mood::Adventurous,
        Mood::Romantic,
        Mood::Cultural,
        Mood::BudgetFriendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Relaxed => "Relaxed",
            Mood::Adventurous => "Adventurous",
            Mood::Romantic => "Romantic",
            Mood::Cultural => "Cultural",
            Mood::BudgetFriendly => "Budget-Friendly",
        }
    }

    /// Lenient parse used for form input and stored rows: anything that is
    /// not a known mood becomes `Relaxed`.
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood '{}'", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "relaxed" => Ok(Mood::Relaxed),
            "adventurous" => Ok(Mood::Adventurous),
            "romantic" => Ok(Mood::Romantic),
            "cultural" => Ok(Mood::Cultural),
            "budget-friendly" => Ok(Mood::BudgetFriendly),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

/// A persisted trip. `itinerary` has already been parsed and defaulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: i64,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub budget: f64,
    pub mood: Mood,
    pub preferences: Option<String>,
    pub itinerary: Itinerary,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn preferences_text(&self) -> &str {
        self.preferences.as_deref().unwrap_or("")
    }

    /// `trip_Costa_Rica.pdf` for "Costa Rica".
    pub fn export_filename(&self) -> String {
        format!("trip_{}.pdf", self.destination.replace(' ', "_"))
    }
}

/// Everything needed to insert a trip; the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub budget: f64,
    pub mood: Mood,
    pub preferences: Option<String>,
    pub itinerary: Itinerary,
}
