//! The structured itinerary document.
//!
//! The model's JSON is loosely typed: ratings arrive as numbers or strings,
//! sections go missing or come back as `null`. All of that is absorbed here,
//! once, when the document is deserialized. Everything downstream works with
//! plain `String`/`Vec` fields and never re-derives defaults.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnNull};

pub const SCHEMA_VERSION: u32 = 1;

fn current_version() -> u32 {
    SCHEMA_VERSION
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub trip_summary: TripSummary,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub trending_places: Vec<TrendingPlace>,
    #[serde(default)]
    pub risk_alert: Option<RiskAlert>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub hotel_recommendations: Vec<Hotel>,
    #[serde(default)]
    pub overcrowd_predictor: Option<CrowdForecast>,
    #[serde(default, deserialize_with = "text_list::deserialize")]
    pub quick_insights: Vec<String>,
    #[serde(default)]
    pub daily_plan: TextMap,
    #[serde(default, deserialize_with = "text_list::deserialize")]
    pub important_notes: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub daily_budget_plan: Vec<DayBudget>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub budget_tracking: BudgetTracking,
}

impl Default for Itinerary {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            trip_summary: TripSummary::default(),
            trending_places: Vec::new(),
            risk_alert: None,
            hotel_recommendations: Vec::new(),
            overcrowd_predictor: None,
            quick_insights: Vec::new(),
            daily_plan: TextMap::default(),
            important_notes: Vec::new(),
            daily_budget_plan: Vec::new(),
            budget_tracking: BudgetTracking::default(),
        }
    }
}

impl Itinerary {
    /// Parses the stored JSON form of a document.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripSummary {
    #[serde(deserialize_with = "text::deserialize")]
    pub destination: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub dates: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub travelers: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub budget: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub mood: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub overall_theme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingPlace {
    #[serde(deserialize_with = "text::deserialize")]
    pub place: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub description: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub rating: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAlert {
    #[serde(deserialize_with = "text::deserialize")]
    pub level: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotel {
    #[serde(deserialize_with = "text::deserialize")]
    pub name: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub price_range: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub rating: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub highlight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdForecast {
    #[serde(deserialize_with = "text::deserialize")]
    pub level: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayBudget {
    #[serde(deserialize_with = "text::deserialize")]
    pub day: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub activities: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub estimated_spend: String,
    pub category_breakdown: TextMap,
    #[serde(deserialize_with = "text::deserialize")]
    pub recommendations: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetTracking {
    #[serde(deserialize_with = "text::deserialize")]
    pub overview: String,
    #[serde_as(as = "DefaultOnNull")]
    pub distribution_table: Vec<DistributionEntry>,
    #[serde(deserialize_with = "text_list::deserialize")]
    pub optimization_tips: Vec<String>,
}

impl BudgetTracking {
    pub fn is_empty(&self) -> bool {
        self.overview.is_empty()
            && self.distribution_table.is_empty()
            && self.optimization_tips.is_empty()
    }

    /// Suggestion text the model attached to a category, matched
    /// by [`names_category`].
    pub fn suggestion_for(&self, category: &str) -> Option<&str> {
        self.distribution_table
            .iter()
            .find(|entry| names_category(&entry.category, category))
            .map(|entry| entry.suggestions.as_str())
            .filter(|text| !text.is_empty())
    }
}

/// Whether a model-supplied label refers to `category`: equal ignoring
/// case, or a prefix of at least four letters ("Misc", "Accom").
pub fn names_category(label: &str, category: &str) -> bool {
    let label = label.trim().to_ascii_lowercase();
    let category = category.to_ascii_lowercase();
    label == category || (label.len() >= 4 && category.starts_with(&label))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionEntry {
    #[serde(deserialize_with = "text::deserialize")]
    pub category: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub percentage: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub estimated_cost: String,
    #[serde(deserialize_with = "text::deserialize")]
    pub suggestions: String,
}

/// A JSON object of label → text that keeps document order, so "Day 10"
/// stays after "Day 9".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMap(Vec<(String, String)>);

impl TextMap {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Value stored under a budget category label, using the same matching
    /// as [`BudgetTracking::suggestion_for`]. An exact key wins over a prefix.
    pub fn get_category(&self, category: &str) -> Option<&str> {
        self.get(category).or_else(|| {
            self.0
                .iter()
                .find(|(k, _)| names_category(k, category))
                .map(|(_, v)| v.as_str())
        })
    }
}

impl Serialize for TextMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TextMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextMapVisitor;

        impl<'de> Visitor<'de> for TextMapVisitor {
            type Value = TextMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of text values or null")
            }

            fn visit_unit<E>(self) -> Result<TextMap, E> {
                Ok(TextMap::default())
            }

            fn visit_none<E>(self) -> Result<TextMap, E> {
                Ok(TextMap::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TextMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    entries.push((key, value_to_text(value)));
                }
                Ok(TextMap(entries))
            }
        }

        deserializer.deserialize_any(TextMapVisitor)
    }
}

/// Renders any scalar the model sends where text is expected.
fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other @ Value::Object(_) => other.to_string(),
    }
}

mod text {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Value::deserialize(deserializer).map(super::value_to_text)
    }
}

mod text_list {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        let items = match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(items
            .into_iter()
            .map(super::value_to_text)
            .filter(|s| !s.is_empty())
            .collect())
    }
}
