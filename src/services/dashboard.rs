//! Projection of a stored trip into what the dashboard and the PDF show.
//!
//! Budget percentages and costs always come from [`budget::allocate`]; the
//! model's own distribution table only contributes suggestion text.

use crate::{
    models::{
        itinerary::{CrowdForecast, Hotel, RiskAlert, TrendingPlace},
        trip::Trip,
    },
    services::{
        budget::{self, format_currency, Category},
        validation::DATE_FORMAT,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub destination: String,
    pub dates: String,
    pub travelers: u32,
    pub budget: String,
    pub mood: String,
    pub overall_theme: String,
    pub day_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayPlanView {
    pub day: String,
    pub activities: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRow {
    pub category: String,
    pub percentage: String,
    pub cost: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBudgetRow {
    pub day: String,
    pub activities: String,
    pub estimated_spend: String,
    /// Amounts in `Category::ALL` order; blank where the model gave none.
    pub amounts: Vec<String>,
    pub recommendations: String,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub trip_id: i64,
    pub summary: SummaryView,
    pub trending: Vec<TrendingPlace>,
    pub risk: Option<RiskAlert>,
    pub hotels: Vec<Hotel>,
    pub crowd: Option<CrowdForecast>,
    pub insights: Vec<String>,
    pub daily_plan: Vec<DayPlanView>,
    pub notes: Vec<String>,
    pub daily_budget: Vec<DayBudgetRow>,
    pub budget_rows: Vec<BudgetRow>,
    pub budget_overview: String,
    pub optimization_tips: Vec<String>,
}

impl DashboardView {
    pub fn from_trip(trip: &Trip) -> Self {
        let itinerary = &trip.itinerary;
        let tracking = &itinerary.budget_tracking;

        let summary = SummaryView {
            destination: trip.destination.clone(),
            dates: format!(
                "{} to {}",
                trip.start_date.format(DATE_FORMAT),
                trip.end_date.format(DATE_FORMAT)
            ),
            travelers: trip.travelers,
            budget: format_currency(trip.budget),
            mood: trip.mood.to_string(),
            overall_theme: itinerary.trip_summary.overall_theme.clone(),
            day_count: trip.day_count(),
        };

        let budget_rows = budget::allocate(trip.budget, trip.mood)
            .lines
            .into_iter()
            .map(|line| BudgetRow {
                category: line.category.to_string(),
                percentage: line.percentage_display(),
                cost: line.cost_display(),
                suggestion: tracking
                    .suggestion_for(line.category.as_str())
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        let daily_budget = itinerary
            .daily_budget_plan
            .iter()
            .map(|day| DayBudgetRow {
                day: day.day.clone(),
                activities: day.activities.clone(),
                estimated_spend: day.estimated_spend.clone(),
                amounts: Category::ALL
                    .iter()
                    .map(|category| {
                        day.category_breakdown
                            .get_category(category.as_str())
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect(),
                recommendations: day.recommendations.clone(),
            })
            .collect();

        Self {
            trip_id: trip.id,
            summary,
            trending: itinerary.trending_places.clone(),
            risk: itinerary.risk_alert.clone(),
            hotels: itinerary.hotel_recommendations.clone(),
            crowd: itinerary.overcrowd_predictor.clone(),
            insights: itinerary.quick_insights.clone(),
            daily_plan: itinerary
                .daily_plan
                .iter()
                .map(|(day, activities)| DayPlanView {
                    day: day.to_string(),
                    activities: activities.to_string(),
                })
                .collect(),
            notes: itinerary.important_notes.clone(),
            daily_budget,
            budget_rows,
            budget_overview: tracking.overview.clone(),
            optimization_tips: tracking.optimization_tips.clone(),
        }
    }

    pub fn has_budget_tracking(&self) -> bool {
        !self.budget_overview.is_empty() || !self.optimization_tips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{itinerary::Itinerary, trip::Mood};
    use chrono::{NaiveDate, Utc};

    fn trip(itinerary: Itinerary) -> Trip {
        Trip {
            id: 7,
            destination: "Cusco".into(),
            start_date: NaiveDate::from_ymd_opt(2030, 8, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 8, 13).unwrap(),
            travelers: 2,
            budget: 1000.0,
            mood: Mood::Adventurous,
            preferences: None,
            itinerary,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn budget_rows_come_from_the_allocator() {
        let itinerary: Itinerary = serde_json::from_value(serde_json::json!({
            "budget_tracking": {
                "overview": "Tight but doable",
                "distribution_table": [
                    {"category": "Activities", "percentage": "90%", "estimated_cost": "$900",
                     "suggestions": "Book the trek early"}
                ]
            }
        }))
        .unwrap();
        let view = DashboardView::from_trip(&trip(itinerary));

        let activities = &view.budget_rows[3];
        assert_eq!(activities.category, "Activities");
        assert_eq!(activities.percentage, "30%");
        assert_eq!(activities.cost, "$300.00");
        assert_eq!(activities.suggestion, "Book the trek early");
        assert_eq!(view.budget_rows[0].suggestion, "");
        assert!(view.has_budget_tracking());
    }

    #[test]
    fn summary_uses_the_trip_record() {
        let view = DashboardView::from_trip(&trip(Itinerary::default()));
        assert_eq!(view.summary.dates, "2030-08-10 to 2030-08-13");
        assert_eq!(view.summary.budget, "$1000.00");
        assert_eq!(view.summary.mood, "Adventurous");
        assert_eq!(view.summary.day_count, 4);
        assert!(view.trending.is_empty());
        assert!(view.risk.is_none());
        assert!(!view.has_budget_tracking());
    }

    #[test]
    fn day_budget_amounts_follow_category_order() {
        let itinerary: Itinerary = serde_json::from_value(serde_json::json!({
            "daily_budget_plan": [{
                "day": "Day 1",
                "estimated_spend": "$250",
                "category_breakdown": {"Food": "$50", "Accommodation": "$60", "Misc": "$5"}
            }]
        }))
        .unwrap();
        let view = DashboardView::from_trip(&trip(itinerary));
        assert_eq!(view.daily_budget[0].amounts, vec!["$60", "$50", "", "", "$5"]);
    }
}
