#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Context;
use async_trait::async_trait;
use tempfile::TempDir;
use wandermate::{
    config::{AppConfig, LlmConfig},
    db::{init_pool, run_migrations},
    services::llm::{LlmError, TextModel},
    state::AppState,
};

pub const ITINERARY_JSON: &str = r#"{
  "trip_summary": {
    "destination": "Lisbon",
    "dates": "2030-05-01 to 2030-05-03",
    "travelers": "2",
    "budget": "$1000.00",
    "mood": "Adventurous",
    "overall_theme": "Hills, surf and late dinners"
  },
  "trending_places": [
    {"place": "Belem Tower", "description": "Riverside fortress", "rating": 4.6, "image_url": ""}
  ],
  "risk_alert": {"level": "Low", "details": "Warm and dry"},
  "hotel_recommendations": [
    {"name": "Alfama Loft", "price_range": "$120-160/night", "rating": "4.4", "highlight": "Rooftop view"}
  ],
  "overcrowd_predictor": {"level": "Medium", "reason": "Spring weekends are busy"},
  "quick_insights": ["Buy a Viva Viagem card"],
  "daily_plan": {"Day 1": "Alfama walk", "Day 2": "Sintra day trip", "Day 3": "Surf at Carcavelos"},
  "important_notes": ["Trams fill up by 10am"],
  "daily_budget_plan": [
    {"day": "Day 1", "activities": "Old town", "estimated_spend": "$330",
     "category_breakdown": {"Accommodation": "$80", "Food": "$70", "Transport": "$60", "Activities": "$100", "Miscellaneous": "$20"},
     "recommendations": "Eat lunch at a tasca"}
  ],
  "budget_tracking": {
    "overview": "Comfortable for an active trip",
    "distribution_table": [
      {"category": "Activities", "percentage": "30%", "estimated_cost": "$300", "suggestions": "Book surf lessons in advance"}
    ],
    "optimization_tips": ["Use the metro"]
  }
}"#;

/// Model stand-in that returns a fixed reply and records prompts.
#[derive(Debug)]
pub struct StubModel {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompt log").len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().expect("prompt log").last().cloned()
    }
}

#[async_trait]
impl TextModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .expect("prompt log")
            .push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

pub struct TestApp {
    pub state: AppState,
    pub model: Arc<StubModel>,
    _root: TempDir,
}

impl TestApp {
    pub async fn new(model: StubModel) -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for test app")?;
        let db_path = root.path().join("test.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            llm: LlmConfig {
                api_key: "test-key".into(),
                model: "stub".into(),
                base_url: "http://127.0.0.1:9".into(),
                timeout: Duration::from_secs(1),
                max_retries: 0,
                initial_backoff: Duration::from_millis(1),
            },
        };

        let db = init_pool(&config.database_url).await?;
        run_migrations(&db).await?;

        let model = Arc::new(model);
        let state = AppState::new(config, db, model.clone());
        Ok(Self {
            state,
            model,
            _root: root,
        })
    }
}

/// A start date safely in the future, as `YYYY-MM-DD`.
pub fn future_date(days_ahead: i64) -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(days_ahead))
        .format("%Y-%m-%d")
        .to_string()
}
