use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{llm::TextModel, store::TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: TripStore,
    pub model: Arc<dyn TextModel>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, model: Arc<dyn TextModel>) -> Self {
        Self {
            config,
            store: TripStore::new(db),
            model,
        }
    }
}
