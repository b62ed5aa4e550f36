pub mod budget;
pub mod dashboard;
pub mod export;
pub mod llm;
pub mod normalize;
pub mod planner;
pub mod prompt;
pub mod store;
pub mod validation;
