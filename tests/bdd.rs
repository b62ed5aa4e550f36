mod common;

use std::fmt;

use chrono::{Duration, Local, NaiveDate};
use cucumber::{given, then, when, World as _};
use wandermate::{
    error::AppError,
    models::trip::Mood,
    services::{planner, validation::TripForm},
    state::AppState,
};

use common::{StubModel, TestApp, ITINERARY_JSON};

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    app: Option<TestState>,
    outcome: Option<Result<i64, String>>,
    saved_trip: Option<i64>,
}

impl AppWorld {
    fn test_app(&self) -> &TestApp {
        &self
            .app
            .as_ref()
            .expect("model must be configured first")
            .0
    }

    fn app_state(&self) -> &AppState {
        &self.test_app().state
    }

    fn saved_trip(&self) -> i64 {
        self.saved_trip.expect("a trip must be saved first")
    }

    async fn plan(&mut self, form: TripForm) {
        let today = Local::now().date_naive();
        let outcome = planner::generate_trip(self.app_state(), &form, today)
            .await
            .map_err(|err| err.to_string());
        if let Ok(id) = &outcome {
            self.saved_trip = Some(*id);
        }
        self.outcome = Some(outcome);
    }
}

struct TestState(TestApp);

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

fn trip_form(destination: &str, start: NaiveDate, days: i64, travelers: u32, budget: f64) -> TripForm {
    TripForm {
        destination: Some(destination.to_string()),
        start_date: Some(start.format("%Y-%m-%d").to_string()),
        end_date: Some((start + Duration::days(days - 1)).format("%Y-%m-%d").to_string()),
        travelers: Some(travelers.to_string()),
        budget: Some(budget.to_string()),
        mood: Some("Adventurous".into()),
        preferences: None,
    }
}

fn in_days(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

async fn configure(world: &mut AppWorld, model: StubModel) {
    let app = TestApp::new(model).await.expect("test app");
    world.app = Some(TestState(app));
    world.outcome = None;
    world.saved_trip = None;
}

#[given("the model replies with a fenced itinerary")]
async fn given_fenced_reply(world: &mut AppWorld) {
    configure(world, StubModel::replying(format!("```json\n{ITINERARY_JSON}\n```"))).await;
}

#[given(regex = r#"^the model replies with "([^"]*)"$"#)]
async fn given_reply(world: &mut AppWorld, reply: String) {
    configure(world, StubModel::replying(reply)).await;
}

#[given(regex = r"^the model fails with status (\d+)$")]
async fn given_failure(world: &mut AppWorld, status: u16) {
    configure(world, StubModel::failing(status)).await;
}

#[given(regex = r#"^a saved (\d+) day trip to "([^"]+)"$"#)]
async fn given_saved_trip(world: &mut AppWorld, days: i64, destination: String) {
    world.plan(trip_form(&destination, in_days(7), days, 2, 1000.0)).await;
    assert!(world.saved_trip.is_some(), "setup trip was not saved");
}

#[when(regex = r#"^I plan a (\d+) day trip to "([^"]+)"$"#)]
async fn plan_trip(world: &mut AppWorld, days: i64, destination: String) {
    world.plan(trip_form(&destination, in_days(7), days, 2, 1000.0)).await;
}

#[when(regex = r#"^I plan a trip to "([^"]+)" starting (\d+) days ago$"#)]
async fn plan_past_trip(world: &mut AppWorld, destination: String, days_ago: i64) {
    world
        .plan(trip_form(&destination, in_days(-days_ago), 3, 2, 1000.0))
        .await;
}

#[when(regex = r#"^I plan a trip to "([^"]+)" for (\d+) travelers$"#)]
async fn plan_with_travelers(world: &mut AppWorld, destination: String, travelers: u32) {
    world
        .plan(trip_form(&destination, in_days(7), 3, travelers, 1000.0))
        .await;
}

#[when("I delete the saved trip")]
async fn delete_saved(world: &mut AppWorld) {
    let id = world.saved_trip();
    world.app_state().store.delete(id).await.expect("delete trip");
}

#[then("the trip is saved")]
async fn trip_saved(world: &mut AppWorld) {
    match world.outcome.as_ref().expect("a plan must be attempted") {
        Ok(id) => assert!(*id > 0),
        Err(err) => panic!("planning failed: {err}"),
    }
}

#[then(regex = r#"^planning fails with "([^"]+)"$"#)]
async fn planning_fails(world: &mut AppWorld, message: String) {
    match world.outcome.as_ref().expect("a plan must be attempted") {
        Ok(id) => panic!("expected failure, trip {id} was saved"),
        Err(err) => assert_eq!(err, &message),
    }
}

#[then(regex = r#"^planning fails starting with "([^"]+)"$"#)]
async fn planning_fails_prefix(world: &mut AppWorld, prefix: String) {
    match world.outcome.as_ref().expect("a plan must be attempted") {
        Ok(id) => panic!("expected failure, trip {id} was saved"),
        Err(err) => assert!(err.starts_with(&prefix), "{err}"),
    }
}

#[then(regex = r"^the store holds (\d+) trips?$")]
async fn store_holds(world: &mut AppWorld, expected: i64) {
    let count = world.app_state().store.count().await.expect("count trips");
    assert_eq!(count, expected);
}

#[then("the model was not called")]
async fn model_not_called(world: &mut AppWorld) {
    assert_eq!(world.test_app().model.calls(), 0);
}

#[then(regex = r#"^the prompt mentions "([^"]+)"$"#)]
async fn prompt_mentions(world: &mut AppWorld, needle: String) {
    let prompt = world.test_app().model.last_prompt().expect("model was called");
    assert!(prompt.contains(&needle), "prompt lacks {needle:?}");
}

#[then(regex = r#"^the saved trip goes to "([^"]+)" with mood "([^"]+)"$"#)]
async fn saved_trip_fields(world: &mut AppWorld, destination: String, mood: String) {
    let trip = world
        .app_state()
        .store
        .get(world.saved_trip())
        .await
        .expect("load trip");
    assert_eq!(trip.destination, destination);
    assert_eq!(trip.mood, mood.parse::<Mood>().expect("mood label"));
}

#[then(regex = r#"^the saved daily plan reads "([^"]+)"$"#)]
async fn saved_daily_plan(world: &mut AppWorld, days: String) {
    let trip = world
        .app_state()
        .store
        .get(world.saved_trip())
        .await
        .expect("load trip");
    let keys: Vec<&str> = trip.itinerary.daily_plan.iter().map(|(day, _)| day).collect();
    let expected: Vec<&str> = days.split(", ").collect();
    assert_eq!(keys, expected);
}

#[then("loading the saved trip reports it missing")]
async fn saved_trip_missing(world: &mut AppWorld) {
    let err = world
        .app_state()
        .store
        .get(world.saved_trip())
        .await
        .expect_err("trip should be gone");
    assert!(matches!(err, AppError::NotFound));
}

#[then("deleting the saved trip again reports it missing")]
async fn delete_again_missing(world: &mut AppWorld) {
    let err = world
        .app_state()
        .store
        .delete(world.saved_trip())
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
