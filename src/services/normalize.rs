use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::AppError, models::itinerary::Itinerary};

/// Removes a leading ```` ``` ```` / ```` ```json ```` opener and a trailing
/// ```` ``` ```` closer.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest;
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Turns the model's raw reply into a defaulted itinerary document.
pub fn normalize_response(raw: &str) -> Result<Itinerary, AppError> {
    let body = strip_code_fence(raw);
    debug!(raw_len = raw.len(), body_len = body.len(), "normalize_response: called");

    let value: Value = serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "model reply is not JSON");
        AppError::MalformedResponse(err.to_string())
    })?;

    if !value.is_object() {
        warn!("model reply is JSON but not an object");
        return Err(AppError::MalformedResponse(
            "top-level value is not an object".into(),
        ));
    }

    serde_json::from_value(value).map_err(|err| {
        warn!(error = %err, "model reply does not match the itinerary shape");
        AppError::MalformedResponse(err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "trip_summary": {"destination": "Oaxaca", "overall_theme": "Mezcal and markets"},
        "quick_insights": ["Visit Monte Alban early"],
        "daily_plan": {"Day 1": "Zocalo", "Day 2": "Hierve el Agua"}
    }"#;

    #[test]
    fn fenced_and_bare_replies_match() {
        let bare = normalize_response(BODY).unwrap();
        let fenced = normalize_response(&format!("```json\n{BODY}\n```")).unwrap();
        let untagged = normalize_response(&format!("  ```\n{BODY}\n```  \n")).unwrap();
        let shouting = normalize_response(&format!("```JSON{BODY}```")).unwrap();
        assert_eq!(bare, fenced);
        assert_eq!(bare, untagged);
        assert_eq!(bare, shouting);
        assert_eq!(bare.trip_summary.destination, "Oaxaca");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let itinerary = normalize_response(BODY).unwrap();
        assert!(itinerary.trending_places.is_empty());
        assert!(itinerary.hotel_recommendations.is_empty());
        assert!(itinerary.daily_budget_plan.is_empty());
        assert!(itinerary.risk_alert.is_none());
    }

    #[test]
    fn prose_is_rejected() {
        let err = normalize_response("Sure! Here is your itinerary: Day 1 ...").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(matches!(
            normalize_response("[1, 2, 3]"),
            Err(AppError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize_response("```json\n\"just text\"\n```"),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn wrongly_typed_section_is_rejected() {
        let err = normalize_response(r#"{"trending_places": "none"}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn strip_code_fence_leaves_plain_text_alone() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
    }
}
