use axum::http::StatusCode;
use carebook_core::models::slot::SlotsResponse;
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

use crate::test_utils::{TestContext, WINDOW_DAYS, as_patient, date, sunday_noon, time};

#[tokio::test]
async fn test_lists_sixteen_slots_for_a_working_day() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", doctor.id))
        .add_query_param("from", "2025-06-09")
        .add_query_param("days", 1)
        .await;

    response.assert_status(StatusCode::OK);
    let body: SlotsResponse = response.json();
    assert_eq!(body.doctor_id, doctor.id);
    assert_eq!(body.from, date(2025, 6, 9));
    assert_eq!(body.days, 1);
    assert_eq!(body.slots.len(), 16);
    assert_eq!(body.slots[0].key, "2025-06-09 09:00");
    assert_eq!(body.slots[15].key, "2025-06-09 16:30");
}

#[tokio::test]
async fn test_window_defaults_to_today_and_configured_length() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(10, 0), 30).await;

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", doctor.id))
        .await;

    response.assert_status(StatusCode::OK);
    let body: SlotsResponse = response.json();
    assert_eq!(body.from, date(2025, 6, 1));
    assert_eq!(body.days, WINDOW_DAYS);
    let keys: Vec<&str> = body.slots.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["2025-06-02 09:00", "2025-06-02 09:30"]);
}

#[tokio::test]
async fn test_booked_slot_disappears_from_listing() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(10, 0), 30).await;

    let booking = as_patient(ctx.server.post("/api/appointments"), Uuid::new_v4())
        .json(&serde_json::json!({
            "doctor_id": doctor.id,
            "appointment_datetime": "2025-06-09 09:00",
        }))
        .await;
    booking.assert_status(StatusCode::CREATED);

    let body: SlotsResponse = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", doctor.id))
        .add_query_param("from", "2025-06-09")
        .add_query_param("days", 1)
        .await
        .json();
    let keys: Vec<&str> = body.slots.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["2025-06-09 09:30"]);
}

#[tokio::test]
async fn test_doctor_without_schedule_has_no_slots() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor().await;

    let body: SlotsResponse = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", doctor.id))
        .add_query_param("days", 30)
        .await
        .json();

    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn test_slots_errors() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor().await;

    let unknown = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", Uuid::new_v4()))
        .await;
    unknown.assert_status(StatusCode::NOT_FOUND);
    let body: Value = unknown.json();
    assert!(body["error"].as_str().unwrap().contains("not found"));

    let empty_window = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", doctor.id))
        .add_query_param("days", 0)
        .await;
    empty_window.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weekly_schedule_is_public() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(2, time(13, 0), time(15, 0), 20).await;

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/schedule", doctor.id))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["doctor_id"], doctor.id.to_string());
    assert_eq!(body["entries"][0]["day_of_week"], 2);
    assert_eq!(body["entries"][0]["start_time"], "13:00:00");
    assert_eq!(body["entries"][0]["slot_duration_minutes"], 20);
}
