use axum::http::StatusCode;
use carebook_core::models::appointment::{
    Appointment, AppointmentListResponse, AppointmentPage, AppointmentStatus,
};
use chrono::Duration;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, as_admin, as_patient, as_user, at, date, sunday_noon, time};

async fn book(ctx: &TestContext, patient_id: Uuid, doctor_id: Uuid, key: &str) -> axum_test::TestResponse {
    as_patient(ctx.server.post("/api/appointments"), patient_id)
        .json(&json!({
            "doctor_id": doctor_id,
            "appointment_datetime": key,
        }))
        .await
}

#[tokio::test]
async fn test_book_appointment() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;
    let patient = Uuid::new_v4();

    let response = book(&ctx, patient, doctor.id, "2025-06-09 10:30").await;

    response.assert_status(StatusCode::CREATED);
    let appointment: Appointment = response.json();
    assert_eq!(appointment.patient_id, patient);
    assert_eq!(appointment.doctor_id, doctor.id);
    assert_eq!(appointment.appointment_date, date(2025, 6, 9));
    assert_eq!(appointment.appointment_time, time(10, 30));
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn test_second_booking_of_a_slot_conflicts() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;

    book(&ctx, Uuid::new_v4(), doctor.id, "2025-06-09 09:00")
        .await
        .assert_status(StatusCode::CREATED);
    let second = book(&ctx, Uuid::new_v4(), doctor.id, "2025-06-09 09:00").await;

    second.assert_status(StatusCode::CONFLICT);
    let body: Value = second.json();
    assert!(body["error"].as_str().unwrap().starts_with("Slot conflict"));
}

#[rstest]
#[case::malformed("next monday at nine", StatusCode::BAD_REQUEST)]
#[case::off_pattern("2025-06-09 09:10", StatusCode::BAD_REQUEST)]
#[case::wrong_day("2025-06-10 09:00", StatusCode::BAD_REQUEST)]
#[case::in_the_past("2025-05-26 09:00", StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn test_rejected_bookings(#[case] key: &str, #[case] status: StatusCode) {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;

    book(&ctx, Uuid::new_v4(), doctor.id, key)
        .await
        .assert_status(status);
}

#[tokio::test]
async fn test_booking_with_unknown_doctor() {
    let ctx = TestContext::at(sunday_noon());

    book(&ctx, Uuid::new_v4(), Uuid::new_v4(), "2025-06-09 09:00")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_requires_identity() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;
    let body = json!({
        "doctor_id": doctor.id,
        "appointment_datetime": "2025-06-09 09:00",
    });

    let anonymous = ctx.server.post("/api/appointments").json(&body).await;
    anonymous.assert_status(StatusCode::UNAUTHORIZED);

    let admin = as_admin(ctx.server.post("/api/appointments")).json(&body).await;
    admin.assert_status(StatusCode::FORBIDDEN);

    let unknown_role = as_user(ctx.server.post("/api/appointments"), Uuid::new_v4(), "nurse")
        .json(&body)
        .await;
    unknown_role.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cancel_appointment_respects_cutoff() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;
    let patient = Uuid::new_v4();

    let early: Appointment = book(&ctx, patient, doctor.id, "2025-06-09 09:00").await.json();
    let late: Appointment = book(&ctx, patient, doctor.id, "2025-06-09 09:30").await.json();

    // 25 hours before the first appointment
    ctx.clock.set(at(2025, 6, 8, 8, 0));
    let response = as_patient(
        ctx.server.post(&format!("/api/appointments/{}/cancel", early.id)),
        patient,
    )
    .await;
    response.assert_status(StatusCode::OK);
    let cancelled: Appointment = response.json();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    // 23 hours before the second one
    ctx.clock.advance(Duration::hours(2) + Duration::minutes(30));
    let too_late = as_patient(
        ctx.server.post(&format!("/api/appointments/{}/cancel", late.id)),
        patient,
    )
    .await;
    too_late.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancel_errors() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;
    let patient = Uuid::new_v4();
    let appointment: Appointment = book(&ctx, patient, doctor.id, "2025-06-09 09:00").await.json();
    let cancel_path = format!("/api/appointments/{}/cancel", appointment.id);

    as_patient(ctx.server.post(&cancel_path), Uuid::new_v4())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    as_patient(ctx.server.post(&cancel_path), patient)
        .await
        .assert_status(StatusCode::OK);
    as_patient(ctx.server.post(&cancel_path), patient)
        .await
        .assert_status(StatusCode::CONFLICT);

    as_patient(
        ctx.server.post(&format!("/api/appointments/{}/cancel", Uuid::new_v4())),
        patient,
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upcoming_and_history() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;
    let patient = Uuid::new_v4();

    let later: Appointment = book(&ctx, patient, doctor.id, "2025-06-16 11:00").await.json();
    let sooner: Appointment = book(&ctx, patient, doctor.id, "2025-06-09 14:00").await.json();
    let dropped: Appointment = book(&ctx, patient, doctor.id, "2025-06-09 15:00").await.json();
    book(&ctx, Uuid::new_v4(), doctor.id, "2025-06-09 16:00")
        .await
        .assert_status(StatusCode::CREATED);
    as_patient(
        ctx.server.post(&format!("/api/appointments/{}/cancel", dropped.id)),
        patient,
    )
    .await
    .assert_status(StatusCode::OK);

    let upcoming: AppointmentListResponse = as_patient(ctx.server.get("/api/appointments/upcoming"), patient)
        .await
        .json();
    let ids: Vec<Uuid> = upcoming.appointments.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);

    let history: AppointmentPage = as_patient(ctx.server.get("/api/appointments/history"), patient)
        .await
        .json();
    let ids: Vec<Uuid> = history.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![later.id, dropped.id, sooner.id]);
    assert_eq!(history.page, 1);
    assert_eq!(history.per_page, 10);
    assert_eq!(history.total, 3);

    as_patient(ctx.server.get("/api/appointments/history"), patient)
        .add_query_param("page", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
