use std::sync::Arc;

use axum::http::StatusCode;
use carebook_core::models::{
    appointment::{Appointment, AppointmentPage, AppointmentStatus},
    doctor::{Doctor, ListDoctorsResponse},
    schedule::WeeklyScheduleResponse,
};
use carebook_db::mock::repositories::MockRepo;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use test_log::test;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_admin, as_patient, sunday_noon, time};

#[test(tokio::test)]
async fn test_create_and_list_doctors() {
    let ctx = TestContext::at(sunday_noon());

    let response = as_admin(ctx.server.post("/api/admin/doctors"))
        .json(&json!({
            "name": "Dr. Asha Raman",
            "specialization": "Dermatology",
            "experience_years": 12,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Doctor = response.json();
    assert!(created.is_available);

    as_admin(ctx.server.post("/api/admin/doctors"))
        .json(&json!({
            "name": "Dr. On Leave",
            "specialization": "Dermatology",
            "is_available": false,
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let listed: ListDoctorsResponse = ctx.server.get("/api/doctors").await.json();
    assert_eq!(listed.doctors, vec![created]);
}

#[tokio::test]
async fn test_create_doctor_validation() {
    let ctx = TestContext::at(sunday_noon());

    as_admin(ctx.server.post("/api/admin/doctors"))
        .json(&json!({ "name": "  ", "specialization": "Dermatology" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_reject_patients() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor().await;
    let patient = Uuid::new_v4();

    as_patient(ctx.server.post("/api/admin/doctors"), patient)
        .json(&json!({ "name": "Dr. Nobody", "specialization": "Surgery" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_patient(ctx.server.delete(&format!("/api/admin/doctors/{}", doctor.id)), patient)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_patient(ctx.server.put(&format!("/api/admin/doctors/{}", doctor.id)), patient)
        .json(&json!({ "is_available": false }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_patient(ctx.server.get("/api/admin/doctors"), patient)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_patient(
        ctx.server.put(&format!("/api/admin/doctors/{}/schedule", doctor.id)),
        patient,
    )
    .json(&json!({ "entries": [] }))
    .await
    .assert_status(StatusCode::FORBIDDEN);
    as_patient(ctx.server.get("/api/admin/appointments"), patient)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    ctx.server
        .get("/api/admin/appointments")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_set_weekly_schedule() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor().await;
    let path = format!("/api/admin/doctors/{}/schedule", doctor.id);

    let response = as_admin(ctx.server.put(&path))
        .json(&json!({
            "entries": [
                { "day_of_week": 4, "start_time": "14:00:00", "end_time": "16:00:00" },
                { "day_of_week": 0, "start_time": "09:00:00", "end_time": "12:00:00", "slot_duration_minutes": 15 },
            ]
        }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: WeeklyScheduleResponse = response.json();
    let days: Vec<(u8, u32)> = body
        .entries
        .iter()
        .map(|e| (e.day_of_week, e.slot_duration_minutes))
        .collect();
    assert_eq!(days, vec![(0, 15), (4, 30)]);
    assert_eq!(body.entries[0].start_time, time(9, 0));

    // A rejected schedule leaves the stored one untouched
    as_admin(ctx.server.put(&path))
        .json(&json!({
            "entries": [
                { "day_of_week": 1, "start_time": "12:00:00", "end_time": "09:00:00" },
            ]
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    let stored: WeeklyScheduleResponse = ctx
        .server
        .get(&format!("/api/doctors/{}/schedule", doctor.id))
        .await
        .json();
    assert_eq!(stored.entries, body.entries);

    as_admin(ctx.server.put(&format!("/api/admin/doctors/{}/schedule", Uuid::new_v4())))
        .json(&json!({ "entries": [] }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_doctor() {
    let ctx = TestContext::at(sunday_noon());
    let busy = ctx.doctor_with_day(0, time(9, 0), time(10, 0), 30).await;
    let idle = ctx.doctor().await;
    let patient = Uuid::new_v4();

    let appointment: Appointment = as_patient(ctx.server.post("/api/appointments"), patient)
        .json(&json!({ "doctor_id": busy.id, "appointment_datetime": "2025-06-09 09:00" }))
        .await
        .json();

    as_admin(ctx.server.delete(&format!("/api/admin/doctors/{}", busy.id)))
        .await
        .assert_status(StatusCode::CONFLICT);

    as_patient(
        ctx.server.post(&format!("/api/appointments/{}/cancel", appointment.id)),
        patient,
    )
    .await
    .assert_status(StatusCode::OK);
    as_admin(ctx.server.delete(&format!("/api/admin/doctors/{}", busy.id)))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    as_admin(ctx.server.delete(&format!("/api/admin/doctors/{}", idle.id)))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    as_admin(ctx.server.delete(&format!("/api/admin/doctors/{}", idle.id)))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let listed: ListDoctorsResponse = ctx.server.get("/api/doctors").await.json();
    assert!(listed.doctors.is_empty());
}

#[test(tokio::test)]
async fn test_toggling_availability_hides_and_shows_doctor() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor().await;
    let path = format!("/api/admin/doctors/{}", doctor.id);

    let response = as_admin(ctx.server.put(&path))
        .json(&json!({ "is_available": false }))
        .await;
    response.assert_status(StatusCode::OK);
    let hidden: Doctor = response.json();
    assert!(!hidden.is_available);
    assert_eq!(hidden.name, doctor.name);

    let listed: ListDoctorsResponse = ctx.server.get("/api/doctors").await.json();
    assert!(listed.doctors.is_empty());
    let everyone: ListDoctorsResponse = as_admin(ctx.server.get("/api/admin/doctors")).await.json();
    assert_eq!(everyone.doctors, vec![hidden]);

    let shown: Doctor = as_admin(ctx.server.put(&path))
        .json(&json!({ "is_available": true, "phone": "555-0134" }))
        .await
        .json();
    assert_eq!(shown.phone.as_deref(), Some("555-0134"));
    let listed: ListDoctorsResponse = ctx.server.get("/api/doctors").await.json();
    assert_eq!(listed.doctors, vec![shown]);
}

#[tokio::test]
async fn test_update_doctor_errors() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor().await;

    as_admin(ctx.server.put(&format!("/api/admin/doctors/{}", Uuid::new_v4())))
        .json(&json!({ "is_available": false }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    as_admin(ctx.server.put(&format!("/api/admin/doctors/{}", doctor.id)))
        .json(&json!({ "specialization": " " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let listed: ListDoctorsResponse = ctx.server.get("/api/doctors").await.json();
    assert_eq!(listed.doctors, vec![doctor]);
}

#[tokio::test]
async fn test_list_all_appointments() {
    let ctx = TestContext::at(sunday_noon());
    let doctor = ctx.doctor_with_day(0, time(9, 0), time(17, 0), 30).await;

    let mut booked = Vec::new();
    for key in ["2025-06-09 09:00", "2025-06-09 09:30", "2025-06-09 10:00"] {
        let appointment: Appointment = as_patient(ctx.server.post("/api/appointments"), Uuid::new_v4())
            .json(&json!({ "doctor_id": doctor.id, "appointment_datetime": key }))
            .await
            .json();
        booked.push(appointment);
    }
    as_patient(
        ctx.server.post(&format!("/api/appointments/{}/cancel", booked[1].id)),
        booked[1].patient_id,
    )
    .await
    .assert_status(StatusCode::OK);

    let all: AppointmentPage = as_admin(ctx.server.get("/api/admin/appointments")).await.json();
    let ids: Vec<Uuid> = all.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![booked[2].id, booked[1].id, booked[0].id]);
    assert_eq!(all.per_page, 20);

    let cancelled: AppointmentPage = as_admin(ctx.server.get("/api/admin/appointments"))
        .add_query_param("status", "cancelled")
        .await
        .json();
    assert_eq!(cancelled.total, 1);
    assert_eq!(cancelled.items[0].status, AppointmentStatus::Cancelled);

    for everything in ["all", "ALL", ""] {
        let page: AppointmentPage = as_admin(ctx.server.get("/api/admin/appointments"))
            .add_query_param("status", everything)
            .await
            .json();
        assert_eq!(page.total, 3);
    }

    let bad_status = as_admin(ctx.server.get("/api/admin/appointments"))
        .add_query_param("status", "no-show")
        .await;
    bad_status.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = bad_status.json();
    assert_eq!(body["error"], "Invalid input: Unknown appointment status: no-show");
}

#[tokio::test]
async fn test_storage_failures_are_internal_errors() {
    let mut repo = MockRepo::new();
    repo.expect_list_appointments()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection refused").into()));
    let ctx = TestContext::with_repo(Arc::new(repo), sunday_noon());

    let response = as_admin(ctx.server.get("/api/admin/appointments")).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Internal server error");
}
