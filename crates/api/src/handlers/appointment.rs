use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use carebook_core::models::{
    appointment::{Appointment, AppointmentListResponse, AppointmentPage, BookAppointmentRequest},
    slot::Slot,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::PatientCaller, error_handling::AppError},
};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// Books the slot named by `appointment_datetime` for the calling patient.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    PatientCaller(patient): PatientCaller,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let (date, time) = Slot::parse_key(&payload.appointment_datetime)?;

    let appointment = state
        .service
        .confirm_booking(patient.user_id, payload.doctor_id, date, time)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    PatientCaller(patient): PatientCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.service.cancel_appointment(patient.user_id, id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn upcoming_appointments(
    State(state): State<Arc<ApiState>>,
    PatientCaller(patient): PatientCaller,
) -> Result<Json<AppointmentListResponse>, AppError> {
    let appointments = state.service.upcoming_appointments(patient.user_id).await?;
    Ok(Json(AppointmentListResponse { appointments }))
}

#[axum::debug_handler]
pub async fn appointment_history(
    State(state): State<Arc<ApiState>>,
    PatientCaller(patient): PatientCaller,
    Query(query): Query<PageQuery>,
) -> Result<Json<AppointmentPage>, AppError> {
    let page = state
        .service
        .appointment_history(patient.user_id, query.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}
