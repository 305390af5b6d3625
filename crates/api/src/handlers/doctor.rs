use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use carebook_core::models::doctor::{
    CreateDoctorRequest, Doctor, ListDoctorsResponse, UpdateDoctorRequest,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AdminCaller, error_handling::AppError},
};

/// Doctors patients can book with. Unavailable doctors are hidden.
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListDoctorsResponse>, AppError> {
    let doctors = state.service.list_doctors(true).await?;
    Ok(Json(ListDoctorsResponse { doctors }))
}

/// Every doctor on record, including the ones hidden from patients.
#[axum::debug_handler]
pub async fn list_all_doctors(
    State(state): State<Arc<ApiState>>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<ListDoctorsResponse>, AppError> {
    let doctors = state.service.list_doctors(false).await?;
    Ok(Json(ListDoctorsResponse { doctors }))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<ApiState>>,
    AdminCaller(admin): AdminCaller,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), AppError> {
    let doctor = state.service.create_doctor(payload).await?;
    tracing::info!("Admin {} created doctor {}", admin.user_id, doctor.id);
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<ApiState>>,
    AdminCaller(admin): AdminCaller,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = state.service.update_doctor(id, payload).await?;
    tracing::info!("Admin {} updated doctor {}", admin.user_id, id);
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn remove_doctor(
    State(state): State<Arc<ApiState>>,
    AdminCaller(admin): AdminCaller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.remove_doctor(id).await?;
    tracing::info!("Admin {} removed doctor {}", admin.user_id, id);
    Ok(StatusCode::NO_CONTENT)
}
