use axum::{
    Json,
    extract::{Path, State},
};
use carebook_core::models::schedule::{SetWeeklyScheduleRequest, WeeklyScheduleResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AdminCaller, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn get_weekly_schedule(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<WeeklyScheduleResponse>, AppError> {
    let entries = state.service.weekly_schedule(doctor_id).await?;
    Ok(Json(WeeklyScheduleResponse { doctor_id, entries }))
}

/// Replaces the doctor's whole weekly schedule. An empty `entries` list
/// clears it.
#[axum::debug_handler]
pub async fn set_weekly_schedule(
    State(state): State<Arc<ApiState>>,
    AdminCaller(_admin): AdminCaller,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<SetWeeklyScheduleRequest>,
) -> Result<Json<WeeklyScheduleResponse>, AppError> {
    let entries = state
        .service
        .set_weekly_schedule(doctor_id, payload.entries)
        .await?;
    Ok(Json(WeeklyScheduleResponse { doctor_id, entries }))
}
