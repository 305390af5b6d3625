//! # Availability Handlers
//!
//! Lists the open slots of a doctor. A slot is a start time generated from
//! the doctor's weekly schedule that no scheduled appointment holds; the
//! generation itself lives in `carebook_core::services::availability`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use carebook_core::models::slot::SlotsResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for the slot listing
///
/// * `from` - first day of the window (default: today)
/// * `days` - length of the window (default: `BOOKING_WINDOW_DAYS`)
#[derive(Debug, Default, Deserialize)]
pub struct SlotsQuery {
    pub from: Option<NaiveDate>,
    pub days: Option<u32>,
}

/// Lists bookable slots ordered by date then time
///
/// # Endpoint
///
/// ```text
/// GET /api/doctors/:id/slots?from=2025-06-09&days=7
/// ```
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let from = query.from.unwrap_or_else(|| state.service.clock().today());
    let days = query.days.unwrap_or(state.booking_window_days);

    let available = state
        .service
        .list_available_slots(doctor_id, from, days)
        .await?;

    Ok(Json(SlotsResponse {
        doctor_id,
        from,
        days,
        slots: available.to_vec(),
    }))
}
