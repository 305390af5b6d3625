use axum::{
    Json,
    extract::{Query, State},
};
use carebook_core::models::appointment::{AppointmentPage, AppointmentStatus};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth::AdminCaller, error_handling::AppError},
};

#[derive(Debug, Default, Deserialize)]
pub struct AdminAppointmentsQuery {
    /// `scheduled` or `cancelled`; every appointment when absent or `all`
    pub status: Option<String>,
    pub page: Option<u32>,
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    AdminCaller(_admin): AdminCaller,
    Query(query): Query<AdminAppointmentsQuery>,
) -> Result<Json<AppointmentPage>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(str::parse::<AppointmentStatus>)
        .transpose()?;

    let page = state
        .service
        .list_appointments(status, query.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}
