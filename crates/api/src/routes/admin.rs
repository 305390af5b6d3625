use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

/// Every handler here takes an `AdminCaller`, so non-admins are turned away
/// before the handler body runs.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/doctors",
            get(handlers::doctor::list_all_doctors).post(handlers::doctor::create_doctor),
        )
        .route(
            "/api/admin/doctors/:id",
            put(handlers::doctor::update_doctor).delete(handlers::doctor::remove_doctor),
        )
        .route(
            "/api/admin/doctors/:id/schedule",
            put(handlers::schedule::set_weekly_schedule),
        )
        .route(
            "/api/admin/appointments",
            get(handlers::admin::list_appointments),
        )
}
