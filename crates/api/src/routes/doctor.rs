use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/doctors", get(handlers::doctor::list_doctors))
        .route(
            "/api/doctors/:id/schedule",
            get(handlers::schedule::get_weekly_schedule),
        )
        .route(
            "/api/doctors/:id/slots",
            get(handlers::availability::list_slots),
        )
}
