//! # Carebook API
//!
//! The API crate provides the web server for the Carebook appointment
//! service. Patients browse doctors, list open slots, book and cancel
//! appointments; administrators manage doctors, their weekly schedules and
//! the appointment register.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into `AppointmentService` calls
//! - **Middleware**: Caller identity extraction and error mapping
//! - **Config**: Environment configuration
//!
//! Business rules live in `carebook-core`; storage is any
//! `carebook_core::repository::Repository`.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Caller identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use carebook_core::{clock::SystemClock, repository::Repository, services::AppointmentService};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub service: AppointmentService,
    /// Slot window used when a request names none
    pub booking_window_days: u32,
}

/// Installs the global `tracing` subscriber at the configured level.
pub fn init_tracing(config: &config::ApiConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with every route and layer attached
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Router {
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Doctor directory, schedules and slots
        .merge(routes::doctor::routes())
        // Patient booking endpoints
        .merge(routes::appointment::routes())
        // Administration endpoints
        .merge(routes::admin::routes())
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server on top of the given repository
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use carebook_api::{config::ApiConfig, start_server};
/// use carebook_core::memory::MemoryRepository;
///
/// let config = ApiConfig::from_env()?;
/// start_server(config, Arc::new(MemoryRepository::new())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, repo: Arc<dyn Repository>) -> Result<()> {
    let service = AppointmentService::new(repo, Arc::new(SystemClock));
    let state = Arc::new(ApiState {
        service,
        booking_window_days: config.booking_window_days,
    });

    let app = build_router(state, &config);

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
