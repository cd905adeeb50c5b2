//! # Clinic API
//!
//! The API crate provides the web server for the clinic booking service.
//! It exposes RESTful endpoints for registering patients and doctors and for
//! booking appointments through the [`BookingEngine`].
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into engine and registry calls
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Storage is reached only through the
//! ports in `clinic_core::ports`, so the router can run on PostgreSQL or on the
//! in-memory backend.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping for handler failures
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::Router;
use clinic_core::{
    booking::BookingEngine,
    clock::SystemClock,
    ports::{AppointmentLedger, DoctorRegistry, PatientRegistry},
};
use clinic_db::repositories::{
    appointment::PgSchedulingBackend, doctor::PgDoctorRegistry, patient::PgPatientRegistry,
};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use clinic_api::{ApiState, app, config::ApiConfig};
///
/// # async fn example(config: ApiConfig, db_pool: sqlx::PgPool) {
/// let state = Arc::new(ApiState::from_pool(db_pool, &config));
/// let router = app(state);
/// # }
/// ```
pub struct ApiState {
    /// Books appointments; owns the scheduling backend and clock
    pub booking: BookingEngine,

    /// Read side of the appointment store
    pub ledger: Arc<dyn AppointmentLedger>,

    pub patients: Arc<dyn PatientRegistry>,

    pub doctors: Arc<dyn DoctorRegistry>,
}

impl ApiState {
    pub fn new(
        booking: BookingEngine,
        ledger: Arc<dyn AppointmentLedger>,
        patients: Arc<dyn PatientRegistry>,
        doctors: Arc<dyn DoctorRegistry>,
    ) -> Self {
        Self {
            booking,
            ledger,
            patients,
            doctors,
        }
    }

    /// Wires every port to PostgreSQL and the engine to the system clock.
    pub fn from_pool(db_pool: PgPool, config: &config::ApiConfig) -> Self {
        let schedule = Arc::new(PgSchedulingBackend::new(
            db_pool.clone(),
            config.lock_timeout,
        ));
        let booking = BookingEngine::new(
            schedule.clone(),
            Arc::new(SystemClock),
            &config.booking_policy,
        );

        Self::new(
            booking,
            schedule,
            Arc::new(PgPatientRegistry::new(db_pool.clone())),
            Arc::new(PgDoctorRegistry::new(db_pool)),
        )
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Patient registry endpoints
        .merge(routes::patient::routes())
        // Doctor registry endpoints
        .merge(routes::doctor::routes())
        // Booking endpoints
        .merge(routes::appointment::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function sets up logging, wires the PostgreSQL-backed ports,
/// configures routes, and starts the HTTP server.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> eyre::Result<()> {
/// let config = clinic_api::config::ApiConfig::from_env()?;
/// let db_pool = clinic_db::create_pool(&config.database_url).await?;
/// clinic_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Booking policy: min_duration={}m, hours={}-{}, lead_time={}m",
        config.booking_policy.min_duration_minutes,
        config.booking_policy.opening_hour,
        config.booking_policy.closing_hour,
        config.booking_policy.min_lead_time_minutes
    );

    let state = Arc::new(ApiState::from_pool(db_pool, &config));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| match origin.parse::<axum::http::HeaderValue>() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            warn!("Ignoring invalid CORS origin: {}", origin);
                            None
                        }
                    })
                    .collect::<Vec<_>>(),
            );

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware. A booking cut off by it may already be
    // committed; `ApiConfig::from_env` keeps `lock_timeout` below this bound.
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
