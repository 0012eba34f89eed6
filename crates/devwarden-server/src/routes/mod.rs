//! HTTP surface of the console.

mod admin;
mod dashboard;
mod device;
mod health;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::auth::{AccessGateway, Credentials, SessionManager};
use crate::error::ConsoleError;
use crate::registry::DeviceRegistry;
use crate::storage::DeviceDatabase;

pub use admin::{BlockDeviceRequest, DeviceIdParam, DeviceQuery, LoginRequest};
pub use device::SigninResponse;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: DeviceDatabase,
    pub gateway: AccessGateway,
    pub registry: DeviceRegistry,
}

impl AppState {
    /// Wire every component against one store handle.
    pub fn new(db: DeviceDatabase, credentials: Credentials) -> Self {
        Self {
            gateway: AccessGateway::new(credentials, SessionManager::new(db.clone())),
            registry: DeviceRegistry::new(db.clone()),
            db,
        }
    }
}

/// Turn an extractor rejection into a generic 400.
fn malformed_body(rejection: impl std::fmt::Display) -> ConsoleError {
    debug!(reason = %rejection, "Rejected malformed request");
    ConsoleError::InvalidRequest("Invalid request body".into())
}

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/devices", get(admin::list_devices))
        .route("/stats", get(admin::device_stats))
        .route("/block-device", post(admin::block_device))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ))
        .route("/login", post(admin::login));

    Router::new()
        .route("/", get(dashboard::page))
        .route("/api/health", get(health::health))
        .route("/api/device/signin", post(device::signin))
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
