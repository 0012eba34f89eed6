use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::{AppState, malformed_body};
use crate::auth::IssuedSession;
use crate::error::{ConsoleError, Result};
use crate::storage::{Device, DeviceStats, StatusFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
}

/// Device IDs arrive as JSON numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceIdParam {
    Number(i64),
    Text(String),
}

impl DeviceIdParam {
    pub fn to_id(&self) -> Result<i64> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ConsoleError::InvalidRequest("Invalid device id".into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDeviceRequest {
    #[serde(rename = "deviceId")]
    pub device_id: DeviceIdParam,
    pub block: bool,
}

/// Gate for every admin route except login.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.gateway.authorize_admin(header.as_deref()).await?;
    Ok(next.run(req).await)
}

/// `POST /api/admin/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<IssuedSession>> {
    let Json(req) = payload.map_err(malformed_body)?;
    let session = state.gateway.authorize_login(&req.password).await?;
    info!(expires_at = session.expires_at, "Admin logged in");
    Ok(Json(session))
}

/// `GET /api/admin/devices`
#[instrument(skip_all)]
pub async fn list_devices(
    State(state): State<AppState>,
    query: std::result::Result<Query<DeviceQuery>, QueryRejection>,
) -> Result<Json<Vec<Device>>> {
    let Query(query) = query.map_err(malformed_body)?;
    let devices = state
        .registry
        .search(query.search.as_deref(), query.status)
        .await?;
    Ok(Json(devices))
}

/// `GET /api/admin/stats`
pub async fn device_stats(State(state): State<AppState>) -> Result<Json<DeviceStats>> {
    Ok(Json(state.registry.stats().await?))
}

/// `POST /api/admin/block-device`
#[instrument(skip_all)]
pub async fn block_device(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BlockDeviceRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(malformed_body)?;
    let device_id = req.device_id.to_id()?;
    state.registry.set_blocked(device_id, req.block).await?;
    Ok(Json(json!({ "success": true })))
}
