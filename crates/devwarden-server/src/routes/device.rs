use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::{AppState, malformed_body};
use crate::error::Result;
use crate::registry::DeviceIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninResponse {
    pub success: bool,
    pub message: String,
    pub device_id: i64,
    pub created: bool,
}

/// `POST /api/device/signin`
///
/// The body is `{password, hostname, ...fingerprint}`. Only the password is
/// read before authorization; the identity fields are validated afterwards.
#[instrument(skip_all)]
pub async fn signin(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SigninResponse>> {
    let Json(body) = payload.map_err(malformed_body)?;

    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    state.gateway.authorize_device(password)?;

    let identity: DeviceIdentity = serde_json::from_value(body).map_err(malformed_body)?;
    let resolution = state.registry.resolve_or_create(&identity).await?;

    let message = if resolution.created {
        "New device registered and signed in"
    } else {
        "Device signin successful"
    };
    Ok(Json(SigninResponse {
        success: true,
        message: message.into(),
        device_id: resolution.device.id,
        created: resolution.created,
    }))
}
