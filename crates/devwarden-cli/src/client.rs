//! HTTP client for the Devwarden console API.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::fingerprint::Fingerprint;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Device is blocked")]
    Blocked,

    #[error("Console error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SigninOutcome {
    pub message: String,
    pub device_id: i64,
    #[serde(default)]
    pub created: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLogin {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    pub id: i64,
    pub hostname: String,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub mac_address: Option<String>,
    pub system_uuid: Option<String>,
    pub is_blocked: bool,
    pub created_at: i64,
    pub last_signin: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeviceCounts {
    pub total: i64,
    pub active: i64,
    pub blocked: i64,
}

#[derive(Serialize)]
struct SigninBody<'a> {
    password: &'a str,
    #[serde(flatten)]
    fingerprint: &'a Fingerprint,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConsoleClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        if base_url.is_empty() {
            return Err(ClientError::Config("server URL is empty".into()));
        }

        // reqwest is built with `rustls-no-provider`; `Err` means a provider
        // was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success statuses to errors and decode the body.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        match resp.status() {
            s if s.is_success() => Ok(resp.json().await?),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ClientError::Blocked),
            status => {
                let message = resp
                    .json::<ErrorBody>()
                    .await
                    .map(|b| b.error)
                    .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").into());
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    pub async fn signin(
        &self,
        password: &str,
        fingerprint: &Fingerprint,
    ) -> Result<SigninOutcome, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/device/signin"))
            .json(&SigninBody {
                password,
                fingerprint,
            })
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn login(&self, password: &str) -> Result<AdminLogin, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/admin/login"))
            .json(&json!({ "password": password }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn list_devices(
        &self,
        token: &str,
        search: Option<&str>,
        status: &str,
    ) -> Result<Vec<DeviceRecord>, ClientError> {
        let mut query = vec![("status", status)];
        if let Some(search) = search {
            query.push(("search", search));
        }
        let url = reqwest::Url::parse_with_params(&self.url("/api/admin/devices"), &query)
            .map_err(|e| ClientError::Config(format!("invalid server URL: {e}")))?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        Self::decode(resp).await
    }

    pub async fn stats(&self, token: &str) -> Result<DeviceCounts, ClientError> {
        let resp = self
            .http
            .get(self.url("/api/admin/stats"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn set_blocked(
        &self,
        token: &str,
        device_id: i64,
        block: bool,
    ) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/api/admin/block-device"))
            .bearer_auth(token)
            .json(&json!({ "deviceId": device_id, "block": block }))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(resp).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected() {
        assert!(matches!(
            ConsoleClient::new(""),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ConsoleClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.url("/api/health"),
            "http://localhost:8080/api/health"
        );
    }

    #[test]
    fn signin_body_flattens_fingerprint() {
        let fp = Fingerprint {
            hostname: "box1".into(),
            system_uuid: Some("u1".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(SigninBody {
            password: "panda",
            fingerprint: &fp,
        })
        .unwrap();
        assert_eq!(body["password"], "panda");
        assert_eq!(body["hostname"], "box1");
        assert_eq!(body["system_uuid"], "u1");
        assert!(body.get("mac_address").is_none());
    }
}
