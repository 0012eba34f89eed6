//! Admin bearer session issuance and validation.

use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;

use devwarden_core::{DatabaseError, unix_timestamp};

use crate::storage::DeviceDatabase;

/// Fixed admin session lifetime (24 hours).
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// A freshly minted session handed back to the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedSession {
    pub token: String,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

/// Mints and checks opaque admin tokens. Sessions are never renewed or
/// revoked; they lapse when the clock passes `expires_at`.
#[derive(Clone)]
pub struct SessionManager {
    db: DeviceDatabase,
}

impl SessionManager {
    pub const fn new(db: DeviceDatabase) -> Self {
        Self { db }
    }

    pub async fn create_session(&self) -> Result<IssuedSession, DatabaseError> {
        self.create_session_at(unix_timestamp()).await
    }

    pub async fn create_session_at(&self, now: i64) -> Result<IssuedSession, DatabaseError> {
        let token = generate_token();
        let expires_at = now + SESSION_TTL_SECS;
        self.db.create_admin_session(&token, now, expires_at).await?;
        Ok(IssuedSession { token, expires_at })
    }

    /// Unknown and expired tokens both report `false`.
    pub async fn validate_session(&self, token: &str) -> Result<bool, DatabaseError> {
        self.validate_session_at(token, unix_timestamp()).await
    }

    pub async fn validate_session_at(&self, token: &str, now: i64) -> Result<bool, DatabaseError> {
        Ok(self.db.get_live_admin_session(token, now).await?.is_some())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn sessions() -> SessionManager {
        SessionManager::new(DeviceDatabase::open_in_memory().await.unwrap())
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn session_expires_after_24_hours() {
        let sessions = sessions().await;
        let issued = sessions.create_session_at(10_000).await.unwrap();
        assert_eq!(issued.expires_at, 10_000 + SESSION_TTL_SECS);

        assert!(sessions.validate_session_at(&issued.token, 10_000).await.unwrap());
        assert!(
            sessions
                .validate_session_at(&issued.token, issued.expires_at - 1)
                .await
                .unwrap()
        );
        // Expiry instant itself is already invalid.
        assert!(
            !sessions
                .validate_session_at(&issued.token, issued.expires_at)
                .await
                .unwrap()
        );
        assert!(
            !sessions
                .validate_session_at(&issued.token, issued.expires_at + 1)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let sessions = sessions().await;
        sessions.create_session().await.unwrap();
        assert!(!sessions.validate_session("not-a-token").await.unwrap());
    }

    #[tokio::test]
    async fn fresh_session_validates_now() {
        let sessions = sessions().await;
        let issued = sessions.create_session().await.unwrap();
        assert!(sessions.validate_session(&issued.token).await.unwrap());
    }
}
