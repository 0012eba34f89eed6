//! Request-level authorization checks.

use tracing::warn;

use super::credentials::Credentials;
use super::session::{IssuedSession, SessionManager};
use crate::error::{ConsoleError, Result};

/// Composes the credential store and the session manager into the three
/// checks a handler needs before touching the device registry.
#[derive(Clone)]
pub struct AccessGateway {
    credentials: Credentials,
    sessions: SessionManager,
}

impl AccessGateway {
    pub const fn new(credentials: Credentials, sessions: SessionManager) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub const fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Check the shared device API password.
    pub fn authorize_device(&self, password: &str) -> Result<()> {
        if self.credentials.is_device_password(password) {
            Ok(())
        } else {
            warn!("Device signin with invalid API password");
            Err(ConsoleError::Unauthorized)
        }
    }

    /// Check an `Authorization` header value against live admin sessions.
    ///
    /// A missing or malformed header is rejected without touching the store.
    pub async fn authorize_admin(&self, authorization: Option<&str>) -> Result<()> {
        let token = bearer_token(authorization).ok_or(ConsoleError::Unauthorized)?;
        if self.sessions.validate_session(token).await? {
            Ok(())
        } else {
            Err(ConsoleError::Unauthorized)
        }
    }

    /// Check the admin password and mint a session on success.
    pub async fn authorize_login(&self, password: &str) -> Result<IssuedSession> {
        if !self.credentials.is_admin_password(password) {
            warn!("Failed admin login attempt");
            return Err(ConsoleError::Unauthorized);
        }
        Ok(self.sessions.create_session().await?)
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::SESSION_TTL_SECS;
    use crate::storage::DeviceDatabase;
    use devwarden_core::unix_timestamp;

    async fn gateway() -> AccessGateway {
        let db = DeviceDatabase::open_in_memory().await.unwrap();
        AccessGateway::new(
            Credentials::new("admin123", "panda"),
            SessionManager::new(db),
        )
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[tokio::test]
    async fn device_password_check() {
        let gw = gateway().await;
        assert!(gw.authorize_device("panda").is_ok());
        assert!(matches!(
            gw.authorize_device("wrong"),
            Err(ConsoleError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn login_then_admin_access() {
        let gw = gateway().await;
        let issued = gw.authorize_login("admin123").await.unwrap();

        let header = format!("Bearer {}", issued.token);
        assert!(gw.authorize_admin(Some(&header)).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_admin_password_mints_nothing() {
        let gw = gateway().await;
        assert!(matches!(
            gw.authorize_login("panda").await,
            Err(ConsoleError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn malformed_or_unknown_tokens_are_denied() {
        let gw = gateway().await;
        for header in [None, Some("Token abc"), Some("Bearer "), Some("Bearer nope")] {
            assert!(matches!(
                gw.authorize_admin(header).await,
                Err(ConsoleError::Unauthorized)
            ));
        }
    }

    #[tokio::test]
    async fn expired_session_is_denied() {
        let gw = gateway().await;
        let issued = gw
            .sessions()
            .create_session_at(unix_timestamp() - SESSION_TTL_SECS - 1)
            .await
            .unwrap();
        let header = format!("Bearer {}", issued.token);
        assert!(matches!(
            gw.authorize_admin(Some(&header)).await,
            Err(ConsoleError::Unauthorized)
        ));
    }
}
