//! Admin session table queries.

use devwarden_core::DatabaseError;

use super::DeviceDatabase;
use super::models::AdminSession;

impl DeviceDatabase {
    /// Store a freshly minted admin session.
    pub async fn create_admin_session(
        &self,
        token: &str,
        created_at: i64,
        expires_at: i64,
    ) -> Result<AdminSession, DatabaseError> {
        sqlx::query(
            "INSERT INTO admin_sessions (session_token, created_at, expires_at) VALUES (?, ?, ?)",
        )
        .bind(token)
        .bind(created_at)
        .bind(expires_at)
        .execute(self.pool())
        .await?;

        Ok(AdminSession {
            session_token: token.to_string(),
            created_at,
            expires_at,
        })
    }

    /// Find a session that is still live at `now` (`expires_at` strictly after it).
    pub async fn get_live_admin_session(
        &self,
        token: &str,
        now: i64,
    ) -> Result<Option<AdminSession>, DatabaseError> {
        let session = sqlx::query_as::<_, AdminSession>(
            "SELECT * FROM admin_sessions WHERE session_token = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        Ok(session)
    }
}
