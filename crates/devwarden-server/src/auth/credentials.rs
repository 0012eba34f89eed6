//! Shared secrets injected at startup.

use std::fmt;

use subtle::ConstantTimeEq;

/// The admin password and the device API password.
///
/// Secrets are compared by exact equality; they are never hashed.
#[derive(Clone)]
pub struct Credentials {
    admin_password: String,
    device_password: String,
}

impl Credentials {
    pub fn new(admin_password: impl Into<String>, device_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            device_password: device_password.into(),
        }
    }

    pub fn is_admin_password(&self, supplied: &str) -> bool {
        secrets_match(&self.admin_password, supplied)
    }

    pub fn is_device_password(&self, supplied: &str) -> bool {
        secrets_match(&self.device_password, supplied)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("admin_password", &"<redacted>")
            .field("device_password", &"<redacted>")
            .finish()
    }
}

fn secrets_match(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
