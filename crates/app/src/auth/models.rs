//! Auth data models.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Login form input. The password is wiped from memory on drop.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

impl Credentials {
    /// Bundle an email and password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Whether both fields were filled in.
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// New administrator account.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Account email
    pub email: String,

    /// Account password
    pub password: String,

    /// Role to grant, e.g. `"admin"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Debug for Registration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// An authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    pub email: String,

    #[serde(default)]
    pub role: Option<String>,
}

impl AdminUser {
    /// Name to greet the administrator with.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLogin {
    /// Bearer token for subsequent requests
    pub token: String,

    /// The administrator that logged in
    pub user: AdminUser,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn debug_output_hides_passwords() {
        let credentials = Credentials::new("admin@store.test", "hunter2");

        let rendered = format!("{credentials:?}");

        assert!(!rendered.contains("hunter2"), "{rendered}");
        assert!(rendered.contains("admin@store.test"), "{rendered}");
    }

    #[test]
    fn incomplete_credentials() {
        assert!(!Credentials::new("", "secret").is_complete());
        assert!(!Credentials::new("admin@store.test", "").is_complete());
        assert!(Credentials::new("admin@store.test", "secret").is_complete());
    }

    #[test]
    fn reads_users_with_legacy_ids() -> TestResult {
        let user: AdminUser =
            serde_json::from_str(r#"{"_id":"u1","email":"admin@store.test","role":"admin"}"#)?;

        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.display_name(), "admin@store.test");

        Ok(())
    }
}
