//! Admin session.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use storefront::{
    notices::{Notice, Notifier},
    storage::Storage,
};
use tracing::{debug, error, warn};

use crate::{
    api::ApiError,
    auth::{
        AuthService, SessionError,
        models::{AdminUser, Credentials, Registration},
    },
    routes::{Capability, Presence},
};

/// Storage key holding the admin bearer token.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// How long a verified session is trusted before it is checked again.
pub const SESSION_RECHECK_INTERVAL: SignedDuration = SignedDuration::from_mins(15);

/// Where the admin session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminState {
    /// The stored token has not been verified yet.
    Checking,

    /// No administrator is logged in.
    SignedOut,

    /// An administrator is logged in.
    SignedIn(AdminUser),
}

/// The administrator's login state, backed by a stored bearer token.
pub struct AdminSession<S: Storage> {
    state: AdminState,
    checked_at: Option<Timestamp>,
    storage: S,
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Storage> AdminSession<S> {
    /// Create a session in the [`AdminState::Checking`] state.
    pub fn new(storage: S, auth: Arc<dyn AuthService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: AdminState::Checking,
            checked_at: None,
            storage,
            auth,
            notifier,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AdminState {
        &self.state
    }

    /// The logged-in administrator, if any.
    pub fn user(&self) -> Option<&AdminUser> {
        match &self.state {
            AdminState::SignedIn(user) => Some(user),
            AdminState::Checking | AdminState::SignedOut => None,
        }
    }

    /// Whether an administrator is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Whether the stored token is due to be verified again.
    pub fn recheck_due(&self, now: Timestamp) -> bool {
        self.checked_at
            .is_none_or(|checked_at| now.duration_since(checked_at) >= SESSION_RECHECK_INTERVAL)
    }

    /// Verify the stored token with the API.
    ///
    /// Any failure clears the stored token and leaves the session signed out.
    pub async fn check(&mut self, now: Timestamp) -> &AdminState {
        self.checked_at = Some(now);

        let token = match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                self.state = AdminState::SignedOut;
                return &self.state;
            }
            Err(error) => {
                error!(%error, "failed to read stored admin token");
                self.state = AdminState::SignedOut;
                return &self.state;
            }
        };

        self.auth.set_bearer_token(Some(token));

        match self.auth.current_user().await {
            Ok(user) => {
                debug!(email = %user.email, "admin session verified");
                self.state = AdminState::SignedIn(user);
            }
            Err(error) => {
                warn!(%error, "stored admin token rejected");
                self.forget();
            }
        }

        &self.state
    }

    /// Log in and store the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error when either field is blank or the API rejects the
    /// credentials. An error notice is emitted in both cases.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<AdminUser, SessionError> {
        if !credentials.is_complete() {
            let error = SessionError::MissingCredentials;
            self.notifier.notify(Notice::error(error.to_string()));
            return Err(error);
        }

        let login = match self.auth.login(credentials).await {
            Ok(login) => login,
            Err(error) => {
                self.notifier.notify(Notice::error(
                    error.user_message("Login failed. Please check your credentials."),
                ));
                return Err(error.into());
            }
        };

        if let Err(error) = self.storage.set(TOKEN_STORAGE_KEY, &login.token) {
            error!(%error, "failed to persist admin token");
        }

        self.auth.set_bearer_token(Some(login.token));
        self.state = AdminState::SignedIn(login.user.clone());

        debug!(email = %login.user.email, "admin logged in");

        Ok(login.user)
    }

    /// Log out. Local state is cleared even when the API call fails.
    pub async fn logout(&mut self) {
        if let Err(error) = self.auth.logout().await {
            error!(%error, "logout request failed");
        }

        self.forget();
        self.notifier.notify(Notice::success("Logged out successfully"));
    }

    /// Create another administrator account.
    ///
    /// # Errors
    ///
    /// Returns an error when the email or password is blank or the API
    /// rejects the registration.
    pub async fn register(&self, registration: &Registration) -> Result<AdminUser, SessionError> {
        if registration.email.trim().is_empty() || registration.password.is_empty() {
            self.notifier
                .notify(Notice::error("Email and password are required"));
            return Err(SessionError::MissingCredentials);
        }

        match self.auth.register(registration).await {
            Ok(user) => {
                self.notifier
                    .notify(Notice::success("User registered successfully"));
                Ok(user)
            }
            Err(error) => {
                self.notifier
                    .notify(Notice::error(error.user_message("Registration failed")));
                Err(error.into())
            }
        }
    }

    /// Drop the session when the API reports the token as no longer valid.
    pub fn observe(&mut self, error: &ApiError) {
        if matches!(error, ApiError::Unauthorized) {
            self.forget();
        }
    }

    fn forget(&mut self) {
        if let Err(error) = self.storage.remove(TOKEN_STORAGE_KEY) {
            error!(%error, "failed to remove stored admin token");
        }

        self.auth.set_bearer_token(None);
        self.state = AdminState::SignedOut;
    }
}

impl<S: Storage> Capability for AdminSession<S> {
    fn presence(&self) -> Presence {
        match self.state {
            AdminState::Checking => Presence::Checking,
            AdminState::SignedOut => Presence::Absent,
            AdminState::SignedIn(_) => Presence::Present,
        }
    }
}

impl<S: Storage> std::fmt::Debug for AdminSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("state", &self.state)
            .field("checked_at", &self.checked_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use storefront::{
        notices::{NoticeLevel, NoticeLog},
        storage::MemoryStorage,
    };
    use testresult::TestResult;

    use super::*;
    use crate::auth::{AdminLogin, MockAuthService};

    fn admin() -> AdminUser {
        AdminUser {
            id: Some("u1".to_string()),
            name: Some("Owner".to_string()),
            email: "owner@store.test".to_string(),
            role: Some("admin".to_string()),
        }
    }

    fn now() -> Timestamp {
        Timestamp::from_second(1_792_300_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn without_a_token_the_session_is_signed_out() {
        let mut auth = MockAuthService::new();
        auth.expect_current_user().never();

        let mut session =
            AdminSession::new(MemoryStorage::new(), Arc::new(auth), Arc::new(NoticeLog::new()));

        assert_eq!(session.presence(), Presence::Checking);
        assert_eq!(session.check(now()).await, &AdminState::SignedOut);
        assert_eq!(session.presence(), Presence::Absent);
    }

    #[tokio::test]
    async fn a_valid_stored_token_restores_the_session() {
        let mut auth = MockAuthService::new();

        auth.expect_set_bearer_token()
            .times(1)
            .withf(|token| token.as_deref() == Some("stored"))
            .return_const(());
        auth.expect_current_user()
            .times(1)
            .returning(|| Ok(admin()));

        let storage = MemoryStorage::with_entry(TOKEN_STORAGE_KEY, "stored");
        let mut session = AdminSession::new(storage, Arc::new(auth), Arc::new(NoticeLog::new()));

        session.check(now()).await;

        assert_eq!(session.user(), Some(&admin()));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn a_rejected_token_is_removed() {
        let mut auth = MockAuthService::new();

        auth.expect_set_bearer_token().times(2).return_const(());
        auth.expect_current_user()
            .times(1)
            .returning(|| Err(ApiError::Unauthorized));

        let storage = Arc::new(MemoryStorage::with_entry(TOKEN_STORAGE_KEY, "expired"));
        let mut session = AdminSession::new(
            Arc::clone(&storage),
            Arc::new(auth),
            Arc::new(NoticeLog::new()),
        );

        assert_eq!(session.check(now()).await, &AdminState::SignedOut);
        assert!(!storage.contains(TOKEN_STORAGE_KEY), "token should be removed");
    }

    #[tokio::test]
    async fn login_stores_the_token() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login()
            .times(1)
            .withf(|credentials| credentials.email == "owner@store.test")
            .returning(|_| {
                Ok(AdminLogin {
                    token: "fresh".to_string(),
                    user: admin(),
                })
            });
        auth.expect_set_bearer_token()
            .times(1)
            .withf(|token| token.as_deref() == Some("fresh"))
            .return_const(());

        let storage = Arc::new(MemoryStorage::new());
        let mut session = AdminSession::new(
            Arc::clone(&storage),
            Arc::new(auth),
            Arc::new(NoticeLog::new()),
        );

        let user = session
            .login(&Credentials::new("owner@store.test", "secret"))
            .await?;

        assert_eq!(user, admin());
        assert_eq!(storage.get(TOKEN_STORAGE_KEY)?.as_deref(), Some("fresh"));
        assert_eq!(session.presence(), Presence::Present);

        Ok(())
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_the_api() {
        let mut auth = MockAuthService::new();
        auth.expect_login().never();

        let notices = Arc::new(NoticeLog::new());
        let mut session = AdminSession::new(
            MemoryStorage::new(),
            Arc::new(auth),
            Arc::clone(&notices) as Arc<dyn Notifier>,
        );

        let result = session.login(&Credentials::new("owner@store.test", "")).await;

        assert!(
            matches!(result, Err(SessionError::MissingCredentials)),
            "expected MissingCredentials, got {result:?}"
        );
        assert_eq!(
            notices.snapshot(),
            vec![Notice::error("Please provide both email and password")]
        );
    }

    #[tokio::test]
    async fn failed_login_reports_the_server_message() {
        let mut auth = MockAuthService::new();

        auth.expect_login().times(1).returning(|_| {
            Err(ApiError::Rejected {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        });
        auth.expect_set_bearer_token().never();

        let notices = Arc::new(NoticeLog::new());
        let mut session = AdminSession::new(
            MemoryStorage::new(),
            Arc::new(auth),
            Arc::clone(&notices) as Arc<dyn Notifier>,
        );

        let result = session
            .login(&Credentials::new("owner@store.test", "wrong"))
            .await;

        assert!(result.is_err(), "login should fail");
        assert_eq!(notices.snapshot(), vec![Notice::error("Invalid credentials")]);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_local_state_even_when_the_api_fails() {
        let mut auth = MockAuthService::new();

        auth.expect_set_bearer_token().return_const(());
        auth.expect_current_user().returning(|| Ok(admin()));
        auth.expect_logout()
            .times(1)
            .returning(|| Err(ApiError::NotFound));

        let storage = Arc::new(MemoryStorage::with_entry(TOKEN_STORAGE_KEY, "stored"));
        let notices = Arc::new(NoticeLog::new());
        let mut session = AdminSession::new(
            Arc::clone(&storage),
            Arc::new(auth),
            Arc::clone(&notices) as Arc<dyn Notifier>,
        );

        session.check(now()).await;
        session.logout().await;

        assert_eq!(session.state(), &AdminState::SignedOut);
        assert!(!storage.contains(TOKEN_STORAGE_KEY), "token should be removed");
        assert_eq!(notices.count(NoticeLevel::Success), 1);
    }

    #[tokio::test]
    async fn recheck_is_due_after_fifteen_minutes() {
        let mut auth = MockAuthService::new();
        auth.expect_current_user().never();

        let mut session =
            AdminSession::new(MemoryStorage::new(), Arc::new(auth), Arc::new(NoticeLog::new()));

        assert!(session.recheck_due(now()));

        session.check(now()).await;

        assert!(!session.recheck_due(now() + SignedDuration::from_mins(14)));
        assert!(session.recheck_due(now() + SignedDuration::from_mins(15)));
    }

    #[tokio::test]
    async fn unauthorized_responses_end_the_session() {
        let mut auth = MockAuthService::new();

        auth.expect_set_bearer_token().return_const(());
        auth.expect_current_user().returning(|| Ok(admin()));

        let storage = MemoryStorage::with_entry(TOKEN_STORAGE_KEY, "stored");
        let mut session = AdminSession::new(storage, Arc::new(auth), Arc::new(NoticeLog::new()));

        session.check(now()).await;
        session.observe(&ApiError::NotFound);

        assert!(session.is_authenticated(), "only 401 ends the session");

        session.observe(&ApiError::Unauthorized);

        assert!(!session.is_authenticated());
    }
}
