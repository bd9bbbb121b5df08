//! Customer session.

use std::sync::Arc;

use storefront::notices::{Notice, Notifier};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    api::ApiError,
    customers::{
        CustomerSessionService,
        name::{CustomerName, CustomerNameError},
    },
    routes::{Capability, Presence},
};

#[derive(Debug, Error)]
pub enum CustomerSessionError {
    #[error(transparent)]
    Name(#[from] CustomerNameError),

    #[error("customer session request failed")]
    Api(#[from] ApiError),
}

/// Where the customer session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerState {
    /// The API has not been asked yet.
    Loading,

    /// No name is attached to the session.
    Anonymous,

    /// Orders are attributed to this name.
    Named(String),
}

/// The unauthenticated, name-only identity orders are placed under.
pub struct CustomerSession {
    state: CustomerState,
    service: Arc<dyn CustomerSessionService>,
    notifier: Arc<dyn Notifier>,
}

impl CustomerSession {
    /// A session that has not been loaded yet.
    pub fn new(service: Arc<dyn CustomerSessionService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: CustomerState::Loading,
            service,
            notifier,
        }
    }

    /// Current state.
    pub fn state(&self) -> &CustomerState {
        &self.state
    }

    /// The name orders are attributed to, if one is set.
    pub fn name(&self) -> Option<&str> {
        match &self.state {
            CustomerState::Named(name) => Some(name),
            CustomerState::Loading | CustomerState::Anonymous => None,
        }
    }

    /// Ask the API for the name attached to the session.
    ///
    /// A failed request leaves the session anonymous.
    pub async fn load(&mut self) -> &CustomerState {
        self.state = match self.service.get_session().await {
            Ok(Some(name)) => CustomerState::Named(name),
            Ok(None) => CustomerState::Anonymous,
            Err(error) => {
                error!(%error, "failed to check customer session");
                CustomerState::Anonymous
            }
        };

        &self.state
    }

    /// Validate a name and attach it to the session.
    ///
    /// # Errors
    ///
    /// Returns an error when the name fails validation or the API rejects it.
    /// An error notice is emitted in both cases.
    pub async fn set_name(&mut self, input: &str) -> Result<&str, CustomerSessionError> {
        let name = match CustomerName::parse(input) {
            Ok(name) => name,
            Err(error) => {
                self.notifier.notify(Notice::error(error.to_string()));
                return Err(error.into());
            }
        };

        match self.service.set_session(&name).await {
            Ok(stored) => {
                debug!(name = %stored, "customer session named");

                self.notifier.notify(Notice::success(format!("Welcome, {name}!")));
                self.state = CustomerState::Named(stored);

                Ok(self.name().unwrap_or_default())
            }
            Err(error) => {
                self.notifier.notify(Notice::error(
                    error.user_message("Failed to set customer name"),
                ));

                Err(error.into())
            }
        }
    }

    /// Drop the session name.
    ///
    /// # Errors
    ///
    /// Returns an error when the API call fails; the session keeps its name.
    pub async fn clear(&mut self) -> Result<(), CustomerSessionError> {
        match self.service.clear_session().await {
            Ok(()) => {
                self.state = CustomerState::Anonymous;
                self.notifier
                    .notify(Notice::success("Session cleared successfully"));

                Ok(())
            }
            Err(error) => {
                error!(%error, "failed to clear customer session");
                self.notifier.notify(Notice::error("Failed to clear session"));

                Err(error.into())
            }
        }
    }
}

impl Capability for CustomerSession {
    fn presence(&self) -> Presence {
        match self.state {
            CustomerState::Loading => Presence::Checking,
            CustomerState::Anonymous => Presence::Absent,
            CustomerState::Named(_) => Presence::Present,
        }
    }
}

impl std::fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerSession")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use storefront::notices::NoticeLog;
    use testresult::TestResult;

    use super::*;
    use crate::customers::MockCustomerSessionService;

    fn session(service: MockCustomerSessionService) -> (CustomerSession, Arc<NoticeLog>) {
        let notices = Arc::new(NoticeLog::new());
        let session = CustomerSession::new(
            Arc::new(service),
            Arc::clone(&notices) as Arc<dyn Notifier>,
        );

        (session, notices)
    }

    #[tokio::test]
    async fn load_adopts_the_stored_name() {
        let mut service = MockCustomerSessionService::new();
        service
            .expect_get_session()
            .times(1)
            .returning(|| Ok(Some("Asha".to_string())));

        let (mut session, _) = session(service);

        assert_eq!(session.presence(), Presence::Checking);

        session.load().await;

        assert_eq!(session.name(), Some("Asha"));
        assert_eq!(session.presence(), Presence::Present);
    }

    #[tokio::test]
    async fn failed_load_is_anonymous() {
        let mut service = MockCustomerSessionService::new();
        service
            .expect_get_session()
            .returning(|| Err(ApiError::NotFound));

        let (mut session, notices) = session(service);

        assert_eq!(session.load().await, &CustomerState::Anonymous);
        assert!(notices.snapshot().is_empty(), "load failures are silent");
    }

    #[tokio::test]
    async fn set_name_trims_and_welcomes() -> TestResult {
        let mut service = MockCustomerSessionService::new();
        service
            .expect_set_session()
            .times(1)
            .withf(|name| name.as_str() == "Asha")
            .returning(|name| Ok(name.as_str().to_string()));

        let (mut session, notices) = session(service);

        let name = session.set_name("  Asha  ").await?;

        assert_eq!(name, "Asha");
        assert_eq!(notices.snapshot(), vec![Notice::success("Welcome, Asha!")]);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_names_never_reach_the_api() {
        let mut service = MockCustomerSessionService::new();
        service.expect_set_session().never();

        let (mut session, notices) = session(service);

        let result = session.set_name("A").await;

        assert!(
            matches!(result, Err(CustomerSessionError::Name(CustomerNameError::TooShort))),
            "expected TooShort, got {result:?}"
        );
        assert_eq!(
            notices.snapshot(),
            vec![Notice::error("Name must be at least 2 characters")]
        );
    }

    #[tokio::test]
    async fn rejected_names_report_the_server_message() {
        let mut service = MockCustomerSessionService::new();
        service.expect_set_session().returning(|_| {
            Err(ApiError::Rejected {
                status: 400,
                message: "Name contains invalid characters".to_string(),
            })
        });

        let (mut session, notices) = session(service);

        assert!(session.set_name("Asha").await.is_err(), "set_name should fail");
        assert_eq!(
            notices.snapshot(),
            vec![Notice::error("Name contains invalid characters")]
        );
        assert_eq!(session.name(), None);
    }

    #[tokio::test]
    async fn clear_forgets_the_name() -> TestResult {
        let mut service = MockCustomerSessionService::new();
        service
            .expect_get_session()
            .returning(|| Ok(Some("Asha".to_string())));
        service.expect_clear_session().times(1).returning(|| Ok(()));

        let (mut session, notices) = session(service);

        session.load().await;
        session.clear().await?;

        assert_eq!(session.state(), &CustomerState::Anonymous);
        assert_eq!(
            notices.snapshot(),
            vec![Notice::success("Session cleared successfully")]
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_clear_keeps_the_name() {
        let mut service = MockCustomerSessionService::new();
        service
            .expect_get_session()
            .returning(|| Ok(Some("Asha".to_string())));
        service
            .expect_clear_session()
            .returning(|| Err(ApiError::NotFound));

        let (mut session, notices) = session(service);

        session.load().await;

        assert!(session.clear().await.is_err(), "clear should fail");
        assert_eq!(session.name(), Some("Asha"));
        assert_eq!(notices.snapshot(), vec![Notice::error("Failed to clear session")]);
    }
}
