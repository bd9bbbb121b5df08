//! Per-invocation state shared by every command.

use std::sync::Arc;

use storefront::{
    cart::CartStore,
    notices::{NoticeLog, Notifier},
    storage::{FileStorage, Storage},
};
use storefront_app::{
    auth::AdminSession,
    checkout::Checkout,
    confirmation::LastOrderCache,
    context::AppContext,
    customers::CustomerSession,
    routes::{Access, Capability, Presence, Route, guard},
};
use tracing::{debug, error};

use crate::config::Settings;

/// Storage key holding the API session cookies between invocations.
pub(crate) const COOKIES_STORAGE_KEY: &str = "cookies";

pub(crate) type SharedStorage = Arc<FileStorage>;

pub(crate) struct Shell {
    pub(crate) context: AppContext,
    pub(crate) storage: SharedStorage,
    pub(crate) notices: Arc<NoticeLog>,
}

impl Shell {
    pub(crate) fn open(settings: &Settings) -> Result<Self, String> {
        let storage = FileStorage::open(&settings.data_dir).map_err(|error| {
            format!(
                "failed to open data directory {}: {error}",
                settings.data_dir.display()
            )
        })?;

        let context = AppContext::from_api_config(&settings.api_config())
            .map_err(|error| format!("failed to configure API client: {error}"))?;

        match storage.get(COOKIES_STORAGE_KEY) {
            Ok(Some(cookies)) => context.client.import_cookies(&cookies),
            Ok(None) => {}
            Err(error) => error!(%error, "failed to read saved cookies"),
        }

        debug!(api = %context.client.base_url(), "shell opened");

        Ok(Self {
            context,
            storage: Arc::new(storage),
            notices: Arc::new(NoticeLog::new()),
        })
    }

    pub(crate) fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notices) as Arc<dyn Notifier>
    }

    /// The persisted cart, clamped to its stock ceilings.
    pub(crate) fn cart(&self) -> CartStore<SharedStorage> {
        let mut cart = CartStore::open(Arc::clone(&self.storage), self.notifier());
        cart.reconcile();
        cart
    }

    /// The customer session, loaded from the API.
    pub(crate) async fn customer(&self) -> CustomerSession {
        let mut session =
            CustomerSession::new(Arc::clone(&self.context.customers), self.notifier());
        session.load().await;
        session
    }

    /// The admin session, verified against the API when a token is stored.
    pub(crate) async fn admin(&self) -> AdminSession<SharedStorage> {
        let mut session = AdminSession::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.context.auth),
            self.notifier(),
        );
        session.check(jiff::Timestamp::now()).await;
        session
    }

    pub(crate) fn confirmations(&self) -> LastOrderCache<SharedStorage> {
        LastOrderCache::new(Arc::clone(&self.storage))
    }

    pub(crate) fn checkout(&self) -> Checkout {
        Checkout::new(Arc::clone(&self.context.orders), self.notifier())
    }

    /// Print pending notices and save the session cookies.
    pub(crate) fn finish(&self) {
        for notice in self.notices.drain() {
            println!("{notice}");
        }

        let Some(cookies) = self.context.client.export_cookies() else {
            return;
        };

        if let Err(error) = self.storage.set(COOKIES_STORAGE_KEY, &cookies) {
            error!(%error, "failed to save cookies");
        }
    }
}

/// A session that is never consulted for the route at hand.
pub(crate) struct Unused;

impl Capability for Unused {
    fn presence(&self) -> Presence {
        Presence::Absent
    }
}

/// Refuse to run a command whose page the sessions would not allow.
pub(crate) fn admit(
    route: &Route,
    admin: &dyn Capability,
    customer: &dyn Capability,
) -> Result<(), String> {
    match guard(route, admin, customer) {
        Access::Allow => Ok(()),
        Access::Pending => Err(format!("{route} is still waiting for a session check")),
        Access::Redirect(Route::CustomerName) => {
            Err("set your name first: storefront customer set-name <name>".to_string())
        }
        Access::Redirect(Route::AdminLogin) => {
            Err("log in first: storefront admin login --email <email>".to_string())
        }
        Access::Redirect(target) => Err(format!("{route} is not available; go to {target}")),
    }
}

#[cfg(test)]
mod tests {
    use storefront::{cart::CART_STORAGE_KEY, notices::NoticeLevel};
    use testresult::TestResult;

    use super::*;

    struct Named;

    impl Capability for Named {
        fn presence(&self) -> Presence {
            Presence::Present
        }
    }

    #[test]
    fn cart_commands_need_a_customer_name() {
        let result = admit(&Route::Cart, &Unused, &Unused);

        assert_eq!(
            result,
            Err("set your name first: storefront customer set-name <name>".to_string())
        );
        assert_eq!(admit(&Route::Cart, &Unused, &Named), Ok(()));
    }

    #[test]
    fn admin_commands_need_a_login() {
        let result = admit(&Route::AdminOrders, &Unused, &Named);

        assert_eq!(
            result,
            Err("log in first: storefront admin login --email <email>".to_string())
        );
        assert_eq!(admit(&Route::AdminOrders, &Named, &Unused), Ok(()));
    }

    #[test]
    fn other_redirects_name_their_target() {
        assert_eq!(
            admit(&Route::CustomerName, &Unused, &Named),
            Err("/customer-name is not available; go to /".to_string())
        );
    }

    #[test]
    fn opened_carts_are_clamped_to_their_ceilings() -> TestResult {
        let dir = tempfile::tempdir()?;
        let raw = r#"[{"id":"p1","name":"Milk","unitPrice":"50","unit":"ltr","quantity":5,"maxQuantity":3,"inStock":true}]"#;
        FileStorage::open(dir.path())?.set(CART_STORAGE_KEY, raw)?;

        let settings = Settings {
            api_url: "http://localhost:5000/api".to_string(),
            data_dir: dir.path().to_path_buf(),
            timeout_seconds: 10,
        };
        let shell = Shell::open(&settings)?;

        let cart = shell.cart();

        assert_eq!(cart.get("p1").map(|item| item.quantity), Some(3));
        assert_eq!(shell.notices.count(NoticeLevel::Warning), 1);

        let reopened = shell.cart();

        assert_eq!(reopened.get("p1").map(|item| item.quantity), Some(3));
        assert_eq!(shell.notices.count(NoticeLevel::Warning), 1, "clamp is persisted");

        Ok(())
    }
}
