//! Route guards
//!
//! Pages are gated on two independent sessions: the named customer session
//! for the cart and checkout, and the authenticated admin session for the
//! admin area. Both are consulted through [`Capability`].

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Whether a session currently grants its capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The session is still being established.
    Checking,

    /// The capability is not held.
    Absent,

    /// The capability is held.
    Present,
}

/// A session that can gate routes.
pub trait Capability {
    /// Current state of the session.
    fn presence(&self) -> Presence;
}

/// Every page of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,

    /// `/products`
    Products,

    /// `/customer-name`
    CustomerName,

    /// `/cart`
    Cart,

    /// `/checkout`
    Checkout,

    /// `/order-confirmation/{id}`
    OrderConfirmation(String),

    /// `/admin/login`
    AdminLogin,

    /// `/admin/dashboard`
    AdminDashboard,

    /// `/admin/products`
    AdminProducts,

    /// `/admin/products/add`
    AdminAddProduct,

    /// `/admin/products/edit/{id}`
    AdminEditProduct(String),

    /// `/admin/orders`
    AdminOrders,

    /// `/admin/orders/{id}`
    AdminOrderDetail(String),

    /// `/admin/analytics`
    AdminAnalytics,

    /// Any other path, kept as given
    NotFound(String),
}

/// Which session a route needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone may visit.
    Public,

    /// Needs a named customer session.
    Customer,

    /// Needs an authenticated administrator.
    Admin,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Show the page.
    Allow,

    /// A session is still loading; show a placeholder.
    Pending,

    /// Send the visitor elsewhere.
    Redirect(Route),
}

impl Route {
    /// Match a path such as `"/admin/orders/42?tab=items"`.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["products"] => Route::Products,
            ["customer-name"] => Route::CustomerName,
            ["cart"] => Route::Cart,
            ["checkout"] => Route::Checkout,
            ["order-confirmation", id] => Route::OrderConfirmation((*id).to_string()),
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "products"] => Route::AdminProducts,
            ["admin", "products", "add"] => Route::AdminAddProduct,
            ["admin", "products", "edit", id] => Route::AdminEditProduct((*id).to_string()),
            ["admin", "orders"] => Route::AdminOrders,
            ["admin", "orders", id] => Route::AdminOrderDetail((*id).to_string()),
            ["admin", "analytics"] => Route::AdminAnalytics,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Products => "/products".to_string(),
            Route::CustomerName => "/customer-name".to_string(),
            Route::Cart => "/cart".to_string(),
            Route::Checkout => "/checkout".to_string(),
            Route::OrderConfirmation(id) => format!("/order-confirmation/{id}"),
            Route::AdminLogin => "/admin/login".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminProducts => "/admin/products".to_string(),
            Route::AdminAddProduct => "/admin/products/add".to_string(),
            Route::AdminEditProduct(id) => format!("/admin/products/edit/{id}"),
            Route::AdminOrders => "/admin/orders".to_string(),
            Route::AdminOrderDetail(id) => format!("/admin/orders/{id}"),
            Route::AdminAnalytics => "/admin/analytics".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Which session this page needs.
    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Cart | Route::Checkout => Requirement::Customer,
            Route::AdminDashboard
            | Route::AdminProducts
            | Route::AdminAddProduct
            | Route::AdminEditProduct(_)
            | Route::AdminOrders
            | Route::AdminOrderDetail(_)
            | Route::AdminAnalytics => Requirement::Admin,
            Route::Home
            | Route::Products
            | Route::CustomerName
            | Route::OrderConfirmation(_)
            | Route::AdminLogin
            | Route::NotFound(_) => Requirement::Public,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.path())
    }
}

/// Decide whether `route` may be shown given the two sessions.
pub fn guard(route: &Route, admin: &dyn Capability, customer: &dyn Capability) -> Access {
    match route {
        // Open without a customer name once the session has loaded.
        Route::OrderConfirmation(_) => match customer.presence() {
            Presence::Checking => Access::Pending,
            Presence::Absent | Presence::Present => Access::Allow,
        },
        Route::CustomerName if customer.presence() == Presence::Present => {
            Access::Redirect(Route::Home)
        }
        Route::AdminLogin if admin.presence() == Presence::Present => {
            Access::Redirect(Route::AdminDashboard)
        }
        _ => match route.requirement() {
            Requirement::Public => Access::Allow,
            Requirement::Customer => require(customer, Route::CustomerName),
            Requirement::Admin => require(admin, Route::AdminLogin),
        },
    }
}

fn require(session: &dyn Capability, fallback: Route) -> Access {
    match session.presence() {
        Presence::Checking => Access::Pending,
        Presence::Absent => Access::Redirect(fallback),
        Presence::Present => Access::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Presence);

    impl Capability for Fixed {
        fn presence(&self) -> Presence {
            self.0
        }
    }

    const CHECKING: Fixed = Fixed(Presence::Checking);
    const ABSENT: Fixed = Fixed(Presence::Absent);
    const PRESENT: Fixed = Fixed(Presence::Present);

    #[test]
    fn parses_every_page() {
        let cases = [
            ("/", Route::Home),
            ("/products", Route::Products),
            ("/customer-name", Route::CustomerName),
            ("/cart/", Route::Cart),
            ("/checkout", Route::Checkout),
            ("/order-confirmation/abc", Route::OrderConfirmation("abc".to_string())),
            ("/admin/login", Route::AdminLogin),
            ("/admin/dashboard", Route::AdminDashboard),
            ("/admin/products", Route::AdminProducts),
            ("/admin/products/add", Route::AdminAddProduct),
            ("/admin/products/edit/p1", Route::AdminEditProduct("p1".to_string())),
            ("/admin/orders?page=2", Route::AdminOrders),
            ("/admin/orders/o1", Route::AdminOrderDetail("o1".to_string())),
            ("/admin/analytics", Route::AdminAnalytics),
            ("/admin", Route::NotFound("/admin".to_string())),
        ];

        for (path, expected) in cases {
            assert_eq!(Route::parse(path), expected, "{path}");
        }
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            Route::OrderConfirmation("o9".to_string()),
            Route::AdminEditProduct("p3".to_string()),
            Route::AdminAddProduct,
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn cart_and_checkout_need_a_customer_name() {
        for route in [Route::Cart, Route::Checkout] {
            assert_eq!(
                guard(&route, &PRESENT, &ABSENT),
                Access::Redirect(Route::CustomerName),
                "{route}"
            );
            assert_eq!(guard(&route, &ABSENT, &PRESENT), Access::Allow, "{route}");
            assert_eq!(guard(&route, &ABSENT, &CHECKING), Access::Pending, "{route}");
        }
    }

    #[test]
    fn admin_pages_need_an_admin() {
        let route = Route::AdminOrderDetail("o1".to_string());

        assert_eq!(
            guard(&route, &ABSENT, &PRESENT),
            Access::Redirect(Route::AdminLogin)
        );
        assert_eq!(guard(&route, &CHECKING, &PRESENT), Access::Pending);
        assert_eq!(guard(&route, &PRESENT, &ABSENT), Access::Allow);
    }

    #[test]
    fn confirmation_is_open_once_the_customer_session_has_loaded() {
        let route = Route::OrderConfirmation("o1".to_string());

        assert_eq!(guard(&route, &ABSENT, &ABSENT), Access::Allow);
        assert_eq!(guard(&route, &ABSENT, &PRESENT), Access::Allow);
        assert_eq!(guard(&route, &ABSENT, &CHECKING), Access::Pending);
    }

    #[test]
    fn named_customers_skip_the_name_page() {
        assert_eq!(
            guard(&Route::CustomerName, &ABSENT, &PRESENT),
            Access::Redirect(Route::Home)
        );
        assert_eq!(guard(&Route::CustomerName, &ABSENT, &ABSENT), Access::Allow);
    }

    #[test]
    fn signed_in_admins_skip_the_login_page() {
        assert_eq!(
            guard(&Route::AdminLogin, &PRESENT, &ABSENT),
            Access::Redirect(Route::AdminDashboard)
        );
        assert_eq!(guard(&Route::AdminLogin, &ABSENT, &ABSENT), Access::Allow);
    }

    #[test]
    fn public_pages_are_always_open() {
        for route in [Route::Home, Route::Products, Route::NotFound("/x".to_string())] {
            assert_eq!(guard(&route, &ABSENT, &CHECKING), Access::Allow, "{route}");
        }
    }
}
