use std::io::{self, Write};

use clap::{Args, Subcommand};
use jiff::{Zoned, civil::Date, tz::TimeZone};
use storefront::{
    format::{format_currency, format_date},
    notices::Notice,
    orders::OrderStatus,
};
use storefront_app::{
    api::ApiError,
    auth::{AdminSession, Credentials, Registration},
    catalog::{NewProduct, ProductDraft},
    orders::{OrderPage, OrderQuery, OrderSort},
    routes::Route,
    stats::{Analytics, AnalyticsRange, DashboardStats},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use zeroize::Zeroize;

use super::{emit, write_order};
use crate::shell::{SharedStorage, Shell, Unused, admit};

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Log in as an administrator
    Login(LoginArgs),

    /// Log out and forget the stored token
    Logout,

    /// Create another administrator account
    Register(RegisterArgs),

    /// List orders
    Orders(ListOrdersArgs),

    /// Show one order
    Order {
        /// Order identifier
        id: String,
    },

    /// Change the status of an order
    SetStatus {
        /// Order identifier
        id: String,

        /// New status (pending, preparing, ready, completed, cancelled)
        status: String,
    },

    /// Show the dashboard figures
    Dashboard,

    /// Show sales analytics over a date range
    Analytics(AnalyticsArgs),

    /// Add a product to the catalog
    AddProduct(ProductArgs),

    /// Edit a catalog product; omitted fields keep their current value
    EditProduct {
        /// Product identifier
        id: String,

        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Remove a product from the catalog
    DeleteProduct {
        /// Product identifier
        id: String,
    },
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "STOREFRONT_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "STOREFRONT_REGISTER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Display name
    #[arg(long)]
    name: Option<String>,

    /// Account role
    #[arg(long)]
    role: Option<String>,
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// Only orders in this status
    #[arg(long)]
    status: Option<String>,

    /// Text to search for in customer names and phone numbers
    #[arg(long)]
    search: Option<String>,

    /// Earliest order date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<Date>,

    /// Latest order date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<Date>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = 10)]
    limit: u32,
}

#[derive(Debug, Args)]
struct AnalyticsArgs {
    /// First day of the range (YYYY-MM-DD); defaults to 30 days before `to`
    #[arg(long)]
    from: Option<Date>,

    /// Last day of the range (YYYY-MM-DD); defaults to today
    #[arg(long)]
    to: Option<Date>,
}

#[derive(Debug, Args)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    price: Option<String>,

    /// Category; use "Other" together with --custom-category for a new one
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    custom_category: Option<String>,

    /// Units in stock; zero marks the product out of stock
    #[arg(long)]
    stock: Option<String>,

    /// Unit of sale, e.g. kg
    #[arg(long)]
    unit: Option<String>,

    /// Maximum quantity per order
    #[arg(long)]
    max_quantity: Option<String>,

    #[arg(long)]
    image_url: Option<String>,
}

impl ProductArgs {
    /// Overlay the given fields on `draft`.
    fn apply(self, draft: &mut ProductDraft) {
        let fields = [
            (self.name, &mut draft.name),
            (self.description, &mut draft.description),
            (self.price, &mut draft.price),
            (self.category, &mut draft.category),
            (self.custom_category, &mut draft.custom_category),
            (self.stock, &mut draft.stock),
            (self.unit, &mut draft.unit),
            (self.max_quantity, &mut draft.max_quantity),
            (self.image_url, &mut draft.image_url),
        ];

        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

pub(crate) async fn run(command: AdminCommand, shell: &Shell) -> Result<(), String> {
    let mut session = shell.admin().await;

    let route = match &command.command {
        AdminSubcommand::Login(_) => Route::AdminLogin,
        AdminSubcommand::Logout | AdminSubcommand::Dashboard => Route::AdminDashboard,
        AdminSubcommand::Orders(_) => Route::AdminOrders,
        AdminSubcommand::Order { id } | AdminSubcommand::SetStatus { id, .. } => {
            Route::AdminOrderDetail(id.clone())
        }
        AdminSubcommand::Analytics(_) => Route::AdminAnalytics,
        AdminSubcommand::AddProduct(_) => Route::AdminAddProduct,
        AdminSubcommand::EditProduct { id, .. } => Route::AdminEditProduct(id.clone()),
        AdminSubcommand::Register(_) | AdminSubcommand::DeleteProduct { .. } => {
            Route::AdminProducts
        }
    };

    if let (Route::AdminLogin, Some(user)) = (&route, session.user()) {
        return Err(format!("already logged in as {}", user.email));
    }

    admit(&route, &session, &Unused)?;

    match command.command {
        AdminSubcommand::Login(args) => login(args, &mut session).await,
        AdminSubcommand::Logout => {
            session.logout().await;
            Ok(())
        }
        AdminSubcommand::Register(args) => register(args, &session).await,
        AdminSubcommand::Orders(args) => orders(args, shell, &mut session).await,
        AdminSubcommand::Order { id } => order(&id, shell, &mut session).await,
        AdminSubcommand::SetStatus { id, status } => {
            set_status(&id, &status, shell, &mut session).await
        }
        AdminSubcommand::Dashboard => dashboard(shell, &mut session).await,
        AdminSubcommand::Analytics(args) => analytics(args, shell, &mut session).await,
        AdminSubcommand::AddProduct(fields) => add_product(fields, shell, &mut session).await,
        AdminSubcommand::EditProduct { id, fields } => {
            edit_product(&id, fields, shell, &mut session).await
        }
        AdminSubcommand::DeleteProduct { id } => delete_product(&id, shell, &mut session).await,
    }
}

/// Report an API failure, dropping the session when the token was rejected.
fn failed(session: &mut AdminSession<SharedStorage>, action: &str, error: &ApiError) -> String {
    session.observe(error);

    format!("failed to {action}: {error}")
}

async fn login(args: LoginArgs, session: &mut AdminSession<SharedStorage>) -> Result<(), String> {
    let mut password = args.password;
    let credentials = Credentials::new(args.email, password.as_str());
    password.zeroize();

    let user = session
        .login(&credentials)
        .await
        .map_err(|error| format!("login failed: {error}"))?;

    println!("logged in as {}", user.display_name());

    Ok(())
}

async fn register(args: RegisterArgs, session: &AdminSession<SharedStorage>) -> Result<(), String> {
    let registration = Registration {
        name: args.name,
        email: args.email,
        password: args.password,
        role: args.role,
    };

    let user = session
        .register(&registration)
        .await
        .map_err(|error| format!("registration failed: {error}"))?;

    println!("registered {}", user.email);

    Ok(())
}

async fn orders(
    args: ListOrdersArgs,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let query = OrderQuery {
        status: args.status.map(OrderStatus::from),
        search: args.search,
        from: args.from,
        to: args.to,
        page: Some(args.page),
        limit: Some(args.limit),
        sort: Some(OrderSort::newest_first()),
    };

    let page = match shell.context.orders.list_orders(query).await {
        Ok(page) => page,
        Err(error) => return Err(failed(session, "list orders", &error)),
    };

    let zone = TimeZone::system();

    emit(|out| write_orders(out, &page, args.page, args.limit, &zone))
}

async fn order(
    id: &str,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let order = match shell.context.orders.get_admin_order(id).await {
        Ok(order) => order,
        Err(error) => return Err(failed(session, "load order", &error)),
    };

    let zone = TimeZone::system();

    emit(|out| {
        write_order(out, &order, &zone)?;

        for change in &order.status_history {
            let at = change
                .timestamp
                .map(|at| format_date(at, &zone))
                .unwrap_or_default();

            writeln!(out, "  history: {} {at}", change.status.label())?;
        }

        Ok(())
    })
}

async fn set_status(
    id: &str,
    status: &str,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let status = OrderStatus::from(status);

    if let OrderStatus::Other(unknown) = &status {
        let known: Vec<&str> = OrderStatus::KNOWN.iter().map(OrderStatus::as_str).collect();

        return Err(format!(
            "unknown status {unknown}; expected one of {}",
            known.join(", ")
        ));
    }

    let notifier = shell.notifier();

    match shell
        .context
        .orders
        .update_order_status(id, status.clone())
        .await
    {
        Ok(()) => {
            notifier.notify(Notice::success(format!(
                "Order status updated to {}",
                status.as_str()
            )));
            Ok(())
        }
        Err(error) => {
            notifier.notify(Notice::error(
                "Failed to update order status. Please try again.",
            ));
            Err(failed(session, "update order status", &error))
        }
    }
}

async fn dashboard(shell: &Shell, session: &mut AdminSession<SharedStorage>) -> Result<(), String> {
    let stats = match shell.context.stats.dashboard().await {
        Ok(stats) => stats,
        Err(error) => return Err(failed(session, "load dashboard", &error)),
    };

    if let Some(user) = session.user() {
        println!("Welcome, {}", user.display_name());
    }

    emit(|out| write_dashboard(out, &stats))
}

async fn analytics(
    args: AnalyticsArgs,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let to = args.to.unwrap_or_else(|| Zoned::now().date());
    let from = args.from.unwrap_or_else(|| {
        AnalyticsRange::ending(to, AnalyticsRange::DEFAULT_DAYS).start()
    });

    let range = AnalyticsRange::new(from, to).map_err(|error| error.to_string())?;

    let analytics = match shell.context.stats.analytics(range).await {
        Ok(analytics) => analytics,
        Err(error) => return Err(failed(session, "load analytics", &error)),
    };

    emit(|out| write_analytics(out, range, &analytics))
}

async fn add_product(
    fields: ProductArgs,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let mut draft = ProductDraft::default();
    fields.apply(&mut draft);

    let product = validated(&draft)?;

    match shell.context.catalog.create_product(product).await {
        Ok(created) => {
            shell
                .notifier()
                .notify(Notice::success("Product added successfully"));
            println!("product_id: {}", created.id);
            Ok(())
        }
        Err(error) => Err(failed(session, "add product", &error)),
    }
}

async fn edit_product(
    id: &str,
    fields: ProductArgs,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let current = match shell.context.catalog.get_product(id).await {
        Ok(product) => product,
        Err(error) => return Err(failed(session, "load product", &error)),
    };

    let mut draft = ProductDraft::from(&current);
    fields.apply(&mut draft);

    let product = validated(&draft)?;

    match shell.context.catalog.update_product(id, product).await {
        Ok(_) => {
            shell
                .notifier()
                .notify(Notice::success("Product updated successfully"));
            Ok(())
        }
        Err(error) => Err(failed(session, "update product", &error)),
    }
}

async fn delete_product(
    id: &str,
    shell: &Shell,
    session: &mut AdminSession<SharedStorage>,
) -> Result<(), String> {
    let name = match shell.context.catalog.get_product(id).await {
        Ok(product) => product.name,
        Err(_) => id.to_string(),
    };

    match shell.context.catalog.delete_product(id).await {
        Ok(()) => {
            shell
                .notifier()
                .notify(Notice::success(format!("{name} has been deleted")));
            Ok(())
        }
        Err(error) => {
            shell
                .notifier()
                .notify(Notice::error("Failed to delete product. Please try again."));
            Err(failed(session, "delete product", &error))
        }
    }
}

fn validated(draft: &ProductDraft) -> Result<NewProduct, String> {
    draft.validate().map_err(|errors| {
        errors
            .entries()
            .map(|field| format!("{}: {}", field.field, field.message))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn write_orders(
    out: &mut impl Write,
    page: &OrderPage,
    current: u32,
    per_page: u32,
    zone: &TimeZone,
) -> io::Result<()> {
    if page.orders.is_empty() {
        return writeln!(out, "No orders found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Customer", "Phone", "Items", "Total", "Status", "Placed"]);

    for order in &page.orders {
        builder.push_record([
            order.id.clone(),
            order.customer_name.clone(),
            order.phone.clone(),
            order.item_count().to_string(),
            format_currency(order.total_amount()),
            order.status.label().to_string(),
            order
                .created_at
                .map(|at| format_date(at, zone))
                .unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        " Page {current} of {} ({} orders)",
        page.page_count(per_page).max(1),
        page.total
    )
}

fn write_dashboard(out: &mut impl Write, stats: &DashboardStats) -> io::Result<()> {
    writeln!(out, "total_orders: {} ({:+}%)", stats.total_orders, stats.orders_trend)?;
    writeln!(
        out,
        "total_revenue: {} ({:+}%)",
        format_currency(stats.total_revenue),
        stats.revenue_trend
    )?;
    writeln!(out, "total_products: {}", stats.total_products)?;
    writeln!(out, "pending_orders: {}", stats.pending_orders)?;

    for status in &OrderStatus::KNOWN {
        writeln!(
            out,
            "  {}: {} ({}%)",
            status.label(),
            stats.status_distribution.count(status),
            stats.status_distribution.percentage(status)
        )?;
    }

    for product in &stats.low_stock_products {
        writeln!(
            out,
            "  low stock: {} ({} {})",
            product.name.as_deref().unwrap_or("Unknown product"),
            product.stock,
            product.unit.as_deref().unwrap_or("pcs")
        )?;
    }

    for product in &stats.top_selling_products {
        writeln!(
            out,
            "  top seller: {} ({} sold, {})",
            product.name.as_deref().unwrap_or("Unknown product"),
            product.total_sold,
            format_currency(product.revenue)
        )?;
    }

    Ok(())
}

fn write_analytics(
    out: &mut impl Write,
    range: AnalyticsRange,
    analytics: &Analytics,
) -> io::Result<()> {
    writeln!(out, "range: {} to {}", range.start(), range.end())?;
    writeln!(out, "orders: {} ({:+}%)", analytics.order_count, analytics.order_growth)?;
    writeln!(
        out,
        "revenue: {} ({:+}%)",
        format_currency(analytics.total_revenue),
        analytics.revenue_growth
    )?;
    writeln!(
        out,
        "average_order_value: {} ({:+}%)",
        format_currency(analytics.average_order_value),
        analytics.aov_growth
    )?;
    writeln!(
        out,
        "completion_rate: {}% ({:+}%)",
        analytics.completion_rate, analytics.completion_rate_growth
    )?;

    if let Some(daily) = &analytics.daily_revenue {
        for (label, day) in [("best_day", &daily.highest_day), ("worst_day", &daily.lowest_day)] {
            if let Some(day) = day {
                writeln!(out, "{label}: {} {}", day.date, format_currency(day.revenue))?;
            }
        }
    }

    for status in &OrderStatus::KNOWN {
        writeln!(
            out,
            "  {}: {} ({}%)",
            status.label(),
            analytics.status_distribution.count(status),
            analytics.status_distribution.percentage(status)
        )?;
    }

    for product in &analytics.top_products {
        writeln!(
            out,
            "  top product: {} ({} sold, {})",
            product.name.as_deref().unwrap_or("Unknown product"),
            product.total_sold,
            format_currency(product.revenue)
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn edit_fields_overlay_the_current_product() {
        let mut draft = ProductDraft {
            name: "Milk".to_string(),
            price: "50".to_string(),
            ..ProductDraft::default()
        };

        ProductArgs {
            name: None,
            description: None,
            price: Some("55".to_string()),
            category: None,
            custom_category: None,
            stock: None,
            unit: None,
            max_quantity: None,
            image_url: None,
        }
        .apply(&mut draft);

        assert_eq!(draft.name, "Milk");
        assert_eq!(draft.price, "55");
    }

    #[test]
    fn product_form_errors_are_listed_per_field() {
        let result = validated(&ProductDraft::default());

        let Err(message) = result else {
            panic!("empty draft should be rejected");
        };

        assert!(message.contains("name: Product name is required"), "{message}");
        assert!(message.contains("price: Price is required"), "{message}");
    }

    #[test]
    fn order_listing_reports_paging() -> TestResult {
        let page = OrderPage {
            orders: vec![serde_json::from_value(serde_json::json!({
                "_id": "o1",
                "customerName": "Asha",
                "phone": "9876543210",
                "items": [{"product": "p1", "quantity": 2, "price": 50}],
                "totalAmount": 100
            }))?],
            total: 21,
        };

        let mut out = Vec::new();
        write_orders(&mut out, &page, 2, 10, &TimeZone::UTC)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Asha"), "{text}");
        assert!(text.contains("Page 2 of 3 (21 orders)"), "{text}");

        Ok(())
    }

    #[test]
    fn analytics_summary_names_the_range() -> TestResult {
        let range = AnalyticsRange::new(date(2026, 9, 18), date(2026, 10, 18))?;
        let analytics = Analytics {
            order_count: 4,
            total_revenue: Decimal::from(400),
            ..Analytics::default()
        };

        let mut out = Vec::new();
        write_analytics(&mut out, range, &analytics)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("range: 2026-09-18 to 2026-10-18"), "{text}");
        assert!(text.contains("orders: 4"), "{text}");

        Ok(())
    }
}
