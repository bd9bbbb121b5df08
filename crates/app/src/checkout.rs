//! Checkout
//!
//! Turns the cart into an order. The contact form is validated first, then
//! the customer session and the cart are checked, and only then is the order
//! submitted. A successful submission caches the order for the confirmation
//! page and empties the cart; a failed one leaves the cart untouched.

use std::sync::Arc;

use jiff::Timestamp;
use storefront::{
    cart::{CartLineItem, CartStore, CartTotals},
    notices::{Notice, Notifier},
    storage::Storage,
};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    api::ApiError,
    confirmation::LastOrderCache,
    customers::CustomerSession,
    forms::FormErrors,
    orders::{NewOrder, NewOrderLine, Order, OrderService},
};

/// Notes sent when the customer leaves the field blank.
pub const DEFAULT_NOTES: &str = "No special instructions";

const PHONE_DIGITS: usize = 10;

/// Why an order was not placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields failed validation.
    #[error("checkout form is invalid: {0}")]
    InvalidForm(FormErrors),

    /// The customer session has no name.
    #[error("Please set your name before checkout")]
    MissingCustomer,

    /// There is nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The order service failed or refused the order.
    #[error("failed to place order")]
    Api(#[from] ApiError),
}

/// Contact details as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Phone number, in any punctuation
    pub phone: String,

    /// Email address; may be blank
    pub email: String,

    /// Special instructions; may be blank
    pub notes: String,
}

/// Contact details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    /// Phone number as entered, trimmed
    pub phone: String,

    /// Email address, when one was given
    pub email: Option<String>,

    /// Special instructions, or [`DEFAULT_NOTES`]
    pub notes: String,
}

impl CheckoutForm {
    /// # Errors
    ///
    /// Returns every field message when the phone number is missing or does
    /// not have ten digits, or the email is present but malformed.
    pub fn validate(&self) -> Result<ContactDetails, FormErrors> {
        let mut errors = FormErrors::new();

        let email = match self.email.trim() {
            "" => None,
            email if looks_like_email(email) => Some(email.to_string()),
            _ => {
                errors.push("email", "Email is invalid");
                None
            }
        };

        let phone = self.phone.trim();

        if phone.is_empty() {
            errors.push("phone", "Phone number is required");
        } else if phone.chars().filter(char::is_ascii_digit).count() != PHONE_DIGITS {
            errors.push("phone", "Phone number must be 10 digits");
        }

        let notes = match self.notes.trim() {
            "" => DEFAULT_NOTES,
            notes => notes,
        };

        errors.into_result(ContactDetails {
            phone: phone.to_string(),
            email,
            notes: notes.to_string(),
        })
    }
}

/// Something shaped like `a@b.c` somewhere in the text.
fn looks_like_email(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        let Some(at) = token.bytes().skip(1).position(|byte| byte == b'@') else {
            return false;
        };

        let at = at + 1;

        token
            .rfind('.')
            .is_some_and(|dot| dot > at + 1 && dot + 1 < token.len())
    })
}

/// Build the order request for the given cart contents.
pub fn build_order(
    customer_name: &str,
    contact: ContactDetails,
    items: &[CartLineItem],
    totals: CartTotals,
) -> NewOrder {
    NewOrder {
        customer_name: customer_name.to_string(),
        phone: contact.phone,
        email: contact.email,
        items: items.iter().map(NewOrderLine::from).collect(),
        subtotal: totals.total(),
        total: totals.total(),
        notes: Some(contact.notes),
    }
}

/// Places orders on behalf of the named customer.
pub struct Checkout {
    orders: Arc<dyn OrderService>,
    notifier: Arc<dyn Notifier>,
}

impl Checkout {
    /// Place orders through `orders`, reporting to `notifier`.
    pub fn new(orders: Arc<dyn OrderService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { orders, notifier }
    }

    /// Submit the cart as an order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidForm`] with the field messages when the
    /// form fails validation, [`CheckoutError::MissingCustomer`] without a
    /// customer name, [`CheckoutError::EmptyCart`] for an empty cart, and
    /// [`CheckoutError::Api`] when the order is rejected. The cart is only
    /// cleared on success.
    ///
    /// Quantities above their stock ceiling are clamped before the order is
    /// built.
    pub async fn place_order<S: Storage, C: Storage>(
        &self,
        form: &CheckoutForm,
        customer: &CustomerSession,
        cart: &mut CartStore<S>,
        confirmations: &LastOrderCache<C>,
        now: Timestamp,
    ) -> Result<Order, CheckoutError> {
        let contact = form.validate().map_err(CheckoutError::InvalidForm)?;

        let Some(customer_name) = customer.name() else {
            self.notifier
                .notify(Notice::error(CheckoutError::MissingCustomer.to_string()));
            return Err(CheckoutError::MissingCustomer);
        };

        if cart.is_empty() {
            self.notifier
                .notify(Notice::info(CheckoutError::EmptyCart.to_string()));
            return Err(CheckoutError::EmptyCart);
        }

        cart.reconcile();

        let request = build_order(customer_name, contact, cart.items(), cart.totals());

        let order = match self.orders.create_order(request).await {
            Ok(order) => order,
            Err(error) => {
                error!(%error, "failed to place order");

                self.notifier.notify(Notice::error(
                    error.user_message("Failed to place order. Please try again."),
                ));

                return Err(error.into());
            }
        };

        info!(order_id = %order.id, items = order.items.len(), "order placed");

        if let Err(error) = confirmations.store(&order, customer_name, now) {
            error!(%error, order_id = %order.id, "failed to cache placed order");
        }

        cart.clear();

        self.notifier
            .notify(Notice::success("Your order has been placed successfully!"));

        Ok(order)
    }
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout").finish_non_exhaustive()
    }
}
