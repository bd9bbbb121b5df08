//! Order confirmation
//!
//! The order returned by a successful checkout is cached locally for a short
//! while so the confirmation page can be shown, and re-shown on refresh,
//! without another round trip. After that the order is fetched through the
//! public endpoint, which needs a named customer session. Without one the
//! visitor gets an unverified "order placed" acknowledgement.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use storefront::storage::{Storage, StorageError};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    api::ApiError,
    orders::{Order, OrderService},
    routes::{Capability, Presence},
};

/// Storage key holding the most recently placed order.
pub const LAST_ORDER_KEY: &str = "lastOrder";

/// How long a cached order may be shown.
pub const CONFIRMATION_TTL: SignedDuration = SignedDuration::from_mins(5);

/// Failures while caching or resolving a confirmation.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    /// The order id is blank.
    #[error("Invalid order ID")]
    InvalidOrderId,

    /// The order could not be serialized.
    #[error("failed to encode order")]
    Encode(#[from] serde_json::Error),

    /// The record could not be written.
    #[error("failed to cache order")]
    Storage(#[from] StorageError),
}

/// The cached record of the most recent order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOrder {
    /// Identifier of the placed order
    pub order_id: String,

    /// Name the order was placed under
    pub customer_name: String,

    /// The order as returned by the API
    pub order_data: Order,

    /// When the record was written
    pub saved_at: Timestamp,
}

/// The most recently placed order, kept in session-scoped storage.
#[derive(Debug)]
pub struct LastOrderCache<S: Storage> {
    storage: S,
    ttl: SignedDuration,
}

impl<S: Storage> LastOrderCache<S> {
    /// Cache orders in `storage` for [`CONFIRMATION_TTL`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ttl: CONFIRMATION_TTL,
        }
    }

    /// Remember a freshly placed order.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be written.
    pub fn store(
        &self,
        order: &Order,
        customer_name: &str,
        now: Timestamp,
    ) -> Result<(), ConfirmationError> {
        let record = LastOrder {
            order_id: order.id.clone(),
            customer_name: customer_name.to_string(),
            order_data: order.clone(),
            saved_at: now,
        };

        self.storage
            .set(LAST_ORDER_KEY, &serde_json::to_string(&record)?)?;

        Ok(())
    }

    /// The cached order with the given id, if it is still fresh.
    ///
    /// Unreadable and expired records are removed.
    pub fn load(&self, order_id: &str, now: Timestamp) -> Option<LastOrder> {
        let raw = match self.storage.get(LAST_ORDER_KEY) {
            Ok(raw) => raw?,
            Err(error) => {
                error!(%error, "failed to read cached order");
                return None;
            }
        };

        let record: LastOrder = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "discarding unreadable cached order");
                self.forget();
                return None;
            }
        };

        if now.duration_since(record.saved_at) > self.ttl {
            debug!(order_id = %record.order_id, "cached order expired");
            self.forget();
            return None;
        }

        (record.order_id == order_id).then_some(record)
    }

    /// Drop the cached order.
    pub fn forget(&self) {
        if let Err(error) = self.storage.remove(LAST_ORDER_KEY) {
            error!(%error, "failed to remove cached order");
        }
    }
}

/// What the confirmation page can show.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    /// The order placed in this session, from the local cache.
    Cached(LastOrder),

    /// The order as fetched from the API.
    Fetched(Order),

    /// Only the id is known; the order could not be shown.
    Unverified {
        /// The order id as requested
        order_id: String,

        /// Why the order could not be fetched, when a fetch was attempted
        reason: Option<String>,
    },
}

impl Confirmation {
    /// The order details, when known.
    pub fn order(&self) -> Option<&Order> {
        match self {
            Confirmation::Cached(record) => Some(&record.order_data),
            Confirmation::Fetched(order) => Some(order),
            Confirmation::Unverified { .. } => None,
        }
    }
}

/// Work out what to show for `order_id`.
///
/// # Errors
///
/// Returns [`ConfirmationError::InvalidOrderId`] for a blank id.
pub async fn resolve_confirmation<S: Storage>(
    order_id: &str,
    cache: &LastOrderCache<S>,
    customer: &dyn Capability,
    orders: &dyn OrderService,
    now: Timestamp,
) -> Result<Confirmation, ConfirmationError> {
    let order_id = order_id.trim();

    if order_id.is_empty() {
        return Err(ConfirmationError::InvalidOrderId);
    }

    if let Some(record) = cache.load(order_id, now) {
        return Ok(Confirmation::Cached(record));
    }

    if customer.presence() != Presence::Present {
        return Ok(Confirmation::Unverified {
            order_id: order_id.to_string(),
            reason: None,
        });
    }

    match orders.get_order(order_id).await {
        Ok(order) => Ok(Confirmation::Fetched(order)),
        Err(error) => {
            error!(%error, order_id, "failed to fetch order for confirmation");

            let reason = match error {
                ApiError::NotFound => "Order not found".to_string(),
                other => other.user_message("Failed to load order details. Please try again later."),
            };

            Ok(Confirmation::Unverified {
                order_id: order_id.to_string(),
                reason: Some(reason),
            })
        }
    }
}
