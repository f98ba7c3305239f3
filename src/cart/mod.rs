//! Cart
//!
//! The cart is a list of [`LineItem`]s persisted under a single storage key. Every mutation
//! reads the list fresh, rewrites it whole and then signals observers.

use std::fmt;

use mockall::automock;
use rust_decimal::Decimal;

use crate::{items::LineItem, pricing};

pub mod errors;
mod signal;
mod store;

pub use errors::CartError;
pub use signal::{CartChange, CartSubscription};
pub use store::LocalCartStore;

/// Storage key holding the JSON-encoded cart.
pub const CART_KEY: &str = "cart";

/// Non-fatal problem raised while persisting the cart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageWarning {
    /// The cart changed in memory but could not be saved.
    NotPersisted,
}

impl fmt::Display for StorageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageWarning::NotPersisted => {
                f.write_str("the cart could not be saved and may be lost on reload")
            }
        }
    }
}

/// State of the cart after a mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct CartUpdate {
    /// Items after the mutation.
    pub items: Vec<LineItem>,

    /// Cart total after the mutation.
    pub total: Decimal,

    /// Set when the change could not be persisted.
    pub warning: Option<StorageWarning>,
}

impl CartUpdate {
    pub(crate) fn new(items: Vec<LineItem>, warning: Option<StorageWarning>) -> Self {
        Self {
            total: pricing::cart_total(&items),
            items,
            warning,
        }
    }
}

/// The cart as seen by views and flows.
#[automock]
pub trait CartRepository: Send + Sync {
    /// Current items. Missing or unreadable data is an empty cart.
    fn items(&self) -> Vec<LineItem>;

    /// Sum of `price * quantity` over the current items.
    fn total(&self) -> Decimal {
        pricing::cart_total(&self.items())
    }

    /// Number of units in the cart.
    fn item_count(&self) -> u32 {
        pricing::item_count(&self.items())
    }

    /// Adds an item, folding it into an existing line with the same variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if the item's quantity is zero.
    fn merge(&self, item: LineItem) -> Result<CartUpdate, CartError>;

    /// Sets the quantity of the item at `index`. A quantity of zero changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no item at `index`.
    fn update_quantity(&self, index: usize, quantity: u32) -> Result<CartUpdate, CartError>;

    /// Removes the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no item at `index`.
    fn remove(&self, index: usize) -> Result<CartUpdate, CartError>;

    /// Deletes the whole cart.
    ///
    /// # Errors
    ///
    /// Infallible for the local store; the signature leaves room for remote carts.
    fn clear(&self) -> Result<CartUpdate, CartError>;

    /// Subscribes to changes from this tab and from other tabs.
    fn subscribe(&self) -> CartSubscription;
}
