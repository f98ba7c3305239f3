//! Header cart badge

use std::fmt;

use tracing::debug;

use crate::cart::{CartChange, CartRepository, CartSubscription};

/// Item count shown next to the cart icon. Dropping the badge unsubscribes it.
pub struct HeaderBadge<'a> {
    cart: &'a dyn CartRepository,
    subscription: CartSubscription,
    count: u32,
}

impl fmt::Debug for HeaderBadge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderBadge")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<'a> HeaderBadge<'a> {
    /// Subscribes to the cart and reads the initial count.
    pub fn new(cart: &'a dyn CartRepository) -> Self {
        let subscription = cart.subscribe();

        Self {
            count: cart.item_count(),
            cart,
            subscription,
        }
    }

    /// Count as last read.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Applies pending change signals without waiting. Returns the current count.
    pub fn poll(&mut self) -> u32 {
        let pending = self.subscription.drain();

        if pending > 0 {
            self.count = self.cart.item_count();
            debug!(pending, count = self.count, "cart badge refreshed");
        }

        self.count
    }

    /// Waits for the next change and re-reads the count.
    ///
    /// Returns `None` once the cart is gone.
    pub async fn next_change(&mut self) -> Option<(CartChange, u32)> {
        let change = self.subscription.changed().await?;
        self.count = self.cart.item_count();

        Some((change, self.count))
    }
}
