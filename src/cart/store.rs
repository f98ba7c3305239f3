//! Local cart store

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::{
    cart::{
        CART_KEY, CartError, CartRepository, CartSubscription, CartUpdate,
        StorageWarning,
    },
    items::LineItem,
    storage::KeyValueStorage,
};

/// Cart persisted in key-value storage.
///
/// When a write fails the store switches to degraded mode: the list is kept in memory for the
/// rest of its lifetime and every later mutation reports [`StorageWarning::NotPersisted`].
///
/// Change signals go through the storage tab, so every store opened on the same tab hears
/// every other's mutations.
#[derive(Debug)]
pub struct LocalCartStore<S> {
    storage: S,
    fallback: Mutex<Option<Vec<LineItem>>>,
}

enum Persist<'a> {
    Write(&'a [LineItem]),
    Delete,
}

impl<S: KeyValueStorage> LocalCartStore<S> {
    /// Creates a store over `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            fallback: Mutex::new(None),
        }
    }

    /// The underlying storage handle.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the store has fallen back to memory.
    pub fn is_degraded(&self) -> bool {
        self.fallback().is_some()
    }

    fn fallback(&self) -> MutexGuard<'_, Option<Vec<LineItem>>> {
        self.fallback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Vec<LineItem> {
        if let Some(items) = self.fallback().as_ref() {
            return items.clone();
        }

        match self.storage.get_item(CART_KEY) {
            Ok(Some(raw)) => decode_cart(&raw),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "cart storage unreadable, treating cart as empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, change: &Persist<'_>) -> Option<StorageWarning> {
        let mut fallback = self.fallback();

        if fallback.is_some() {
            *fallback = Some(change.items().to_vec());
            return Some(StorageWarning::NotPersisted);
        }

        let result = match change {
            Persist::Write(items) => serde_json::to_string(items)
                .map_err(|error| error.to_string())
                .and_then(|json| {
                    self.storage
                        .set_item(CART_KEY, &json)
                        .map_err(|error| error.to_string())
                }),
            Persist::Delete => self
                .storage
                .remove_item(CART_KEY)
                .map_err(|error| error.to_string()),
        };

        match result {
            Ok(()) => None,
            Err(error) => {
                warn!(%error, "failed to persist cart, keeping it in memory only");
                *fallback = Some(change.items().to_vec());
                Some(StorageWarning::NotPersisted)
            }
        }
    }

    fn commit(&self, change: &Persist<'_>) -> CartUpdate {
        let warning = self.persist(change);

        self.storage.notify(CART_KEY);

        CartUpdate::new(change.items().to_vec(), warning)
    }

    fn unchanged(&self, items: Vec<LineItem>) -> CartUpdate {
        let warning = self.is_degraded().then_some(StorageWarning::NotPersisted);

        CartUpdate::new(items, warning)
    }
}

impl Persist<'_> {
    fn items(&self) -> &[LineItem] {
        match self {
            Persist::Write(items) => items,
            Persist::Delete => &[],
        }
    }
}

impl<S: KeyValueStorage> CartRepository for LocalCartStore<S> {
    fn items(&self) -> Vec<LineItem> {
        self.read()
    }

    fn merge(&self, item: LineItem) -> Result<CartUpdate, CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut items = self.read();

        if let Some(existing) = items.iter_mut().find(|existing| existing.same_variant(&item)) {
            debug!(
                product_id = %item.product_id,
                color = %item.color,
                size = %item.size,
                added = item.quantity,
                "merging into existing cart line"
            );

            existing.absorb(item);
        } else {
            debug!(
                product_id = %item.product_id,
                color = %item.color,
                size = %item.size,
                quantity = item.quantity,
                "adding cart line"
            );

            items.push(item);
        }

        Ok(self.commit(&Persist::Write(&items)))
    }

    fn update_quantity(&self, index: usize, quantity: u32) -> Result<CartUpdate, CartError> {
        let mut items = self.read();

        if index >= items.len() {
            return Err(CartError::ItemNotFound(index));
        }

        if quantity < 1 {
            return Ok(self.unchanged(items));
        }

        if let Some(item) = items.get_mut(index) {
            item.quantity = quantity;
        }

        Ok(self.commit(&Persist::Write(&items)))
    }

    fn remove(&self, index: usize) -> Result<CartUpdate, CartError> {
        let mut items = self.read();

        if index >= items.len() {
            return Err(CartError::ItemNotFound(index));
        }

        let removed = items.remove(index);
        debug!(product_id = %removed.product_id, "removed cart line");

        Ok(self.commit(&Persist::Write(&items)))
    }

    fn clear(&self) -> Result<CartUpdate, CartError> {
        debug!("clearing cart");

        Ok(self.commit(&Persist::Delete))
    }

    fn subscribe(&self) -> CartSubscription {
        CartSubscription::new(
            self.storage.subscribe_notifications(),
            self.storage.subscribe(),
            self.storage.tab(),
        )
    }
}

/// Decodes a stored cart, dropping anything that is not a valid line item.
///
/// Lines that repeat a variant are folded together so the stored list always has one line per
/// variant.
fn decode_cart(raw: &str) -> Vec<LineItem> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(%error, "stored cart is malformed, treating cart as empty");
            return Vec::new();
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(entries.len());

    for entry in entries {
        let item = match serde_json::from_value::<LineItem>(entry) {
            Ok(item) => item,
            Err(error) => {
                warn!(%error, "skipping malformed cart line");
                continue;
            }
        };

        if let Some(existing) = items.iter_mut().find(|existing| existing.same_variant(&item)) {
            existing.absorb(item);
        } else {
            items.push(item);
        }
    }

    items
}
