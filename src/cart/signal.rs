//! Cart change signal

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::{
    cart::CART_KEY,
    storage::{StorageEvent, TabId},
};

/// Where a cart change came from. Observers re-read the store either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartChange {
    /// A mutation through this tab's store.
    Local,

    /// Another tab wrote the cart key.
    External,
}

/// A live subscription to cart changes. Dropping it unsubscribes.
///
/// Local signals arrive through the tab's notification channel, so every store on the tab
/// feeds the same subscription.
#[derive(Debug)]
pub struct CartSubscription {
    local: broadcast::Receiver<StorageEvent>,
    storage: broadcast::Receiver<StorageEvent>,
    tab: TabId,
}

impl CartSubscription {
    pub(crate) fn new(
        local: broadcast::Receiver<StorageEvent>,
        storage: broadcast::Receiver<StorageEvent>,
        tab: TabId,
    ) -> Self {
        Self {
            local,
            storage,
            tab,
        }
    }

    /// Waits for the next change.
    ///
    /// Returns `None` once the storage is gone.
    pub async fn changed(&mut self) -> Option<CartChange> {
        loop {
            tokio::select! {
                notice = self.local.recv() => match notice {
                    Ok(notice) => {
                        if let Some(change) = self.own_tab(&notice) {
                            return Some(change);
                        }
                    }
                    Err(RecvError::Lagged(_)) => return Some(CartChange::Local),
                    Err(RecvError::Closed) => return None,
                },
                event = self.storage.recv() => match event {
                    Ok(event) => {
                        if let Some(change) = self.external(&event) {
                            return Some(change);
                        }
                    }
                    Err(RecvError::Lagged(_)) => return Some(CartChange::External),
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }

    /// Returns the next pending change without waiting.
    pub fn try_changed(&mut self) -> Option<CartChange> {
        loop {
            match self.local.try_recv() {
                Ok(notice) => {
                    if let Some(change) = self.own_tab(&notice) {
                        return Some(change);
                    }
                }
                Err(TryRecvError::Lagged(_)) => return Some(CartChange::Local),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        loop {
            match self.storage.try_recv() {
                Ok(event) => {
                    if let Some(change) = self.external(&event) {
                        return Some(change);
                    }
                }
                Err(TryRecvError::Lagged(_)) => return Some(CartChange::External),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drains every pending change, returning how many there were.
    pub fn drain(&mut self) -> usize {
        std::iter::from_fn(|| self.try_changed()).count()
    }

    fn own_tab(&self, notice: &StorageEvent) -> Option<CartChange> {
        (notice.key == CART_KEY && notice.tab == self.tab).then_some(CartChange::Local)
    }

    fn external(&self, event: &StorageEvent) -> Option<CartChange> {
        (event.key == CART_KEY && event.tab != self.tab).then_some(CartChange::External)
    }
}
