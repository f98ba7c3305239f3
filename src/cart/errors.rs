//! Cart errors.

use thiserror::Error;

/// Errors returned by cart mutations.
///
/// Storage failures are not errors here: they degrade the store and come back as a
/// [`StorageWarning`](super::StorageWarning) on the update.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item was offered with a quantity below one.
    #[error("quantity must be at least one")]
    InvalidQuantity,

    /// No item at the given position.
    #[error("cart item {0} not found")]
    ItemNotFound(usize),
}
