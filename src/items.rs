//! Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a line item: one product in one colour and one size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VariantKey<'a> {
    /// Product identifier.
    pub product_id: &'a str,

    /// Selected colour.
    pub color: &'a str,

    /// Selected size.
    pub size: &'a str,
}

/// Errors raised when a stored line item cannot be accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// Quantity below one.
    #[error("line item {0} has a quantity below one")]
    ZeroQuantity(String),
}

/// One entry in the cart.
///
/// `price` is the unit price at the time the item was added, after the listing discount and
/// any promo code. It is never recomputed from the live product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredLineItem")]
pub struct LineItem {
    /// Purchased product.
    pub product_id: String,

    /// Display name snapshot.
    pub name: String,

    /// Image filename, resolved against the upload base.
    pub image: String,

    /// Net unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Unit price before any discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,

    /// Listing discount percentage (0-100).
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Promo code applied when the item was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    /// Per-unit amount taken off by the promo code.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub promo_discount: Option<Decimal>,

    /// Selected size.
    pub size: String,

    /// Selected colour.
    pub color: String,

    /// Number of units, always at least one.
    pub quantity: u32,
}

impl LineItem {
    /// Returns the identity triple of this item.
    pub fn variant(&self) -> VariantKey<'_> {
        VariantKey {
            product_id: &self.product_id,
            color: &self.color,
            size: &self.size,
        }
    }

    /// Whether both items refer to the same product variant.
    pub fn same_variant(&self, other: &LineItem) -> bool {
        self.variant() == other.variant()
    }

    /// Net price of all units on this line.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Undiscounted price of all units on this line.
    pub fn original_line_total(&self) -> Decimal {
        self.original_price * Decimal::from(self.quantity)
    }

    /// Whether the line sells below its original price.
    pub fn is_marked_down(&self) -> bool {
        self.original_price > self.price
    }

    /// Folds a newer addition of the same variant into this line.
    ///
    /// Quantities add up. The newer price snapshot replaces the old one so that the latest
    /// promo application wins.
    pub(crate) fn absorb(&mut self, newer: LineItem) {
        self.quantity = self.quantity.saturating_add(newer.quantity);
        self.price = newer.price;
        self.original_price = newer.original_price;
        self.discount = newer.discount;
        self.promo_code = newer.promo_code;
        self.promo_discount = newer.promo_discount;
    }
}

/// Wire shape of a persisted line item, tolerant of older carts that lack optional fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    product_id: String,
    name: String,
    #[serde(default)]
    image: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    original_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    discount: Option<Decimal>,
    #[serde(default)]
    promo_code: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    promo_discount: Option<Decimal>,
    size: String,
    color: String,
    quantity: u32,
}

impl TryFrom<StoredLineItem> for LineItem {
    type Error = LineItemError;

    fn try_from(stored: StoredLineItem) -> Result<Self, Self::Error> {
        if stored.quantity == 0 {
            return Err(LineItemError::ZeroQuantity(stored.product_id));
        }

        Ok(Self {
            original_price: stored.original_price.unwrap_or(stored.price),
            discount: stored.discount.unwrap_or_default(),
            product_id: stored.product_id,
            name: stored.name,
            image: stored.image,
            price: stored.price,
            promo_code: stored.promo_code,
            promo_discount: stored.promo_discount,
            size: stored.size,
            color: stored.color,
            quantity: stored.quantity,
        })
    }
}
