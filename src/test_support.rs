//! Shared test fixtures.

use rust_decimal::Decimal;

use crate::items::LineItem;

pub(crate) fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// A single-unit line item with no discounts.
pub(crate) fn line_item(product_id: &str, color: &str, size: &str, price: i64) -> LineItem {
    LineItem {
        product_id: product_id.to_string(),
        name: format!("Product {product_id}"),
        image: format!("{product_id}.jpg"),
        price: dec(price),
        original_price: dec(price),
        discount: Decimal::ZERO,
        promo_code: None,
        promo_discount: None,
        size: size.to_string(),
        color: color.to_string(),
        quantity: 1,
    }
}

pub(crate) fn with_quantity(mut item: LineItem, quantity: u32) -> LineItem {
    item.quantity = quantity;
    item
}
