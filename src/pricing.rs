//! Pricing

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::LineItem;

/// Currency every price in the storefront is quoted in.
pub const CURRENCY: &iso::Currency = iso::VND;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Errors that can occur while computing a discounted price.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A percentage was outside 0-100.
    #[error("percentage {0} is outside 0-100")]
    PercentOutOfRange(Decimal),

    /// A fixed amount or price was negative.
    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),
}

/// How a promo code reduces the price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionKind {
    /// `discount_value` percent off.
    Percentage,

    /// `discount_value` off each unit.
    Fixed,
}

/// A promo code accepted by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// The code the customer typed.
    pub code: String,

    /// Percentage or fixed amount.
    #[serde(rename = "type")]
    pub kind: PromotionKind,

    /// Percent (0-100) or money amount, depending on `kind`.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,

    /// Largest amount a percentage code may take off one unit. Zero means no cap.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub max_discount: Decimal,

    /// Smallest line subtotal the code applies to. Zero means no minimum.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub min_purchase: Decimal,
}

impl Promotion {
    /// Whether a line worth `subtotal` before the promo qualifies for it.
    pub fn qualifies(&self, subtotal: Decimal) -> bool {
        self.min_purchase.is_zero() || subtotal >= self.min_purchase
    }
}

/// The prices shown for one unit of a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitPrice {
    /// Catalogue price.
    pub original: Decimal,

    /// Price after the listing discount.
    pub listing: Decimal,

    /// Price after the listing discount and the promo code.
    pub net: Decimal,

    /// What the promo code took off, when one was applied.
    pub promo_discount: Option<Decimal>,
}

/// Computes the unit price for a product with an optional promo code.
///
/// The listing discount is applied first and the promo code works on the result, so the two
/// stack sequentially rather than adding up into one rate.
///
/// # Errors
///
/// - [`PricingError::PercentOutOfRange`]: the listing discount or a percentage promo is
///   outside 0-100.
/// - [`PricingError::NegativeAmount`]: the price or a fixed promo amount is negative.
pub fn unit_price(
    price: Decimal,
    listing_discount: Decimal,
    promotion: Option<&Promotion>,
) -> Result<UnitPrice, PricingError> {
    let listing = listing_price(price, listing_discount)?;

    let Some(promotion) = promotion else {
        return Ok(UnitPrice {
            original: price,
            listing,
            net: listing,
            promo_discount: None,
        });
    };

    let net = promo_price(listing, promotion)?;

    Ok(UnitPrice {
        original: price,
        listing,
        net,
        promo_discount: Some(listing - net),
    })
}

/// Applies a listing percentage to a catalogue price.
///
/// # Errors
///
/// Returns a [`PricingError`] if the price is negative or the percentage is outside 0-100.
pub fn listing_price(price: Decimal, discount: Decimal) -> Result<Decimal, PricingError> {
    ensure_non_negative(price)?;
    ensure_percentage(discount)?;

    Ok(round_to_currency(price - price * discount / HUNDRED))
}

/// Applies a promo code to a price that already carries its listing discount.
///
/// The result never drops below zero.
///
/// # Errors
///
/// Returns a [`PricingError`] if the promo value is negative, or above 100 for a percentage.
pub fn promo_price(base: Decimal, promotion: &Promotion) -> Result<Decimal, PricingError> {
    ensure_non_negative(base)?;
    ensure_non_negative(promotion.discount_value)?;

    let off = match promotion.kind {
        PromotionKind::Percentage => {
            ensure_percentage(promotion.discount_value)?;

            let off = base * promotion.discount_value / HUNDRED;

            if promotion.max_discount > Decimal::ZERO {
                off.min(promotion.max_discount)
            } else {
                off
            }
        }
        PromotionKind::Fixed => promotion.discount_value,
    };

    Ok(round_to_currency((base - off).max(Decimal::ZERO)))
}

/// Sum of `price * quantity` over the cart.
///
/// Item prices already include their discounts, so nothing else is applied here.
pub fn cart_total(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Number of units in the cart, as shown on the header badge.
pub fn item_count(items: &[LineItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |count, item| count.saturating_add(item.quantity))
}

/// Rounds an amount to the currency's minor unit, half away from zero.
pub fn round_to_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display in the storefront currency.
pub fn format_money(amount: Decimal) -> String {
    Money::from_decimal(amount, CURRENCY).to_string()
}

fn ensure_percentage(percent: Decimal) -> Result<(), PricingError> {
    if percent < Decimal::ZERO || percent > HUNDRED {
        return Err(PricingError::PercentOutOfRange(percent));
    }

    Ok(())
}

fn ensure_non_negative(amount: Decimal) -> Result<(), PricingError> {
    if amount < Decimal::ZERO {
        return Err(PricingError::NegativeAmount(amount));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test_support::{dec, line_item, with_quantity};

    use super::*;

    fn percentage(code: &str, value: i64) -> Promotion {
        Promotion {
            code: code.to_string(),
            kind: PromotionKind::Percentage,
            discount_value: dec(value),
            max_discount: Decimal::ZERO,
            min_purchase: Decimal::ZERO,
        }
    }

    fn fixed(code: &str, value: i64) -> Promotion {
        Promotion {
            kind: PromotionKind::Fixed,
            ..percentage(code, value)
        }
    }

    #[test]
    fn cart_total_sums_line_totals() {
        let items = [
            with_quantity(line_item("P1", "Đen", "M", 100_000), 2),
            line_item("P2", "Trắng", "L", 50_000),
        ];

        assert_eq!(cart_total(&items), dec(250_000));
    }

    #[test]
    fn cart_total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn item_count_sums_quantities() {
        let items = [
            with_quantity(line_item("P1", "Đen", "M", 100_000), 2),
            with_quantity(line_item("P2", "Trắng", "L", 50_000), 3),
        ];

        assert_eq!(item_count(&items), 5);
    }

    #[test]
    fn percentage_promo_without_listing_discount() -> TestResult {
        let price = unit_price(dec(200_000), Decimal::ZERO, Some(&percentage("SALE10", 10)))?;

        assert_eq!(price.net, dec(180_000));
        assert_eq!(price.promo_discount, Some(dec(20_000)));
        assert_eq!(price.net * dec(2), dec(360_000));

        Ok(())
    }

    #[test]
    fn listing_discount_and_promo_stack_sequentially() -> TestResult {
        let price = unit_price(dec(200_000), dec(20), Some(&percentage("SALE10", 10)))?;

        assert_eq!(price.listing, dec(160_000));
        assert_eq!(price.net, dec(144_000));

        Ok(())
    }

    #[test]
    fn fixed_promo_subtracts_amount() -> TestResult {
        let net = promo_price(dec(150_000), &fixed("GIAM50K", 50_000))?;

        assert_eq!(net, dec(100_000));

        Ok(())
    }

    #[test]
    fn fixed_promo_never_goes_below_zero() -> TestResult {
        let net = promo_price(dec(30_000), &fixed("GIAM50K", 50_000))?;

        assert_eq!(net, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn percentage_promo_respects_cap() -> TestResult {
        let promotion = Promotion {
            max_discount: dec(15_000),
            ..percentage("SALE10", 10)
        };

        let net = promo_price(dec(200_000), &promotion)?;

        assert_eq!(net, dec(185_000));

        Ok(())
    }

    #[test]
    fn prices_round_to_whole_dong() -> TestResult {
        let net = listing_price(dec(99_999), dec(15))?;

        assert_eq!(net, dec(84_999));

        Ok(())
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        assert_eq!(
            listing_price(dec(100), dec(120)),
            Err(PricingError::PercentOutOfRange(dec(120)))
        );
        assert_eq!(
            promo_price(dec(100), &percentage("BAD", 101)),
            Err(PricingError::PercentOutOfRange(dec(101)))
        );
    }

    #[test]
    fn rejects_negative_fixed_amount() {
        assert_eq!(
            promo_price(dec(100), &fixed("BAD", -5)),
            Err(PricingError::NegativeAmount(dec(-5)))
        );
    }

    #[test]
    fn min_purchase_gates_qualification() {
        let promotion = Promotion {
            min_purchase: dec(500_000),
            ..percentage("BIG", 10)
        };

        assert!(!promotion.qualifies(dec(499_999)));
        assert!(promotion.qualifies(dec(500_000)));
        assert!(percentage("ANY", 10).qualifies(Decimal::ZERO));
    }

    #[test]
    fn decodes_backend_promotion() -> TestResult {
        let promotion: Promotion = serde_json::from_value(serde_json::json!({
            "code": "SALE10",
            "type": "percentage",
            "discountValue": 10
        }))?;

        assert_eq!(promotion, percentage("SALE10", 10));

        Ok(())
    }

    #[test]
    fn format_money_includes_amount_digits() {
        let formatted = format_money(dec(180_000));

        assert!(formatted.contains("180"), "unexpected format: {formatted}");
    }
}
