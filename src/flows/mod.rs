//! Storefront flows that read and write the cart.

pub mod checkout;
pub mod product_detail;

pub use checkout::{Checkout, CheckoutError, CheckoutForm, CheckoutReceipt, ShippingField};
pub use product_detail::{AddToCartError, ProductDetail, PromoError};
