//! Shopfront
//!
//! Shopfront is the client side of a fashion storefront: a persistent shopping cart that stays in
//! sync across tabs, promo-code pricing, and checkout against the storefront REST backend.

pub mod api;
pub mod cart;
pub mod config;
pub mod flows;
pub mod items;
pub mod navigation;
pub mod observability;
pub mod pricing;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_support;
