//! Storefront backend client.

use async_trait::async_trait;
use mockall::automock;

use crate::{pricing::Promotion, session::Session};

mod client;
pub mod errors;
pub mod models;

pub use client::HttpShopApi;
pub use errors::ApiError;
pub use models::{NewOrder, OrderLine, OrderStatus, OrderSummary, PaymentMethod, Product};

/// The backend endpoints the storefront calls.
#[automock]
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Checks a promo code and returns what it is worth.
    async fn validate_promotion(&self, code: &str) -> Result<Promotion, ApiError>;

    /// Places an order, returning the backend's confirmation message if it sent one.
    async fn create_order(&self, token: &str, order: &NewOrder)
    -> Result<Option<String>, ApiError>;

    /// Fetches one catalogue product.
    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;

    /// Signs in with email and password.
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    /// Lists the orders a customer has placed.
    async fn list_orders(&self, token: &str, user_id: &str)
    -> Result<Vec<OrderSummary>, ApiError>;
}
