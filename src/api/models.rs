//! Backend payloads

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{items::LineItem, session::UserProfile};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub(crate) success: bool,

    #[serde(default)]
    pub(crate) message: Option<String>,

    pub(crate) data: Option<T>,
}

/// A catalogue product as served by `GET /products/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Catalogue unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Listing discount percentage.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Available colours.
    #[serde(default)]
    pub colors: Vec<String>,

    /// Available sizes.
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Image filenames, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,

    /// Units in stock, when tracked.
    #[serde(default)]
    pub stock: Option<u32>,
}

/// How the customer pays for an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// MoMo e-wallet.
    #[default]
    Momo,

    /// Bank transfer.
    BankTransfer,

    /// Cash on delivery.
    CashOnDelivery,
}

/// Order lifecycle state reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting confirmation.
    Pending,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled.
    Cancelled,

    /// A state this client does not know.
    #[serde(other)]
    Unknown,
}

/// One line of an order, mirroring the cart line it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Purchased product.
    pub product_id: String,

    /// Display name snapshot.
    pub name: String,

    /// Units ordered.
    pub quantity: u32,

    /// Selected size.
    pub size: String,

    /// Selected colour.
    pub color: String,

    /// Net unit price at the time of ordering.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Unit price before discounts.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,

    /// Listing discount percentage.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Promo code applied to the line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    /// Image filename.
    #[serde(default)]
    pub image: String,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            size: item.size.clone(),
            color: item.color.clone(),
            price: item.price,
            original_price: Some(item.original_price),
            discount: item.discount,
            promo_code: item.promo_code.clone(),
            image: item.image.clone(),
        }
    }
}

/// Body of `POST /orders`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Ordering customer.
    pub user_id: String,

    /// Cart lines with their frozen prices.
    pub items: Vec<OrderLine>,

    /// Delivery address.
    pub shipping_address: String,

    /// Contact phone.
    pub phone: String,

    /// Contact email.
    pub email: String,

    /// Recipient name.
    pub full_name: String,

    /// Payment method.
    pub payment_method: PaymentMethod,

    /// Sum of the lines.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Free-form note for the shop.
    pub note: String,

    /// Initial order state, always pending.
    pub status: OrderStatus,
}

/// An order as listed by `GET /orders/user/{id}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Current state.
    pub status: OrderStatus,

    /// Amount charged.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// When the order was placed.
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    /// Ordered lines.
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

/// Response of `POST /auth/login`; token and user sit beside `success`, not under `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub(crate) success: bool,

    #[serde(default)]
    pub(crate) message: Option<String>,

    #[serde(default)]
    pub(crate) token: Option<String>,

    #[serde(default)]
    pub(crate) user: Option<LoginUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginUser {
    #[serde(rename = "_id")]
    id: String,

    #[serde(default)]
    username: String,

    #[serde(default)]
    email: String,

    #[serde(default)]
    role: String,

    #[serde(default)]
    phone: Option<String>,
}

impl From<LoginUser> for UserProfile {
    fn from(user: LoginUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            phone: user.phone,
        }
    }
}
