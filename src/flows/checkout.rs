//! Checkout

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{NewOrder, OrderLine, OrderStatus, PaymentMethod, ShopApi},
    cart::{CartRepository, StorageWarning},
    items::LineItem,
    navigation::Navigation,
    pricing,
    session::Session,
};

/// Shown when the backend refuses an order without saying why.
pub const ORDER_FAILED_MESSAGE: &str = "Có lỗi xảy ra khi đặt hàng";

/// Shown when the backend accepts an order without a message of its own.
pub const ORDER_PLACED_MESSAGE: &str = "Đặt hàng thành công";

/// A required shipping field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShippingField {
    /// Recipient name.
    Name,

    /// Contact email.
    Email,

    /// Contact phone.
    Phone,

    /// Delivery address.
    Address,
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShippingField::Name => "name",
            ShippingField::Email => "email",
            ShippingField::Phone => "phone",
            ShippingField::Address => "address",
        })
    }
}

/// Errors that stop an order from being placed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// Shipping details are incomplete.
    #[error("please fill in: {}", join(.0))]
    MissingFields(Vec<ShippingField>),

    /// Ordering needs a signed-in customer.
    #[error("please sign in to place an order")]
    LoginRequired,

    /// The backend refused the order.
    #[error("{0}")]
    Rejected(String),
}

impl CheckoutError {
    /// Where to send the customer instead, if anywhere.
    pub fn navigation(&self) -> Option<Navigation> {
        match self {
            CheckoutError::EmptyCart => Some(Navigation::Cart),
            CheckoutError::LoginRequired => Some(Navigation::Login),
            CheckoutError::MissingFields(_) | CheckoutError::Rejected(_) => None,
        }
    }
}

fn join(fields: &[ShippingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shipping details entered at checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Recipient name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    pub phone: String,

    /// Delivery address.
    pub address: String,

    /// Optional note for the shop.
    pub note: String,

    /// How the customer pays.
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Required fields that are blank.
    pub fn missing_fields(&self) -> Vec<ShippingField> {
        [
            (ShippingField::Name, &self.name),
            (ShippingField::Email, &self.email),
            (ShippingField::Phone, &self.phone),
            (ShippingField::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Checks that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing the blank fields.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_fields();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// Outcome of a placed order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Confirmation to show the customer.
    pub message: String,

    /// Where to go next.
    pub navigate: Navigation,

    /// Set when the emptied cart could not be saved.
    pub warning: Option<StorageWarning>,
}

/// The checkout page over a cart.
pub struct Checkout<'a> {
    cart: &'a dyn CartRepository,
    items: Vec<LineItem>,
}

impl fmt::Debug for Checkout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<'a> Checkout<'a> {
    /// Opens checkout for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to order.
    pub fn open(cart: &'a dyn CartRepository) -> Result<Self, CheckoutError> {
        let items = cart.items();

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self { cart, items })
    }

    /// Items shown in the order summary.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Order total shown in the summary.
    pub fn total(&self) -> Decimal {
        pricing::cart_total(&self.items)
    }

    /// Places the order and empties the cart once the backend accepts it.
    ///
    /// The order is built from a fresh read of the cart so that changes made in another tab
    /// since [`Checkout::open`] are included.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the form is incomplete, nobody is signed in, the cart is
    /// now empty, or the backend refuses the order. The cart is untouched in every error case.
    pub async fn submit(
        &mut self,
        form: &CheckoutForm,
        session: Option<&Session>,
        api: &dyn ShopApi,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        form.validate()?;

        let Some(Session {
            token,
            user: Some(user),
        }) = session
        else {
            return Err(CheckoutError::LoginRequired);
        };

        self.items = self.cart.items();
        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = NewOrder {
            user_id: user.id.clone(),
            items: self.items.iter().map(OrderLine::from).collect(),
            shipping_address: form.address.trim().to_string(),
            phone: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
            full_name: form.name.trim().to_string(),
            payment_method: form.payment_method,
            total_amount: self.total(),
            note: form.note.trim().to_string(),
            status: OrderStatus::Pending,
        };

        let message = match api.create_order(token, &order).await {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "order rejected");

                return Err(CheckoutError::Rejected(
                    error
                        .backend_message()
                        .unwrap_or(ORDER_FAILED_MESSAGE)
                        .to_string(),
                ));
            }
        };

        info!(
            user_id = %order.user_id,
            lines = order.items.len(),
            total = %order.total_amount,
            "order placed"
        );

        let cleared = self.cart.clear().map_err(|error| {
            warn!(%error, "order placed but cart could not be cleared");
            CheckoutError::Rejected(error.to_string())
        })?;
        self.items.clear();

        Ok(CheckoutReceipt {
            message: message.unwrap_or_else(|| ORDER_PLACED_MESSAGE.to_string()),
            navigate: Navigation::Home,
            warning: cleared.warning,
        })
    }
}
