//! Product detail & add-to-cart

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    api::{ApiError, Product, ShopApi},
    cart::{CartError, CartRepository, CartUpdate},
    items::LineItem,
    navigation::Navigation,
    pricing::{self, PricingError, Promotion, UnitPrice},
    session::Session,
};

/// Errors raised while applying a promo code.
#[derive(Debug, Error)]
pub enum PromoError {
    /// No code was entered.
    #[error("enter a promo code first")]
    EmptyCode,

    /// The backend refused the code.
    #[error("{0}")]
    Rejected(String),

    /// The line is worth less than the code requires.
    #[error("this code needs a purchase of at least {minimum}")]
    BelowMinimumPurchase {
        /// Required line subtotal.
        minimum: rust_decimal::Decimal,
    },

    /// The code's value cannot be applied to this product.
    #[error("promo code cannot be applied: {0}")]
    Pricing(#[from] PricingError),

    /// The backend could not be reached or answered oddly.
    #[error("could not check promo code")]
    Api(#[source] ApiError),
}

/// Errors raised when adding a product to the cart.
#[derive(Debug, Error)]
pub enum AddToCartError {
    /// No colour selected.
    #[error("please choose a colour")]
    MissingColor,

    /// No size selected.
    #[error("please choose a size")]
    MissingSize,

    /// The chosen option is not offered for this product.
    #[error("{kind} {value:?} is not available for this product")]
    UnknownOption {
        /// `colour` or `size`.
        kind: &'static str,

        /// The rejected value.
        value: String,
    },

    /// Adding to the cart needs a signed-in customer.
    #[error("please sign in to add items to your cart")]
    LoginRequired,

    /// Nothing left to sell.
    #[error("this product is out of stock")]
    OutOfStock,

    /// The applied promo code no longer fits the selection.
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// The cart refused the item.
    #[error(transparent)]
    Cart(#[from] CartError),
}

impl AddToCartError {
    /// Where to send the customer instead, if anywhere.
    pub fn navigation(&self) -> Option<Navigation> {
        match self {
            AddToCartError::LoginRequired => Some(Navigation::Login),
            _ => None,
        }
    }
}

/// A product page: the product plus the customer's selections.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    product: Product,
    color: Option<String>,
    size: Option<String>,
    quantity: u32,
    promotion: Option<Promotion>,
}

impl ProductDetail {
    /// Opens a product page, preselecting the first colour and size.
    pub fn new(product: Product) -> Self {
        Self {
            color: product.colors.first().cloned(),
            size: product.sizes.first().cloned(),
            quantity: 1,
            promotion: None,
            product,
        }
    }

    /// Fetches a product and opens its page.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the product cannot be fetched.
    pub async fn load(api: &dyn ShopApi, id: &str) -> Result<Self, ApiError> {
        Ok(Self::new(api.get_product(id).await?))
    }

    /// The product on this page.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Selected colour, if any.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Selected size, if any.
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Selected quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The promo code currently applied, if any.
    pub fn promotion(&self) -> Option<&Promotion> {
        self.promotion.as_ref()
    }

    /// Selects a colour offered by the product.
    ///
    /// # Errors
    ///
    /// Returns [`AddToCartError::UnknownOption`] if the product has no such colour.
    pub fn select_color(&mut self, color: &str) -> Result<(), AddToCartError> {
        self.color = Some(pick(&self.product.colors, color, "colour")?);

        Ok(())
    }

    /// Selects a size offered by the product.
    ///
    /// # Errors
    ///
    /// Returns [`AddToCartError::UnknownOption`] if the product has no such size.
    pub fn select_size(&mut self, size: &str) -> Result<(), AddToCartError> {
        self.size = Some(pick(&self.product.sizes, size, "size")?);

        Ok(())
    }

    /// Sets the quantity, kept between one and the stock level. Returns the value kept.
    pub fn set_quantity(&mut self, quantity: u32) -> u32 {
        let ceiling = self.product.stock.map_or(u32::MAX, |stock| stock.max(1));
        self.quantity = quantity.clamp(1, ceiling);

        self.quantity
    }

    /// Checks a promo code with the backend and applies it to this page.
    ///
    /// A rejected code leaves the page without any promo applied.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoError`] if the code is empty, refused, below its minimum purchase, or
    /// cannot be checked.
    pub async fn apply_promo_code(
        &mut self,
        api: &dyn ShopApi,
        code: &str,
    ) -> Result<UnitPrice, PromoError> {
        self.promotion = None;

        let code = code.trim();
        if code.is_empty() {
            return Err(PromoError::EmptyCode);
        }

        let promotion = api.validate_promotion(code).await.map_err(|error| {
            match error {
                ApiError::Rejected(message) => PromoError::Rejected(message),
                other => PromoError::Api(other),
            }
        })?;

        let price = self.price_with(Some(&promotion))?;
        debug!(code, net = %price.net, "promo code applied");

        self.promotion = Some(promotion);

        Ok(price)
    }

    /// Removes the applied promo code.
    pub fn clear_promo_code(&mut self) {
        self.promotion = None;
    }

    /// Unit price for the current selection.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoError`] if the product or promo values are invalid, or the applied code
    /// no longer meets its minimum purchase.
    pub fn unit_price(&self) -> Result<UnitPrice, PromoError> {
        self.price_with(self.promotion.as_ref())
    }

    /// Builds the cart line for the current selection without touching the cart.
    ///
    /// # Errors
    ///
    /// Returns an [`AddToCartError`] if a colour or size is missing, the product is sold out,
    /// or the price cannot be computed.
    pub fn line_item(&self) -> Result<LineItem, AddToCartError> {
        let color = self.color.clone().ok_or(AddToCartError::MissingColor)?;
        let size = self.size.clone().ok_or(AddToCartError::MissingSize)?;

        if self.product.stock == Some(0) {
            return Err(AddToCartError::OutOfStock);
        }

        let price = self.unit_price()?;

        Ok(LineItem {
            product_id: self.product.id.clone(),
            name: self.product.name.clone(),
            image: self.product.images.first().cloned().unwrap_or_default(),
            price: price.net,
            original_price: price.original,
            discount: self.product.discount,
            promo_code: self.promotion.as_ref().map(|promotion| promotion.code.clone()),
            promo_discount: price.promo_discount,
            size,
            color,
            quantity: self.quantity,
        })
    }

    /// Adds the current selection to the cart.
    ///
    /// # Errors
    ///
    /// Returns an [`AddToCartError`] if a selection is missing, no one is signed in, or the item
    /// cannot be built. The cart is left untouched in every error case.
    pub fn add_to_cart(
        &self,
        cart: &dyn CartRepository,
        session: Option<&Session>,
    ) -> Result<CartUpdate, AddToCartError> {
        if self.color.is_none() {
            return Err(AddToCartError::MissingColor);
        }

        if self.size.is_none() {
            return Err(AddToCartError::MissingSize);
        }

        if session.is_none() {
            return Err(AddToCartError::LoginRequired);
        }

        let item = self.line_item()?;
        info!(
            product_id = %item.product_id,
            quantity = item.quantity,
            price = %item.price,
            "adding to cart"
        );

        Ok(cart.merge(item)?)
    }

    /// Adds the current selection and heads straight to checkout.
    ///
    /// # Errors
    ///
    /// Same as [`ProductDetail::add_to_cart`].
    pub fn buy_now(
        &self,
        cart: &dyn CartRepository,
        session: Option<&Session>,
    ) -> Result<(CartUpdate, Navigation), AddToCartError> {
        let update = self.add_to_cart(cart, session)?;

        Ok((update, Navigation::Checkout))
    }

    fn price_with(&self, promotion: Option<&Promotion>) -> Result<UnitPrice, PromoError> {
        let price = pricing::unit_price(self.product.price, self.product.discount, promotion)?;

        if let Some(promotion) = promotion {
            let subtotal = price.listing * rust_decimal::Decimal::from(self.quantity);

            if !promotion.qualifies(subtotal) {
                return Err(PromoError::BelowMinimumPurchase {
                    minimum: promotion.min_purchase,
                });
            }
        }

        Ok(price)
    }
}

fn pick(options: &[String], value: &str, kind: &'static str) -> Result<String, AddToCartError> {
    options
        .iter()
        .find(|option| option.as_str() == value)
        .cloned()
        .ok_or_else(|| AddToCartError::UnknownOption {
            kind,
            value: value.to_string(),
        })
}
