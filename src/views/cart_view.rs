//! Cart page

use std::{fmt, io};

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::Columns, object::Rows},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{CartError, CartRepository, CartUpdate, StorageWarning},
    items::LineItem,
    navigation::Navigation,
    pricing,
    views::image_url,
};

/// Shipping line shown under the subtotal.
pub const FREE_SHIPPING: &str = "Miễn phí";

/// Errors raised by the cart page.
#[derive(Debug, Error)]
pub enum CartViewError {
    /// Checkout was requested with nothing in the cart.
    #[error("Giỏ hàng trống")]
    Empty,

    /// The cart refused a change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The page could not be written out.
    #[error("could not render cart: {0}")]
    Io(#[from] io::Error),
}

/// One rendered line of the cart page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartRow {
    /// Position in the cart, used by the quantity and remove controls.
    pub index: usize,

    /// Product name.
    pub name: String,

    /// Colour and size.
    pub variant: String,

    /// Units on the line.
    pub quantity: u32,

    /// Net unit price.
    pub unit_price: Decimal,

    /// Net line total.
    pub line_total: Decimal,

    /// Undiscounted line total, shown struck through when the line is marked down.
    pub original_line_total: Option<Decimal>,

    /// Resolved product image.
    pub image_url: Option<String>,
}

impl CartRow {
    fn new(index: usize, item: &LineItem, upload_base: &str) -> Self {
        Self {
            index,
            name: item.name.clone(),
            variant: format!("Màu: {} | Size: {}", item.color, item.size),
            quantity: item.quantity,
            unit_price: item.price,
            line_total: item.line_total(),
            original_line_total: item
                .is_marked_down()
                .then(|| item.original_line_total()),
            image_url: image_url(upload_base, &item.image),
        }
    }
}

/// The cart page.
pub struct CartView<'a> {
    cart: &'a dyn CartRepository,
    upload_base: String,
    items: Vec<LineItem>,
    warning: Option<StorageWarning>,
}

impl fmt::Debug for CartView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartView")
            .field("upload_base", &self.upload_base)
            .field("items", &self.items)
            .field("warning", &self.warning)
            .finish_non_exhaustive()
    }
}

impl<'a> CartView<'a> {
    /// Opens the cart page, reading the current cart.
    pub fn new(cart: &'a dyn CartRepository, upload_base: impl Into<String>) -> Self {
        Self {
            items: cart.items(),
            cart,
            upload_base: upload_base.into(),
            warning: None,
        }
    }

    /// Items as last read.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rows to display, in cart order.
    pub fn rows(&self) -> Vec<CartRow> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| CartRow::new(index, item, &self.upload_base))
            .collect()
    }

    /// Sum of the line totals.
    pub fn subtotal(&self) -> Decimal {
        pricing::cart_total(&self.items)
    }

    /// Grand total. Shipping is free, so this equals the subtotal.
    pub fn total(&self) -> Decimal {
        self.subtotal()
    }

    /// Warning raised by the last change made through this page.
    pub fn warning(&self) -> Option<StorageWarning> {
        self.warning
    }

    /// Re-reads the cart, e.g. after a change signal.
    pub fn refresh(&mut self) {
        self.items = self.cart.items();
    }

    /// Adds one unit to the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartViewError::Cart`] if there is no line at `index`.
    pub fn increment(&mut self, index: usize) -> Result<(), CartViewError> {
        let quantity = self.current_quantity(index)?;
        let update = self
            .cart
            .update_quantity(index, quantity.saturating_add(1))?;

        self.apply(update);

        Ok(())
    }

    /// Takes one unit off the line at `index`, removing the line when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartViewError::Cart`] if there is no line at `index`.
    pub fn decrement(&mut self, index: usize) -> Result<(), CartViewError> {
        let quantity = self.current_quantity(index)?;

        let update = if quantity > 1 {
            self.cart.update_quantity(index, quantity - 1)?
        } else {
            debug!(index, "last unit removed");
            self.cart.remove(index)?
        };

        self.apply(update);

        Ok(())
    }

    /// Removes the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartViewError::Cart`] if there is no line at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(), CartViewError> {
        let update = self.cart.remove(index)?;

        self.apply(update);

        Ok(())
    }

    /// Moves on to checkout.
    ///
    /// # Errors
    ///
    /// Returns [`CartViewError::Empty`] if the cart has no items.
    pub fn proceed_to_checkout(&self) -> Result<Navigation, CartViewError> {
        if self.items.is_empty() {
            return Err(CartViewError::Empty);
        }

        Ok(Navigation::Checkout)
    }

    /// Writes the cart table and its summary.
    ///
    /// # Errors
    ///
    /// Returns [`CartViewError::Io`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), CartViewError> {
        if self.items.is_empty() {
            writeln!(out, "Giỏ hàng trống")?;

            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Sản phẩm", "Phân loại", "Số lượng", "Đơn giá", "Thành tiền"]);

        for row in self.rows() {
            let line_total = match row.original_line_total {
                Some(original) => format!(
                    "{} \x1b[9m{}\x1b[0m",
                    pricing::format_money(row.line_total),
                    pricing::format_money(original)
                ),
                None => pricing::format_money(row.line_total),
            };

            builder.push_record([
                (row.index + 1).to_string(),
                row.name,
                row.variant,
                row.quantity.to_string(),
                pricing::format_money(row.unit_price),
                line_total,
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Tạm tính:        {}", pricing::format_money(self.subtotal()))?;
        writeln!(out, " Phí vận chuyển:  {FREE_SHIPPING}")?;
        writeln!(
            out,
            " \x1b[1mTổng cộng:       {}\x1b[0m",
            pricing::format_money(self.total())
        )?;

        if let Some(warning) = self.warning {
            writeln!(out, " ! {warning}")?;
        }

        Ok(())
    }

    fn current_quantity(&self, index: usize) -> Result<u32, CartError> {
        self.cart
            .items()
            .get(index)
            .map(|item| item.quantity)
            .ok_or(CartError::ItemNotFound(index))
    }

    fn apply(&mut self, update: CartUpdate) {
        self.items = update.items;
        self.warning = update.warning;
    }
}
