//! Navigation

use std::fmt;

/// Where the storefront should send the customer next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Storefront home.
    Home,

    /// Sign-in page.
    Login,

    /// Cart page.
    Cart,

    /// Checkout page.
    Checkout,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Navigation::Home => "/",
            Navigation::Login => "/login",
            Navigation::Cart => "/cart",
            Navigation::Checkout => "/checkout",
        })
    }
}
