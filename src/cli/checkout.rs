use clap::Args;
use shopfront::{
    api::PaymentMethod,
    flows::{Checkout, CheckoutForm},
    pricing,
};

use super::Shop;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Contact phone
    #[arg(long)]
    phone: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Note for the shop
    #[arg(long, default_value = "")]
    note: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethod::Momo)]
    payment: PaymentMethod,
}

pub(crate) async fn run(shop: &Shop, args: CheckoutArgs) -> Result<(), String> {
    let mut checkout = Checkout::open(&shop.cart).map_err(|error| error.to_string())?;

    println!(
        "ordering {} lines, total {}",
        checkout.items().len(),
        pricing::format_money(checkout.total())
    );

    let form = CheckoutForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        note: args.note,
        payment_method: args.payment,
    };

    let receipt = checkout
        .submit(&form, shop.session().as_ref(), &shop.api)
        .await
        .map_err(|error| match error.navigation() {
            Some(next) => format!("{error} (go to {next})"),
            None => error.to_string(),
        })?;

    println!("{}", receipt.message);
    if let Some(warning) = receipt.warning {
        println!("warning: {warning}");
    }

    Ok(())
}
