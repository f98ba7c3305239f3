use clap::Args;
use shopfront::{api::ShopApi, pricing, session::Session};

use super::Shop;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(shop: &Shop, args: LoginArgs) -> Result<(), String> {
    let session = shop
        .api
        .login(&args.email, &args.password)
        .await
        .map_err(|error| format!("failed to sign in: {error}"))?;

    session
        .save(shop.cart.storage())
        .map_err(|error| format!("failed to save session: {error}"))?;

    match &session.user {
        Some(user) => println!("signed in as {} <{}>", user.username, user.email),
        None => println!("signed in"),
    }

    Ok(())
}

pub(crate) fn logout(shop: &Shop) -> Result<(), String> {
    Session::clear(shop.cart.storage())
        .map_err(|error| format!("failed to clear session: {error}"))?;

    println!("signed out");

    Ok(())
}

pub(crate) async fn orders(shop: &Shop) -> Result<(), String> {
    let Some(Session {
        token,
        user: Some(user),
    }) = shop.session()
    else {
        return Err("please sign in first: shopfront login --email <EMAIL>".to_string());
    };

    let orders = shop
        .api
        .list_orders(&token, &user.id)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    for order in orders {
        println!("order_id: {}", order.id);
        println!("status: {:?}", order.status);
        println!("total: {}", pricing::format_money(order.total_amount));
        println!(
            "placed_at: {}",
            order
                .created_at
                .map_or_else(|| "unknown".to_string(), |value| value.to_string())
        );
        for line in &order.items {
            println!(
                "  {} x{} ({} / {}) {}",
                line.name,
                line.quantity,
                line.color,
                line.size,
                pricing::format_money(line.price)
            );
        }
        println!();
    }

    Ok(())
}
