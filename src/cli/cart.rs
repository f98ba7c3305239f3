use std::io;

use clap::{Args, Subcommand};
use shopfront::{cart::CartRepository, pricing, views::CartView};

use super::{Shop, report_warning};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: Option<CartSubcommand>,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,
    /// Add one unit to a line
    Inc(LineArgs),
    /// Take one unit off a line, removing it at zero
    Dec(LineArgs),
    /// Remove a line
    Remove(LineArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Line number as shown by `cart show`, starting at 1
    line: usize,
}

impl LineArgs {
    fn index(&self) -> Result<usize, String> {
        self.line
            .checked_sub(1)
            .ok_or_else(|| "line numbers start at 1".to_string())
    }
}

pub(crate) fn run(shop: &Shop, command: CartCommand) -> Result<(), String> {
    let mut view = CartView::new(&shop.cart, shop.upload_base.clone());

    match command.command.unwrap_or(CartSubcommand::Show) {
        CartSubcommand::Show => {}
        CartSubcommand::Inc(args) => view
            .increment(args.index()?)
            .map_err(|error| error.to_string())?,
        CartSubcommand::Dec(args) => view
            .decrement(args.index()?)
            .map_err(|error| error.to_string())?,
        CartSubcommand::Remove(args) => {
            view.remove(args.index()?).map_err(|error| error.to_string())?;
            println!("Đã xóa sản phẩm khỏi giỏ hàng");
        }
        CartSubcommand::Clear => {
            let update = shop.cart.clear().map_err(|error| error.to_string())?;
            report_warning(&update);
            view.refresh();
        }
    }

    view.write_to(io::stdout().lock())
        .map_err(|error| format!("failed to render cart: {error}"))?;

    if !view.is_empty() {
        println!(
            " {} items, {}",
            shop.cart.item_count(),
            pricing::format_money(view.total())
        );
    }

    Ok(())
}
