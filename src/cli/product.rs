use clap::{Args, Subcommand};
use shopfront::{flows::ProductDetail, navigation::Navigation, pricing, views::image_url};

use super::{Shop, report_warning};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Show a product and its price for a selection
    Show(SelectionArgs),
    /// Add a product to the cart
    Add(SelectionArgs),
    /// Add a product to the cart and go to checkout
    Buy(SelectionArgs),
}

#[derive(Debug, Args)]
struct SelectionArgs {
    /// Product identifier
    id: String,

    /// Colour; defaults to the first one offered
    #[arg(long)]
    color: Option<String>,

    /// Size; defaults to the first one offered
    #[arg(long)]
    size: Option<String>,

    /// Number of units
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Promo code to apply
    #[arg(long)]
    promo: Option<String>,
}

pub(crate) async fn run(shop: &Shop, command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Show(args) => {
            let detail = select(shop, &args).await?;
            show(shop, &detail)
        }
        ProductSubcommand::Add(args) => {
            let detail = select(shop, &args).await?;
            let update = detail
                .add_to_cart(&shop.cart, shop.session().as_ref())
                .map_err(|error| redirect_hint(&error.to_string(), error.navigation()))?;

            report_warning(&update);
            println!("added to cart; cart total {}", pricing::format_money(update.total));

            Ok(())
        }
        ProductSubcommand::Buy(args) => {
            let detail = select(shop, &args).await?;
            let (update, next) = detail
                .buy_now(&shop.cart, shop.session().as_ref())
                .map_err(|error| redirect_hint(&error.to_string(), error.navigation()))?;

            report_warning(&update);
            println!("added to cart; continue at {next}: shopfront checkout --help");

            Ok(())
        }
    }
}

async fn select(shop: &Shop, args: &SelectionArgs) -> Result<ProductDetail, String> {
    let mut detail = ProductDetail::load(&shop.api, &args.id)
        .await
        .map_err(|error| format!("failed to load product {}: {error}", args.id))?;

    if let Some(color) = &args.color {
        detail.select_color(color).map_err(|error| error.to_string())?;
    }

    if let Some(size) = &args.size {
        detail.select_size(size).map_err(|error| error.to_string())?;
    }

    let quantity = detail.set_quantity(args.quantity);
    if quantity != args.quantity {
        println!("quantity adjusted to {quantity}");
    }

    if let Some(code) = &args.promo {
        detail
            .apply_promo_code(&shop.api, code)
            .await
            .map_err(|error| format!("promo code not applied: {error}"))?;
    }

    Ok(detail)
}

fn show(shop: &Shop, detail: &ProductDetail) -> Result<(), String> {
    let product = detail.product();
    let price = detail.unit_price().map_err(|error| error.to_string())?;

    println!("name: {}", product.name);
    println!("colors: {}", product.colors.join(", "));
    println!("sizes: {}", product.sizes.join(", "));
    if let Some(stock) = product.stock {
        println!("stock: {stock}");
    }
    if let Some(url) = product
        .images
        .first()
        .and_then(|image| image_url(&shop.upload_base, image))
    {
        println!("image: {url}");
    }
    println!("original_price: {}", pricing::format_money(price.original));
    println!("price: {}", pricing::format_money(price.listing));
    if let Some(promotion) = detail.promotion() {
        println!(
            "with {}: {}",
            promotion.code,
            pricing::format_money(price.net)
        );
    }

    Ok(())
}

fn redirect_hint(message: &str, next: Option<Navigation>) -> String {
    match next {
        Some(next) => format!("{message} (go to {next})"),
        None => message.to_string(),
    }
}
