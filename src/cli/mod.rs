use clap::{Parser, Subcommand};
use shopfront::{
    api::HttpShopApi,
    cart::{CartUpdate, LocalCartStore},
    config::AppConfig,
    session::Session,
    storage::FileStorage,
};

mod account;
mod cart;
mod checkout;
mod product;

#[derive(Debug, Parser)]
#[command(name = "shopfront", about = "Shopfront terminal storefront", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login(account::LoginArgs),
    /// Forget the saved session
    Logout,
    /// List your orders
    Orders,
    /// Browse a product and add it to the cart
    Product(product::ProductCommand),
    /// Show or change the cart
    Cart(cart::CartCommand),
    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    /// Load configuration and the command from `.env`, the environment and CLI arguments
    pub(crate) fn load() -> Result<Self, clap::Error> {
        Self::load_from(std::env::args_os())
    }

    fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        // Load .env file if present (ignore if missing)
        let _env = dotenvy::dotenv();

        Self::try_parse_from(args)
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let shop = Shop::new(&self.config);

        match self.command {
            Commands::Login(args) => account::login(&shop, args).await,
            Commands::Logout => account::logout(&shop),
            Commands::Orders => account::orders(&shop).await,
            Commands::Product(command) => product::run(&shop, command).await,
            Commands::Cart(command) => cart::run(&shop, command),
            Commands::Checkout(args) => checkout::run(&shop, args).await,
        }
    }
}

/// Everything a command needs: the backend, the cart and the saved session.
pub(crate) struct Shop {
    api: HttpShopApi,
    cart: LocalCartStore<FileStorage>,
    upload_base: String,
}

impl Shop {
    fn new(config: &AppConfig) -> Self {
        Self {
            api: HttpShopApi::new(config.backend.api_url.clone()),
            cart: LocalCartStore::new(FileStorage::open(config.storage.storage_path.clone())),
            upload_base: config.backend.upload_base_url.clone(),
        }
    }

    fn session(&self) -> Option<Session> {
        Session::load(self.cart.storage())
    }
}

fn report_warning(update: &CartUpdate) {
    if let Some(warning) = update.warning {
        println!("warning: {warning}");
    }
}
