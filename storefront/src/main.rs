//! # Storefront CLI
//!
//! ```bash
//! storefront login 0xAbC1230000000000000000000000000000009fE1
//! storefront landing --watch
//! storefront search "lamp"
//! storefront cart-add 65f0c0ffee
//! storefront whoami
//! storefront logout
//! ```
//!
//! Settings come from `STOREFRONT_*` variables or a `.env` file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use shared::Product;
use storefront::app::handshake::HandshakeOutcome;
use storefront::app::landing::{LandingState, PollingController};
use storefront::core::service::{ApiService, TokenStore};
use storefront::debug::{self, DebugConfig};
use storefront::services::storage::FileTokenStore;
use storefront::services::wallet::{PromptSigner, WalletService};
use storefront::{ApiClient, LandingPage, SearchView, SessionStore, StorefrontConfig, WalletAuthenticator};

#[derive(Parser)]
#[command(author, version, about = "Marketplace storefront client with wallet sign-in")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a wallet address; the challenge is signed in your wallet app
    Login { address: String },
    /// Show the landing page sections
    Landing {
        /// Keep refreshing stores and rotating the featured store until Ctrl+C
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
    /// Search products and stores
    Search { query: String },
    /// Add one unit of a product to the cart
    CartAdd { product_id: String },
    /// Forget the stored session
    Logout,
    /// Show the current session
    Whoami,
}

struct Client {
    config: StorefrontConfig,
    api: Arc<ApiClient>,
    session: SessionStore,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = StorefrontConfig::from_env()?;
    config.validate()?;

    let _log_guard = debug::init_logger(&DebugConfig {
        log_dir: config.log_dir.clone(),
        ..DebugConfig::from_env()
    });

    let cli = Cli::parse();
    let client = build(config)?;

    match cli.command {
        Commands::Login { address } => login(&client, &address).await,
        Commands::Landing { watch } => landing(&client, watch).await,
        Commands::Search { query } => search(&client, &query).await,
        Commands::CartAdd { product_id } => cart_add(&client, &product_id).await,
        Commands::Logout => {
            client.session.clear();
            println!("Signed out.");
            Ok(())
        }
        Commands::Whoami => whoami(&client).await,
    }
}

fn build(config: StorefrontConfig) -> Result<Client> {
    let api = Arc::new(
        ApiClient::new(config.api_url.clone())
            .context("Failed to build HTTP client")?
            .with_retry_policy(config.retry_policy()),
    );

    let storage: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let session = SessionStore::new(storage);
    session.hydrate();

    Ok(Client { config, api, session })
}

async fn login(client: &Client, address: &str) -> Result<()> {
    let wallet = Arc::new(WalletService::new(Arc::new(PromptSigner::stdin())));
    let auth = WalletAuthenticator::new(
        client.api.clone(),
        wallet,
        client.session.clone(),
        client.config.challenge_config(),
    );

    match auth.connect_and_authenticate(address).await {
        Ok(HandshakeOutcome::Authenticated { wallet_address }) => {
            println!("Signed in as {}", shared::truncate_address(&wallet_address));
            Ok(())
        }
        Ok(HandshakeOutcome::AlreadyAuthenticated) => {
            println!("Already signed in. Run `storefront logout` first to switch wallets.");
            Ok(())
        }
        Ok(HandshakeOutcome::NotConnected) => {
            println!("No wallet connected.");
            Ok(())
        }
        Err(e) => {
            let message = auth.error_message().unwrap_or_else(|| e.user_message().to_string());
            anyhow::bail!("{}", message)
        }
    }
}

async fn landing(client: &Client, watch: bool) -> Result<()> {
    let page = Arc::new(LandingPage::new(
        client.api.clone(),
        client.session.clone(),
        client.config.api_url.clone(),
    ));
    page.load().await;
    print_landing(&page, &page.state());

    if !watch {
        return Ok(());
    }

    let polling = PollingController::start(
        page.clone(),
        client.config.poll_interval,
        client.config.carousel_interval,
    );
    let mut ticker = tokio::time::interval(client.config.carousel_interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let state = page.state();
                if let Some(store) = state.featured_store() {
                    println!(
                        "[{}/{}] {}",
                        state.hero.current_index + 1,
                        state.hero.item_count,
                        store.name
                    );
                }
            }
        }
    }

    polling.shutdown();
    Ok(())
}

fn print_landing(page: &LandingPage, state: &LandingState) {
    if let Some(error) = &state.error {
        println!("{}", error);
        return;
    }

    println!("Featured stores ({})", state.stores.len());
    if let Some(store) = state.featured_store() {
        let action = if state.is_own_store(store) {
            "This is your store".to_string()
        } else {
            format!("Shop Now: /store/{}", store.id)
        };
        println!(
            "  * {}  {}  [{}]",
            store.name,
            page.image_url(store.banner_image.as_deref()),
            action
        );
    }

    println!("New arrivals ({})", state.latest_products.len());
    for product in state.visible_new_arrivals() {
        println!("  - {}  {}", product.name, format_price(product));
    }

    println!("Categories ({})", state.categories.len());
    for entry in state.visible_categories() {
        println!(
            "  - {}  {}",
            entry.category.name.as_deref().unwrap_or("Unnamed"),
            entry.link
        );
    }

    println!("Home & Garden ({})", state.home_garden.len());
    for product in state.visible_home_garden() {
        println!("  - {}  {}", product.name, format_price(product));
    }
}

fn format_price(product: &Product) -> String {
    match (product.price, product.payment_token.as_deref()) {
        (Some(price), Some(token)) => format!("{} {}", price, token),
        (Some(price), None) => price.to_string(),
        (None, _) => String::new(),
    }
}

async fn search(client: &Client, query: &str) -> Result<()> {
    let view = SearchView::new(client.api.clone(), client.session.clone(), client.config.api_url.clone());
    let entries = view.search(query).await?;

    if entries.is_empty() {
        println!("No results for {:?}", query);
    }
    for entry in entries {
        println!("{:<30} {:<28} {}", entry.result.name, entry.link, entry.image_url);
    }
    Ok(())
}

async fn cart_add(client: &Client, product_id: &str) -> Result<()> {
    let page = LandingPage::new(client.api.clone(), client.session.clone(), client.config.api_url.clone());
    let message = page.add_to_cart(product_id).await?;
    println!("{}", message);
    Ok(())
}

async fn whoami(client: &Client) -> Result<()> {
    let Some(token) = client.session.token() else {
        println!("Not signed in.");
        return Ok(());
    };

    let profile = client.api.get_profile(&token).await?;
    let address = profile
        .wallet_address
        .as_deref()
        .map(shared::truncate_address)
        .unwrap_or_else(|| "unknown wallet".to_string());
    println!(
        "Signed in as {} (user {})",
        address,
        profile.id.as_deref().unwrap_or("?")
    );
    Ok(())
}
