//! # Landing Page
//!
//! Loads and holds everything the storefront landing page renders: featured
//! stores (hero carousel), new arrivals, categories and the home-and-garden
//! strip. Sections degrade independently; a section that cannot be loaded is
//! shown empty.
//!
//! [`PollingController`] drives the two periodic behaviours:
//! - store refresh every `refresh_every` (default 30 s)
//! - hero auto-advance every `advance_every` (default 5 s), only while more
//!   than one store is loaded
//!
//! Both tasks are aborted on [`PollingController::shutdown`] or drop.

use parking_lot::{Mutex, RwLock};
use shared::{ApiEnvelope, Category, Product, Store, FALLBACK_IMAGE};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::app::carousel::{CarouselState, SectionCarousel};
use crate::app::session::SessionStore;
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;

/// Category queried for the home-and-garden strip.
pub const HOME_GARDEN_CATEGORY: &str = "Homes & Gardens";

/// How long a product stays marked as "added" after a cart add.
pub const RECENTLY_ADDED_WINDOW: Duration = Duration::from_secs(1);

pub const MSG_CONNECT_WALLET: &str = "Please connect your wallet to add items to cart.";

/// Client routes for known categories, in fallback order.
const CATEGORY_LINKS: [(&str, &str); 5] = [
    ("electronics", "/electronics"),
    ("fashion", "/fashion"),
    ("home & garden", "/homeandgarden"),
    ("smartphones & tablets", "/smartphonestabs"),
    ("vehicles", "/vehicles"),
];

/// Route for the category at `index` named `name`.
///
/// Known names map to their own route; anything else cycles through the table.
pub fn category_link(name: Option<&str>, index: usize) -> &'static str {
    name.map(str::to_lowercase)
        .and_then(|name| {
            CATEGORY_LINKS
                .iter()
                .find(|(known, _)| *known == name)
                .map(|(_, link)| *link)
        })
        .unwrap_or(CATEGORY_LINKS[index % CATEGORY_LINKS.len()].1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub category: Category,
    pub link: &'static str,
}

/// Which section carousel to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    NewArrivals,
    Categories,
    HomeGarden,
}

/// Everything the landing page renders
#[derive(Debug, Clone, Default)]
pub struct LandingState {
    pub user_id: Option<String>,
    pub stores: Vec<Store>,
    pub latest_products: Vec<Product>,
    pub categories: Vec<CategoryEntry>,
    pub home_garden: Vec<Product>,
    /// Banner shown when nothing at all could be loaded
    pub error: Option<String>,
    pub is_loading: bool,
    pub hero: CarouselState,
    pub new_arrivals: SectionCarousel,
    pub category_strip: SectionCarousel,
    pub home_garden_strip: SectionCarousel,
}

impl LandingState {
    /// Store currently shown in the hero carousel.
    pub fn featured_store(&self) -> Option<&Store> {
        self.stores.get(self.hero.current_index)
    }

    /// Whether the signed-in user owns `store`.
    pub fn is_own_store(&self, store: &Store) -> bool {
        match (self.user_id.as_deref(), store.owner_id()) {
            (Some(user), Some(owner)) => user == owner,
            _ => false,
        }
    }

    pub fn visible_new_arrivals(&self) -> &[Product] {
        self.new_arrivals.window(&self.latest_products)
    }

    pub fn visible_categories(&self) -> &[CategoryEntry] {
        self.category_strip.window(&self.categories)
    }

    pub fn visible_home_garden(&self) -> &[Product] {
        self.home_garden_strip.window(&self.home_garden)
    }

    fn section_len(&self, section: Section) -> usize {
        match section {
            Section::NewArrivals => self.latest_products.len(),
            Section::Categories => self.categories.len(),
            Section::HomeGarden => self.home_garden.len(),
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut SectionCarousel {
        match section {
            Section::NewArrivals => &mut self.new_arrivals,
            Section::Categories => &mut self.category_strip,
            Section::HomeGarden => &mut self.home_garden_strip,
        }
    }
}

pub struct LandingPage {
    api: Arc<dyn ApiService>,
    session: SessionStore,
    api_base: String,
    state: RwLock<LandingState>,
    recently_added: Mutex<HashMap<String, Instant>>,
    store_count: watch::Sender<usize>,
}

impl LandingPage {
    pub fn new(api: Arc<dyn ApiService>, session: SessionStore, api_base: impl Into<String>) -> Self {
        let (store_count, _) = watch::channel(0);
        Self {
            api,
            session,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            state: RwLock::new(LandingState::default()),
            recently_added: Mutex::new(HashMap::new()),
            store_count,
        }
    }

    /// Snapshot of the rendered state.
    pub fn state(&self) -> LandingState {
        self.state.read().clone()
    }

    /// Number of stores, updated whenever the count changes.
    pub fn watch_store_count(&self) -> watch::Receiver<usize> {
        self.store_count.subscribe()
    }

    /// Load every section.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) {
        self.state.write().is_loading = true;

        if let Some(token) = self.session.token() {
            match self.api.get_profile(&token).await {
                Ok(profile) => self.state.write().user_id = profile.id,
                Err(e) => tracing::warn!(error = %e, "Failed to load user profile"),
            }
        }

        let stores = self.fetch_stores().await;
        let (latest, categories, home_garden) = tokio::join!(
            self.api.get_latest_products(),
            self.api.get_categories(),
            self.api.get_products_by_category(HOME_GARDEN_CATEGORY),
        );

        let mut failures = Vec::new();
        let stores = section("stores", stores, &mut failures);
        let latest = section("latest products", latest, &mut failures);
        let categories = section("categories", categories, &mut failures);
        let home_garden = section("home and garden", home_garden, &mut failures);
        let all_failed = failures.len() == 4;

        self.replace_stores(stores.unwrap_or_default());

        let mut state = self.state.write();
        state.latest_products = latest.unwrap_or_default();
        state.categories = categories
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, category)| CategoryEntry {
                link: category_link(category.name.as_deref(), index),
                category,
            })
            .collect();
        state.home_garden = home_garden.unwrap_or_default();
        state.new_arrivals.reset();
        state.category_strip.reset();
        state.home_garden_strip.reset();
        state.error = all_failed.then(|| format!("Failed to load data: {}", failures.join("; ")));
        state.is_loading = false;

        tracing::info!(
            stores = state.stores.len(),
            latest = state.latest_products.len(),
            categories = state.categories.len(),
            home_garden = state.home_garden.len(),
            "Landing page loaded"
        );
    }

    /// Re-fetch the store list and replace it wholesale. A failed fetch empties
    /// the list and returns `false`.
    pub async fn refresh_stores(&self) -> bool {
        let mut failures = Vec::new();
        let stores = section("stores", self.fetch_stores().await, &mut failures);
        let fetched = stores.is_some();
        self.replace_stores(stores.unwrap_or_default());
        fetched
    }

    async fn fetch_stores(&self) -> Result<ApiEnvelope<Vec<Store>>> {
        let token = self.session.token();
        self.api.get_stores(token.as_deref()).await
    }

    fn replace_stores(&self, stores: Vec<Store>) {
        let count = stores.len();
        {
            let mut state = self.state.write();
            state.stores = stores;
            state.hero.set_item_count(count);
        }
        self.store_count.send_if_modified(|current| {
            let changed = *current != count;
            *current = count;
            changed
        });
    }

    pub fn hero_next(&self) {
        self.state.write().hero.next();
    }

    pub fn hero_prev(&self) {
        self.state.write().hero.prev();
    }

    /// Auto-advance tick. Returns whether the hero moved.
    pub fn advance_hero(&self) -> bool {
        self.state.write().hero.auto_advance()
    }

    pub fn section_next(&self, section: Section) {
        let mut state = self.state.write();
        let len = state.section_len(section);
        state.section_mut(section).next(len);
    }

    pub fn section_prev(&self, section: Section) {
        let mut state = self.state.write();
        let len = state.section_len(section);
        state.section_mut(section).prev(len);
    }

    /// Absolute URL for an upload path, or the inline placeholder.
    pub fn image_url(&self, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}{}", self.api_base, path),
            None => FALLBACK_IMAGE.to_string(),
        }
    }

    /// Add one unit of `product_id` to the signed-in user's cart.
    pub async fn add_to_cart(&self, product_id: &str) -> Result<String> {
        let token = self
            .session
            .token()
            .ok_or_else(|| AppError::Validation(MSG_CONNECT_WALLET.to_string()))?;
        if product_id.is_empty() {
            return Err(AppError::Validation("product id is required".to_string()));
        }

        let message = self.api.add_to_cart(&token, product_id, 1).await?;

        let now = Instant::now();
        let mut recent = self.recently_added.lock();
        recent.retain(|_, at| now.duration_since(*at) < RECENTLY_ADDED_WINDOW);
        recent.insert(product_id.to_string(), now);
        Ok(message)
    }

    pub fn is_recently_added(&self, product_id: &str) -> bool {
        self.recently_added
            .lock()
            .get(product_id)
            .is_some_and(|at| at.elapsed() < RECENTLY_ADDED_WINDOW)
    }
}

/// Unwrap one section's response, logging and recording the failure.
fn section<T: Default>(
    name: &str,
    result: Result<ApiEnvelope<T>>,
    failures: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(envelope) if envelope.success => Some(envelope.into_data()),
        Ok(envelope) => {
            let reason = envelope.failure_reason().unwrap_or("request unsuccessful").to_string();
            tracing::warn!(section = name, reason = %reason, "Section unavailable");
            failures.push(format!("{}: {}", name, reason));
            None
        }
        Err(e) => {
            tracing::error!(section = name, error = %e, "Failed to load section");
            failures.push(format!("{}: {}", name, e));
            None
        }
    }
}

/// Periodic store refresh and hero auto-advance for one [`LandingPage`].
pub struct PollingController {
    refresh: JoinHandle<()>,
    advance: JoinHandle<()>,
}

impl PollingController {
    pub fn start(page: Arc<LandingPage>, refresh_every: Duration, advance_every: Duration) -> Self {
        let refresh = tokio::spawn({
            let page = page.clone();
            async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + refresh_every, refresh_every);
                loop {
                    ticker.tick().await;
                    tracing::debug!("Refreshing stores");
                    page.refresh_stores().await;
                }
            }
        });

        let advance = tokio::spawn(async move {
            let mut counts = page.watch_store_count();
            loop {
                let count = *counts.borrow_and_update();
                if count <= 1 {
                    // Idle until the collection grows
                    if counts.changed().await.is_err() {
                        return;
                    }
                    continue;
                }

                let mut ticker = tokio::time::interval_at(Instant::now() + advance_every, advance_every);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            page.advance_hero();
                        }
                        changed = counts.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        Self { refresh, advance }
    }

    /// Cancel both periodic tasks.
    pub fn shutdown(&self) {
        self.refresh.abort();
        self.advance.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.refresh.is_finished() || !self.advance.is_finished()
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
