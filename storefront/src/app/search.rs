//! Search results view.
//!
//! Runs a query against `/search` and resolves each hit to a client route and
//! an absolute image URL. Normalized image URLs are memoized per path.

use parking_lot::{Mutex, RwLock};
use shared::{encode_uri, normalize_upload_path, SearchResult, FALLBACK_IMAGE};
use std::collections::HashMap;
use std::sync::Arc;

use crate::app::session::SessionStore;
use crate::core::error::Result;
use crate::core::service::ApiService;

/// One rendered search hit
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub result: SearchResult,
    pub link: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchEntry>,
    pub error: Option<String>,
    pub is_loading: bool,
}

pub struct SearchView {
    api: Arc<dyn ApiService>,
    session: SessionStore,
    api_base: String,
    image_cache: Mutex<HashMap<String, String>>,
    state: RwLock<SearchState>,
}

impl SearchView {
    pub fn new(api: Arc<dyn ApiService>, session: SessionStore, api_base: impl Into<String>) -> Self {
        Self {
            api,
            session,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            image_cache: Mutex::new(HashMap::new()),
            state: RwLock::new(SearchState::default()),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.read().clone()
    }

    /// Run `query` and replace the current results.
    ///
    /// On failure the previous results are cleared and the error is kept in
    /// [`SearchState::error`] as well as returned.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchEntry>> {
        {
            let mut state = self.state.write();
            state.query = query.to_string();
            state.is_loading = true;
            state.error = None;
        }

        let token = self.session.token();
        let outcome = self.api.search(query, token.as_deref()).await;

        let mut state = self.state.write();
        state.is_loading = false;
        match outcome {
            Ok(hits) => {
                let entries: Vec<SearchEntry> = hits
                    .into_iter()
                    .map(|result| SearchEntry {
                        link: result.link(),
                        image_url: self.image_url(result.image_path()),
                        result,
                    })
                    .collect();
                tracing::debug!(count = entries.len(), "Search results");
                state.results = entries.clone();
                Ok(entries)
            }
            Err(e) => {
                tracing::error!(error = %e, "Search failed");
                state.results.clear();
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Absolute, URI-encoded URL for an upload path.
    pub fn image_url(&self, path: Option<&str>) -> String {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return FALLBACK_IMAGE.to_string();
        };

        self.image_cache
            .lock()
            .entry(path.to_string())
            .or_insert_with(|| format!("{}{}", self.api_base, encode_uri(&normalize_upload_path(path))))
            .clone()
    }

    pub fn cached_images(&self) -> usize {
        self.image_cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AppError, ErrorKind};
    use crate::core::mock::MockApiService;
    use crate::services::storage::MemoryTokenStore;
    use shared::{SearchResultKind, StoreImages};

    fn view(api: Arc<MockApiService>, token: Option<&str>) -> SearchView {
        let storage = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        };
        let session = SessionStore::new(Arc::new(storage));
        session.hydrate();
        SearchView::new(api, session, "http://localhost:3000")
    }

    fn hit(id: &str, kind: SearchResultKind) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            kind,
            name: format!("Hit {}", id),
            price: None,
            general_image: None,
            featured_image: None,
            banner_image: None,
            logo: None,
            store: None,
        }
    }

    #[test]
    fn test_image_url_normalization() {
        let view = view(Arc::new(MockApiService::new()), None);
        assert_eq!(
            view.image_url(Some("/Uploads/a b.png")),
            "http://localhost:3000/Uploads/a%20b.png"
        );
        assert_eq!(
            view.image_url(Some("Uploads/x.png")),
            "http://localhost:3000/Uploads/x.png"
        );
        assert_eq!(
            view.image_url(Some("//img/y.png")),
            "http://localhost:3000/Uploads/img/y.png"
        );
        assert_eq!(view.image_url(None), FALLBACK_IMAGE);
    }

    #[test]
    fn test_image_url_is_memoized() {
        let view = view(Arc::new(MockApiService::new()), None);
        let first = view.image_url(Some("x.png"));
        let second = view.image_url(Some("x.png"));
        assert_eq!(first, second);
        assert_eq!(view.cached_images(), 1);
    }

    #[tokio::test]
    async fn test_search_resolves_links_and_images() {
        let api = Arc::new(MockApiService::new());
        let mut product = hit("p1", SearchResultKind::Product);
        product.store = Some(StoreImages {
            logo: Some("logo.png".into()),
            ..Default::default()
        });
        let mut shop = hit("s1", SearchResultKind::Store);
        shop.banner_image = Some("/Uploads/banner.png".into());
        *api.search.lock() = Ok(vec![product, shop]);
        let view = view(api.clone(), Some("tok"));

        let entries = view.search("lamp").await.unwrap();

        assert_eq!(entries[0].link, "/product/p1");
        assert_eq!(entries[0].image_url, "http://localhost:3000/Uploads/logo.png");
        assert_eq!(entries[1].link, "/store/s1");
        assert_eq!(entries[1].image_url, "http://localhost:3000/Uploads/banner.png");
        assert_eq!(api.last_token.lock().as_deref(), Some("tok"));

        let state = view.state();
        assert_eq!(state.query, "lamp");
        assert_eq!(state.results.len(), 2);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_search_without_session_sends_no_token() {
        let api = Arc::new(MockApiService::new());
        let view = view(api.clone(), None);
        assert!(view.search("lamp").await.unwrap().is_empty());
        assert_eq!(api.last_token.lock().as_deref(), None);
    }

    #[tokio::test]
    async fn test_search_failure_keeps_error() {
        let api = Arc::new(MockApiService::new());
        *api.search.lock() = Ok(vec![hit("p1", SearchResultKind::Product)]);
        let view = view(api.clone(), None);
        view.search("lamp").await.unwrap();

        *api.search.lock() = Err(AppError::Http {
            status: 500,
            message: "Failed to fetch search results".into(),
        });
        let err = view.search("lamp").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Http);
        let state = view.state();
        assert!(state.results.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("HTTP error 500: Failed to fetch search results")
        );
    }
}
