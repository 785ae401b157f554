use serde::{Deserialize, Serialize};

use super::catalog::StoreImages;

/// Discriminator of a search hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    Product,
    Store,
    /// Any other hit type; linked and pictured like a store
    #[serde(other)]
    Other,
}

/// One row of `GET /search?q=...`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SearchResultKind,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreImages>,
}

impl SearchResult {
    /// Client route for this hit.
    pub fn link(&self) -> String {
        match self.kind {
            SearchResultKind::Product => format!("/product/{}", self.id),
            SearchResultKind::Store | SearchResultKind::Other => format!("/store/{}", self.id),
        }
    }

    /// Image path to display.
    ///
    /// Products use their own image and fall back to their store's imagery;
    /// stores use featured, banner, then logo.
    pub fn image_path(&self) -> Option<&str> {
        match self.kind {
            SearchResultKind::Product => self
                .general_image
                .as_deref()
                .or_else(|| self.store.as_ref().and_then(StoreImages::preferred_image)),
            SearchResultKind::Store | SearchResultKind::Other => self
                .featured_image
                .as_deref()
                .or(self.banner_image.as_deref())
                .or(self.logo.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_link_and_image_fallback() {
        let hit: SearchResult = serde_json::from_str(
            r#"{"_id":"p1","type":"product","name":"Lamp","store":{"bannerImage":"b.png"}}"#,
        )
        .unwrap();
        assert_eq!(hit.kind, SearchResultKind::Product);
        assert_eq!(hit.link(), "/product/p1");
        assert_eq!(hit.image_path(), Some("b.png"));
    }

    #[test]
    fn test_store_link_and_image() {
        let hit: SearchResult = serde_json::from_str(
            r#"{"_id":"s1","type":"store","name":"Kara","logo":"logo.png","generalImage":"ignored.png"}"#,
        )
        .unwrap();
        assert_eq!(hit.link(), "/store/s1");
        assert_eq!(hit.image_path(), Some("logo.png"));
    }

    #[test]
    fn test_unknown_kind_resolves_like_store() {
        let hits: crate::ApiEnvelope<Vec<SearchResult>> = serde_json::from_str(
            r#"{"data":[{"_id":"p1","type":"product","name":"Lamp"},{"_id":"c1","type":"category","name":"Lighting","bannerImage":"c.png"}]}"#,
        )
        .unwrap();
        let hits = hits.into_data();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].kind, SearchResultKind::Other);
        assert_eq!(hits[1].link(), "/store/c1");
        assert_eq!(hits[1].image_path(), Some("c.png"));
    }

    #[test]
    fn test_product_without_any_image() {
        let hit: SearchResult =
            serde_json::from_str(r#"{"_id":"p9","type":"product","name":"Bare"}"#).unwrap();
        assert_eq!(hit.image_path(), None);
    }
}
