// Page content services
// One document per vertical, read by the public page and overwritten by the
// admin editor. Reads never fail: a missing document is seeded with the
// vertical's defaults and a store failure degrades to those defaults.

use crate::cache::{ContentCache, DEFAULT_PAGE_TTL};
use crate::store::{from_document, get_as, to_document, Document, DocumentStore, StoreError};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const UPDATED_AT_FIELD: &str = "updatedAt";

pub trait PageDocument: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const DOC_ID: &'static str;

    fn defaults() -> Self;

    fn cache_key() -> String {
        format!("page:{}/{}", Self::COLLECTION, Self::DOC_ID)
    }
}

pub struct PageService<T: PageDocument> {
    store: Arc<dyn DocumentStore>,
    cache: Arc<ContentCache>,
    ttl: Duration,
    _page: PhantomData<fn() -> T>,
}

impl<T: PageDocument> Clone for PageService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
            _page: PhantomData,
        }
    }
}

impl<T: PageDocument> PageService<T> {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<ContentCache>) -> Self {
        Self {
            store,
            cache,
            ttl: DEFAULT_PAGE_TTL,
            _page: PhantomData,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Public read. Never fails; see the module notes for the fallback rules.
    pub async fn get_page_content(&self) -> T {
        match self.load().await {
            Ok(content) => content,
            Err(e) => {
                error!(
                    "Error fetching {}/{} content: {}",
                    T::COLLECTION,
                    T::DOC_ID,
                    e
                );
                T::defaults()
            }
        }
    }

    /// Same as `get_page_content` but served from the content cache within
    /// the TTL. Fallback defaults are never cached.
    pub async fn get_cached(&self) -> T {
        let key = T::cache_key();
        match self.cache.cached_fetch(&key, || self.load(), Some(self.ttl)).await {
            Ok(content) => content,
            Err(e) => {
                error!("Error loading {}: {}", key, e);
                T::defaults()
            }
        }
    }

    /// Read for the admin editor. Unlike the public reads a store failure is
    /// returned, so an editor never starts from defaults it would then save
    /// over the real document.
    pub async fn load_for_edit(&self) -> Result<T, StoreError> {
        self.load().await
    }

    // Stored fields win over defaults so documents written by older admin
    // builds still render every section.
    async fn load(&self) -> Result<T, StoreError> {
        let stored = self.store.get(T::COLLECTION, T::DOC_ID).await?;
        match stored {
            Some(doc) => {
                let mut merged = to_document(&T::defaults())?;
                merge_sections(&mut merged, doc);
                from_document(merged)
            }
            None => {
                info!(
                    "No {}/{} document, seeding defaults",
                    T::COLLECTION,
                    T::DOC_ID
                );
                let defaults = T::defaults();
                if let Err(e) = self.write(to_document(&defaults)?).await {
                    warn!("Could not seed {}/{}: {}", T::COLLECTION, T::DOC_ID, e);
                }
                Ok(defaults)
            }
        }
    }

    /// Shallow merge of top-level sections into the current document.
    ///
    /// A patch that would leave the document unreadable is rejected before
    /// anything is written.
    pub async fn update_page_content(&self, patch: Document) -> Result<T, StoreError> {
        let mut current = match self.store.get(T::COLLECTION, T::DOC_ID).await? {
            Some(doc) => doc,
            None => to_document(&T::defaults())?,
        };
        merge_sections(&mut current, patch);
        let updated: T = from_document(current.clone())?;
        self.write(current).await?;
        Ok(updated)
    }

    /// Whole-document overwrite. Concurrent saves are last-write-wins.
    pub async fn save_page_content(&self, content: &T) -> Result<(), StoreError> {
        self.write(to_document(content)?).await
    }

    pub async fn reset_to_default(&self) -> Result<T, StoreError> {
        let defaults = T::defaults();
        self.save_page_content(&defaults).await?;
        info!("Reset {}/{} to defaults", T::COLLECTION, T::DOC_ID);
        Ok(defaults)
    }

    // Returns true when it wrote the defaults
    pub async fn seed_defaults(&self) -> Result<bool, StoreError> {
        if get_as::<Document>(&*self.store, T::COLLECTION, T::DOC_ID)
            .await?
            .is_some()
        {
            debug!("{}/{} already seeded", T::COLLECTION, T::DOC_ID);
            return Ok(false);
        }
        self.write(to_document(&T::defaults())?).await?;
        info!("Seeded {}/{}", T::COLLECTION, T::DOC_ID);
        Ok(true)
    }

    async fn write(&self, mut doc: Document) -> Result<(), StoreError> {
        doc.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.store.set(T::COLLECTION, T::DOC_ID, doc).await?;
        self.cache.invalidate(&T::cache_key());
        Ok(())
    }
}

fn merge_sections(target: &mut Document, patch: Document) {
    for (section, value) in patch {
        target.insert(section, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UnavailableStore};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct DemoPage {
        title: String,
        highlights: Vec<String>,
        #[serde(default)]
        call_to_action: String,
    }

    impl PageDocument for DemoPage {
        const COLLECTION: &'static str = "pageContent";
        const DOC_ID: &'static str = "demo";

        fn defaults() -> Self {
            DemoPage {
                title: "Default title".to_string(),
                highlights: vec!["Sunrise".to_string()],
                call_to_action: "Book now".to_string(),
            }
        }
    }

    fn service(store: Arc<dyn DocumentStore>) -> PageService<DemoPage> {
        PageService::new(store, Arc::new(ContentCache::default()))
    }

    #[tokio::test]
    async fn test_missing_document_is_seeded_with_defaults() {
        let store = Arc::new(MemoryStore::new());
        let pages = service(store.clone());

        assert_eq!(pages.get_page_content().await, DemoPage::defaults());
        let stored = store.get("pageContent", "demo").await.unwrap().unwrap();
        assert_eq!(stored["title"], "Default title");
        assert!(stored.contains_key(UPDATED_AT_FIELD));
    }

    #[tokio::test]
    async fn test_store_failure_falls_back_to_defaults() {
        let pages = service(Arc::new(UnavailableStore));
        assert_eq!(pages.get_page_content().await, DemoPage::defaults());
        assert_eq!(pages.get_cached().await, DemoPage::defaults());
        assert!(pages.save_page_content(&DemoPage::defaults()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_for_edit_reports_store_failure() {
        let pages = service(Arc::new(UnavailableStore));
        assert!(matches!(
            pages.load_for_edit().await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_stored_sections_win_over_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "pageContent",
                "demo",
                json!({"title": "Stored"}).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();

        let page = service(store).get_page_content().await;
        assert_eq!(page.title, "Stored");
        assert_eq!(page.highlights, vec!["Sunrise".to_string()]);
    }

    #[tokio::test]
    async fn test_update_merges_top_level_sections() {
        let store = Arc::new(MemoryStore::new());
        let pages = service(store.clone());
        pages.seed_defaults().await.unwrap();

        let patch = json!({"highlights": ["Dolphins", "Blue whales"]});
        let updated = pages
            .update_page_content(patch.as_object().cloned().unwrap())
            .await
            .unwrap();
        assert_eq!(updated.title, "Default title");
        assert_eq!(updated.highlights.len(), 2);

        let bad = json!({"highlights": "not a list"});
        assert!(pages
            .update_page_content(bad.as_object().cloned().unwrap())
            .await
            .is_err());
        assert_eq!(pages.get_page_content().await.highlights.len(), 2);
    }

    #[tokio::test]
    async fn test_seed_defaults_only_writes_once() {
        let store = Arc::new(MemoryStore::new());
        let pages = service(store.clone());
        assert!(pages.seed_defaults().await.unwrap());
        assert!(!pages.seed_defaults().await.unwrap());
        assert_eq!(store.count("pageContent"), 1);
    }

    #[tokio::test]
    async fn test_save_invalidates_cached_copy() {
        let store = Arc::new(MemoryStore::new());
        let pages = service(store);
        assert_eq!(pages.get_cached().await.title, "Default title");

        let mut edited = DemoPage::defaults();
        edited.title = "Edited".to_string();
        pages.save_page_content(&edited).await.unwrap();
        assert_eq!(pages.get_cached().await.title, "Edited");

        let reset = pages.reset_to_default().await.unwrap();
        assert_eq!(reset, DemoPage::defaults());
        assert_eq!(pages.get_cached().await.title, "Default title");
    }
}
