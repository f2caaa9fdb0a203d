// Catalog items: bookable or displayable leaf records (routes, tours, slides,
// waterfalls, charter assets, testimonials), edited from admin and read-only
// on the public side.

use crate::store::{
    add_as, from_document, query_as, set_as, Direction, Document, DocumentStore, Query,
    StoreError,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Filter value that selects every category.
pub const ALL_CATEGORIES: &str = "all";

pub trait CatalogRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const ACTIVE_FIELD: &'static str = "isActive";
    const ORDER_FIELD: &'static str = "sortOrder";
    const ORDER_DIRECTION: Direction = Direction::Asc;

    fn id(&self) -> &str;

    fn category(&self) -> &str {
        ""
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_featured(&self) -> bool {
        false
    }

    fn price(&self) -> Option<f64> {
        None
    }

    // Fields the free-text search looks at
    fn search_fields(&self) -> Vec<&str>;

    // Shown when the collection is empty or unreachable
    fn fallback() -> Vec<Self> {
        Vec::new()
    }
}

pub struct CatalogRepository<T: CatalogRecord> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: CatalogRecord> Clone for CatalogRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: CatalogRecord> CatalogRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn list(&self, active_only: bool) -> Vec<T> {
        let mut query = Query::new().order_by(T::ORDER_FIELD, T::ORDER_DIRECTION);
        if active_only {
            query = query.where_eq(T::ACTIVE_FIELD, true);
        }

        match query_as::<T>(&*self.store, T::COLLECTION, &query).await {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                debug!("{} is empty, using fallback records", T::COLLECTION);
                Self::fallback_records(active_only)
            }
            Err(e) => {
                error!("Error fetching {}: {}", T::COLLECTION, e);
                Self::fallback_records(active_only)
            }
        }
    }

    fn fallback_records(active_only: bool) -> Vec<T> {
        T::fallback()
            .into_iter()
            .filter(|r| !active_only || r.is_active())
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        let fallback = || T::fallback().into_iter().find(|r| r.id() == id);
        match self.store.get(T::COLLECTION, id).await {
            Ok(Some(doc)) => match from_document(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Unreadable {}/{}: {}", T::COLLECTION, id, e);
                    fallback()
                }
            },
            // Deleted records stay deleted once the collection holds data
            Ok(None) => match self.store.query(T::COLLECTION, &Query::new().limit(1)).await {
                Ok(docs) if docs.is_empty() => fallback(),
                Ok(_) => None,
                Err(e) => {
                    error!("Error fetching {}: {}", T::COLLECTION, e);
                    fallback()
                }
            },
            Err(e) => {
                error!("Error fetching {}/{}: {}", T::COLLECTION, id, e);
                fallback()
            }
        }
    }

    pub async fn featured(&self, limit: usize) -> Vec<T> {
        self.list(true)
            .await
            .into_iter()
            .filter(|r| r.is_featured())
            .take(limit)
            .collect()
    }

    // Insert with a store-generated id
    pub async fn create(&self, record: &T) -> Result<String, StoreError> {
        let id = add_as(&*self.store, T::COLLECTION, record).await?;
        info!("Created {}/{}", T::COLLECTION, id);
        Ok(id)
    }

    // Insert or overwrite under the record's own id
    pub async fn save(&self, record: &T) -> Result<(), StoreError> {
        set_as(&*self.store, T::COLLECTION, record.id(), record).await
    }

    pub async fn update(&self, id: &str, patch: Document) -> Result<(), StoreError> {
        self.store.update(T::COLLECTION, id, patch).await?;
        info!("Updated {}/{}", T::COLLECTION, id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(T::COLLECTION, id).await?;
        info!("Deleted {}/{}", T::COLLECTION, id);
        Ok(())
    }

    /// Write the fallback records when the collection has nothing in it.
    /// Returns how many records were written.
    pub async fn seed_fallback(&self) -> Result<usize, StoreError> {
        let existing = self
            .store
            .query(T::COLLECTION, &Query::new().limit(1))
            .await?;
        if !existing.is_empty() {
            return Ok(0);
        }

        let records = T::fallback();
        for record in &records {
            self.save(record).await?;
        }
        info!("Seeded {} {} records", records.len(), T::COLLECTION);
        Ok(records.len())
    }
}

pub fn filter_by_category<T: CatalogRecord>(items: &[T], filter: &str) -> Vec<T> {
    if filter.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.category() == filter)
        .cloned()
        .collect()
}

pub fn search<T: CatalogRecord>(items: &[T], term: &str) -> Vec<T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBand {
    #[default]
    All,
    Budget,
    Mid,
    Premium,
}

impl PriceBand {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "budget" => PriceBand::Budget,
            "mid" => PriceBand::Mid,
            "premium" => PriceBand::Premium,
            _ => PriceBand::All,
        }
    }

    // Budget under 200, mid 200 up to 500, premium 500 and up
    pub fn contains(&self, price: f64) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Budget => price < 200.0,
            PriceBand::Mid => (200.0..500.0).contains(&price),
            PriceBand::Premium => price >= 500.0,
        }
    }
}

/// The tour grid's combined filter: category, free text and price band.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    pub category: String,
    pub search: Option<String>,
    pub price_band: PriceBand,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: None,
            price_band: PriceBand::All,
        }
    }
}

impl CatalogFilter {
    pub fn apply<T: CatalogRecord>(&self, items: &[T]) -> Vec<T> {
        let mut filtered = filter_by_category(items, &self.category);
        if let Some(term) = &self.search {
            filtered = search(&filtered, term);
        }
        filtered
            .into_iter()
            .filter(|item| item.price().map_or(true, |p| self.price_band.contains(p)))
            .collect()
    }
}

/// Saved item ids in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    ids: Vec<String>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns whether the item is saved after the toggle
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|saved| saved == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainRoute {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub distance: String,
    pub duration: String,
    pub highlights: Vec<String>,
    pub departure_station: String,
    pub arrival_station: String,
    pub frequency: String,
    pub best_class: String,
    pub price_range: String,
    pub image: String,
    pub rating: f64,
    pub scenic_stops: Vec<String>,
    pub is_active: bool,
    pub sort_order: i64,
}

impl CatalogRecord for TrainRoute {
    const COLLECTION: &'static str = "trainRoutes";

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.departure_station.as_str(),
            self.arrival_station.as_str(),
        ]
    }

    fn fallback() -> Vec<Self> {
        let route = |id: &str,
                     name: &str,
                     category: &str,
                     from: &str,
                     to: &str,
                     duration: &str,
                     best_class: &str,
                     sort_order: i64| TrainRoute {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            departure_station: from.to_string(),
            arrival_station: to.to_string(),
            duration: duration.to_string(),
            best_class: best_class.to_string(),
            frequency: "Daily".to_string(),
            is_active: true,
            sort_order,
            ..Default::default()
        };

        vec![
            TrainRoute {
                description: "Misty mountains, tea plantations and the Nine Arch Bridge"
                    .to_string(),
                distance: "120 km".to_string(),
                highlights: strings(&["Nine Arch Bridge", "Tea Plantations", "Demodara Loop"]),
                price_range: "LKR 300-1,500".to_string(),
                image: "https://i.imgur.com/cTqS05p.jpeg".to_string(),
                rating: 5.0,
                scenic_stops: strings(&["Nanu Oya", "Pattipola", "Haputale"]),
                ..route(
                    "kandy-ella",
                    "Kandy to Ella",
                    "Hill Country",
                    "Kandy",
                    "Ella",
                    "6-7 hours",
                    "2nd Class Observation Car",
                    1,
                )
            },
            TrainRoute {
                description: "From the coastal plains up to the central highlands".to_string(),
                distance: "120 km".to_string(),
                highlights: strings(&["Kadugannawa Pass", "Bible Rock"]),
                price_range: "LKR 200-800".to_string(),
                image: "https://i.imgur.com/AEnBWJf.jpeg".to_string(),
                rating: 4.5,
                ..route(
                    "colombo-kandy",
                    "Colombo to Kandy",
                    "Main Line",
                    "Colombo Fort",
                    "Kandy",
                    "3 hours",
                    "1st Class AC",
                    2,
                )
            },
            TrainRoute {
                description: "Along the Indian Ocean with beach views".to_string(),
                distance: "115 km".to_string(),
                highlights: strings(&["Ocean Views", "Colonial Heritage"]),
                price_range: "LKR 180-600".to_string(),
                image: "https://i.imgur.com/QBIw5qw.jpeg".to_string(),
                rating: 4.7,
                ..route(
                    "colombo-galle",
                    "Colombo to Galle",
                    "Coastal Line",
                    "Colombo Fort",
                    "Galle",
                    "2.5-3 hours",
                    "2nd Class",
                    3,
                )
            },
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafariTour {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub duration: String,
    pub price: f64,
    pub image: String,
    pub rating: f64,
    pub category: String,
    pub highlights: Vec<String>,
    pub max_group_size: u32,
    pub included: Vec<String>,
    pub featured: bool,
    #[serde(rename = "is_active")]
    pub is_active: bool,
}

impl CatalogRecord for SafariTour {
    const COLLECTION: &'static str = "nationalparks_tours";
    const ACTIVE_FIELD: &'static str = "is_active";
    const ORDER_FIELD: &'static str = "featured";
    const ORDER_DIRECTION: Direction = Direction::Desc;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.location.as_str(), self.description.as_str()]
    }

    fn fallback() -> Vec<Self> {
        let tour = |id: &str, title: &str, location: &str, category: &str, price: f64| SafariTour {
            id: id.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            category: category.to_string(),
            price,
            max_group_size: 6,
            is_active: true,
            ..Default::default()
        };

        vec![
            SafariTour {
                description: "Dawn game drive through Block 1, the densest leopard range on earth."
                    .to_string(),
                duration: "6 hours".to_string(),
                rating: 4.9,
                highlights: strings(&["Leopards", "Sloth bears", "Park fees included"]),
                featured: true,
                ..tour("yala-leopard", "Yala Leopard Safari", "Yala", "leopard-tracking", 85.0)
            },
            SafariTour {
                description: "Hundreds of elephants gather at the Minneriya tank each dry season."
                    .to_string(),
                duration: "4 hours".to_string(),
                rating: 4.8,
                featured: true,
                ..tour(
                    "minneriya-gathering",
                    "Minneriya Elephant Gathering",
                    "Minneriya",
                    "elephant-watching",
                    120.0,
                )
            },
            SafariTour {
                description: "Private trek to World's End with a gourmet breakfast.".to_string(),
                duration: "6 hours".to_string(),
                rating: 4.9,
                max_group_size: 10,
                ..tour(
                    "horton-plains",
                    "Sunrise Horton Plains Hike",
                    "Horton Plains",
                    "jeep-safari",
                    340.0,
                )
            },
            SafariTour {
                description: "Three nights across Yala, Udawalawe and Bundala with a naturalist."
                    .to_string(),
                duration: "4 days".to_string(),
                rating: 4.9,
                ..tour(
                    "wild-south",
                    "Wild South Expedition",
                    "Yala, Udawalawe",
                    "multi-day",
                    890.0,
                )
            },
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub cta_text: String,
    pub cta_link: String,
    pub is_active: bool,
    pub order: i64,
}

impl CatalogRecord for HeroSlide {
    const COLLECTION: &'static str = "heroSlides";
    const ORDER_FIELD: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.subtitle.as_str()]
    }

    fn fallback() -> Vec<Self> {
        vec![HeroSlide {
            id: "welcome".to_string(),
            title: "Discover Sri Lanka".to_string(),
            subtitle: "Tailor-made journeys across the island".to_string(),
            image: "https://i.imgur.com/AEnBWJf.jpeg".to_string(),
            cta_text: "Plan my trip".to_string(),
            cta_link: "/tours".to_string(),
            is_active: true,
            order: 1,
        }]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Waterfall {
    pub id: String,
    pub name: String,
    pub province: String,
    pub description: String,
    pub height: u32,
    pub difficulty: String,
    pub peak_season: String,
    pub access_info: String,
    pub lat: f64,
    pub lng: f64,
    pub is_active: bool,
    pub sort_order: i64,
}

impl CatalogRecord for Waterfall {
    const COLLECTION: &'static str = "waterfalls";

    fn id(&self) -> &str {
        &self.id
    }

    // Filtered by province on the listing page
    fn category(&self) -> &str {
        &self.province
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.province.as_str(), self.description.as_str()]
    }

    fn fallback() -> Vec<Self> {
        vec![
            Waterfall {
                id: "bambarakanda-falls".to_string(),
                name: "Bambarakanda Falls".to_string(),
                province: "Badulla".to_string(),
                description: "Sri Lanka's highest waterfall at 263 meters".to_string(),
                height: 263,
                difficulty: "Moderate".to_string(),
                peak_season: "October-February (post-monsoon)".to_string(),
                access_info: "2km hike from road, wear good shoes".to_string(),
                lat: 6.7164,
                lng: 80.9908,
                is_active: true,
                sort_order: 1,
            },
            Waterfall {
                id: "ravana-falls".to_string(),
                name: "Ravana Falls".to_string(),
                province: "Badulla".to_string(),
                description: "Roadside cascade below Ella".to_string(),
                height: 25,
                difficulty: "Easy".to_string(),
                peak_season: "Year-round, fullest after rain".to_string(),
                access_info: "Viewable from the Ella-Wellawaya road".to_string(),
                lat: 6.8406,
                lng: 81.0543,
                is_active: true,
                sort_order: 2,
            },
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharterAsset {
    pub id: String,
    pub name: String,
    pub vessel_type: String,
    pub capacity: String,
    pub range: String,
    pub price_label: String,
    pub minimum_price: f64,
    pub image: String,
    pub highlights: Vec<String>,
    pub is_active: bool,
    pub sort_order: i64,
}

impl CatalogRecord for CharterAsset {
    const COLLECTION: &'static str = "charterAssets";

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.vessel_type
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn price(&self) -> Option<f64> {
        Some(self.minimum_price)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.vessel_type.as_str()]
    }

    fn fallback() -> Vec<Self> {
        vec![
            CharterAsset {
                id: "azimut-68".to_string(),
                name: "Azimut 68 Flybridge".to_string(),
                vessel_type: "yacht".to_string(),
                capacity: "12 guests".to_string(),
                range: "Coastal".to_string(),
                price_label: "From $4,500 / day".to_string(),
                minimum_price: 4500.0,
                highlights: strings(&["Crewed", "Jet ski", "Chef on board"]),
                is_active: true,
                sort_order: 1,
                ..Default::default()
            },
            CharterAsset {
                id: "bell-429".to_string(),
                name: "Bell 429".to_string(),
                vessel_type: "helicopter".to_string(),
                capacity: "6 guests".to_string(),
                range: "Island-wide".to_string(),
                price_label: "From $2,200 / hour".to_string(),
                minimum_price: 2200.0,
                is_active: true,
                sort_order: 2,
                ..Default::default()
            },
        ]
    }
}

// Append-only; `tour_id` is never checked against the tour catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub location: String,
    pub rating: u8,
    pub comment: String,
    pub tour_id: Option<String>,
    pub date: String,
    pub featured: bool,
    pub is_active: bool,
    pub order: i64,
}

impl CatalogRecord for Testimonial {
    const COLLECTION: &'static str = "testimonials";
    const ORDER_FIELD: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.location.as_str(), self.comment.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UnavailableStore};
    use serde_json::json;
    use test_case::test_case;

    fn tours() -> Vec<SafariTour> {
        SafariTour::fallback()
    }

    #[test_case("all", 4 ; "all keyword")]
    #[test_case("ALL", 4 ; "all keyword any case")]
    #[test_case("leopard-tracking", 1 ; "single match")]
    #[test_case("safari", 0 ; "no partial matches")]
    fn test_filter_by_category(filter: &str, expected: usize) {
        let filtered = filter_by_category(&tours(), filter);
        assert_eq!(filtered.len(), expected);
        if filter != "all" && filter != "ALL" {
            assert!(filtered.iter().all(|t| t.category == filter));
        }
    }

    #[test]
    fn test_search_matches_title_location_and_description() {
        assert_eq!(search(&tours(), "YALA").len(), 2);
        assert_eq!(search(&tours(), "tank").len(), 1);
        assert_eq!(search(&tours(), "   ").len(), 4);
        assert!(search(&tours(), "snorkel").is_empty());
    }

    #[test_case("budget", 85.0, true)]
    #[test_case("budget", 200.0, false)]
    #[test_case("mid", 200.0, true)]
    #[test_case("mid", 500.0, false)]
    #[test_case("premium", 500.0, true)]
    #[test_case("anything", 10_000.0, true)]
    fn test_price_bands(band: &str, price: f64, expected: bool) {
        assert_eq!(PriceBand::parse(band).contains(price), expected);
    }

    #[test]
    fn test_combined_filter() {
        let filter = CatalogFilter {
            category: "all".to_string(),
            search: Some("hike".to_string()),
            price_band: PriceBand::Mid,
        };
        let found = filter.apply(&tours());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "horton-plains");
    }

    #[test]
    fn test_wishlist_double_toggle_restores_membership() {
        let mut wishlist = Wishlist::new();
        wishlist.toggle("yala-leopard");
        let before = wishlist.clone();

        assert!(wishlist.toggle("horton-plains"));
        assert!(!wishlist.toggle("horton-plains"));
        assert_eq!(wishlist, before);

        assert!(!wishlist.toggle("yala-leopard"));
        assert!(wishlist.is_empty());
    }

    #[tokio::test]
    async fn test_list_falls_back_when_empty_or_unreachable() {
        let empty: CatalogRepository<TrainRoute> =
            CatalogRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(empty.list(true).await.len(), 3);

        let down: CatalogRepository<TrainRoute> = CatalogRepository::new(Arc::new(UnavailableStore));
        assert_eq!(down.list(true).await[0].id, "kandy-ella");
        assert_eq!(down.get("colombo-galle").await.unwrap().category, "Coastal Line");
        assert!(down.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_and_filters_stored_records() {
        let store = Arc::new(MemoryStore::new());
        let routes: CatalogRepository<TrainRoute> = CatalogRepository::new(store.clone());
        assert_eq!(routes.seed_fallback().await.unwrap(), 3);
        assert_eq!(routes.seed_fallback().await.unwrap(), 0);

        routes
            .update(
                "colombo-kandy",
                json!({"isActive": false}).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
        routes
            .update("kandy-ella", json!({"sortOrder": 9}).as_object().cloned().unwrap())
            .await
            .unwrap();

        let active: Vec<String> = routes.list(true).await.into_iter().map(|r| r.id).collect();
        assert_eq!(active, vec!["colombo-galle", "kandy-ella"]);
        assert_eq!(routes.list(false).await.len(), 3);

        routes.delete("colombo-galle").await.unwrap();
        assert!(routes.delete("colombo-galle").await.is_err());
    }

    #[tokio::test]
    async fn test_deleted_record_does_not_come_back() {
        let store = Arc::new(MemoryStore::new());
        let tours: CatalogRepository<SafariTour> = CatalogRepository::new(store);
        assert_eq!(tours.get("yala-leopard").await.map(|t| t.price), Some(85.0));

        tours.seed_fallback().await.unwrap();
        tours.delete("yala-leopard").await.unwrap();
        assert!(tours.get("yala-leopard").await.is_none());
        assert!(tours.list(false).await.iter().all(|t| t.id != "yala-leopard"));
    }

    #[tokio::test]
    async fn test_featured_testimonials_respect_limit() {
        let store = Arc::new(MemoryStore::new());
        let repo: CatalogRepository<Testimonial> = CatalogRepository::new(store);
        for i in 0..4 {
            let testimonial = Testimonial {
                name: format!("Guest {}", i),
                rating: 5,
                featured: i != 1,
                is_active: true,
                order: i,
                tour_id: Some("tour-that-does-not-exist".to_string()),
                ..Default::default()
            };
            repo.create(&testimonial).await.unwrap();
        }

        let featured = repo.featured(2).await;
        let names: Vec<&str> = featured.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Guest 0", "Guest 2"]);
        assert!(!featured[0].id.is_empty());
    }

    #[test]
    fn test_get_falls_back_when_store_is_down() {
        let repo: CatalogRepository<SafariTour> = CatalogRepository::new(Arc::new(UnavailableStore));
        let tour = tokio_test::block_on(repo.get("yala-leopard"));
        assert_eq!(tour.map(|t| t.price), Some(85.0));
        assert!(tokio_test::block_on(repo.get("unknown")).is_none());
    }
}
