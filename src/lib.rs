// Content and booking layer for the tourism site and its admin CMS

pub mod booking;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod content;
pub mod editor;
pub mod links;
pub mod pages;
pub mod pricing;
pub mod remote;
pub mod seo;
pub mod store;
pub mod validation;

// Re-export key types for convenience
pub use booking::{
    BookableItem, Booking, BookingChannel, BookingError, BookingReceipt, BookingService,
    BookingStatus, PaymentStatus,
};
pub use cache::{CacheConfig, CacheStats, ContentCache, EvictionPolicy};
pub use catalog::{CatalogFilter, CatalogRecord, CatalogRepository, Wishlist};
pub use config::{ConfigError, SiteConfig};
pub use content::{PageDocument, PageService};
pub use editor::{Confirmation, DocumentEditor, EditorError};
pub use pricing::{Currency, Estimate, EstimateInput, PricingPlan};
pub use remote::{ClientConfig, ClientError, RemoteStore, RetryConfig};
pub use seo::{HeadTags, SeoFields, Sitemap};
pub use store::{Document, DocumentStore, MemoryStore, Query, StoreError};
pub use validation::{BookingForm, ValidationError, ValidationRules};
