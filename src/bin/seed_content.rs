// Seeds every page document and catalog collection that does not exist yet.
// `seed_content sitemap` prints sitemap.xml for the seeded pages instead.

use anyhow::{Context, Result};
use std::sync::Arc;
use tourism_cms::catalog::{
    CatalogRepository, CharterAsset, HeroSlide, SafariTour, Testimonial, TrainRoute, Waterfall,
};
use tourism_cms::content::PageService;
use tourism_cms::pages::{
    HotAirBalloonPage, NationalParksPage, PrivateChartersPage, TrainBookingPage, WaterfallsPage,
    WhaleWatchingPage,
};
use tourism_cms::seo::{ChangeFreq, Sitemap};
use tourism_cms::{ContentCache, DocumentStore, RemoteStore, SiteConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PAGE_PATHS: &[&str] = &[
    "/experiences/whale-watching",
    "/train-booking",
    "/experiences/hot-air-balloon-sigiriya",
    "/private-charters",
    "/national-parks",
    "/waterfalls",
];

#[tokio::main]
async fn main() -> Result<()> {
    let config = SiteConfig::from_env().context("reading site configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourism_cms=info,seed_content=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args().nth(1).as_deref() == Some("sitemap") {
        let mut sitemap = Sitemap::new();
        for path in PAGE_PATHS {
            sitemap.add(
                &config.site_base_url,
                path,
                Some(chrono::Utc::now().date_naive()),
                Some(ChangeFreq::Weekly),
                Some(0.8),
            );
        }
        println!("{}", sitemap.to_xml()?);
        return Ok(());
    }

    let store: Arc<dyn DocumentStore> =
        Arc::new(RemoteStore::new(config.client_config()).context("creating store client")?);
    let cache = Arc::new(ContentCache::new(config.cache_config()));
    info!("Seeding content into {}", config.store_url);

    let whale = PageService::<WhaleWatchingPage>::new(store.clone(), cache.clone());
    let train = PageService::<TrainBookingPage>::new(store.clone(), cache.clone());
    let balloon = PageService::<HotAirBalloonPage>::new(store.clone(), cache.clone());
    let charters = PageService::<PrivateChartersPage>::new(store.clone(), cache.clone());
    let parks = PageService::<NationalParksPage>::new(store.clone(), cache.clone());
    let waterfalls = PageService::<WaterfallsPage>::new(store.clone(), cache.clone());
    let pages = futures::try_join!(
        whale.seed_defaults(),
        train.seed_defaults(),
        balloon.seed_defaults(),
        charters.seed_defaults(),
        parks.seed_defaults(),
        waterfalls.seed_defaults(),
    )
    .context("seeding page documents")?;
    let seeded_pages = [pages.0, pages.1, pages.2, pages.3, pages.4, pages.5]
        .iter()
        .filter(|wrote| **wrote)
        .count();

    let routes = CatalogRepository::<TrainRoute>::new(store.clone());
    let tours = CatalogRepository::<SafariTour>::new(store.clone());
    let slides = CatalogRepository::<HeroSlide>::new(store.clone());
    let falls = CatalogRepository::<Waterfall>::new(store.clone());
    let assets = CatalogRepository::<CharterAsset>::new(store.clone());
    let testimonials = CatalogRepository::<Testimonial>::new(store.clone());
    let records = futures::try_join!(
        routes.seed_fallback(),
        tours.seed_fallback(),
        slides.seed_fallback(),
        falls.seed_fallback(),
        assets.seed_fallback(),
        testimonials.seed_fallback(),
    )
    .context("seeding catalog collections")?;
    let seeded_records = records.0 + records.1 + records.2 + records.3 + records.4 + records.5;

    info!(
        "Seeded {} page documents and {} catalog records",
        seeded_pages, seeded_records
    );
    Ok(())
}
