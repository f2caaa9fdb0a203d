use super::{strings, Faq, HeroImage, Stat};
use crate::content::PageDocument;
use crate::seo::SeoFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhaleHero {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub images: Vec<HeroImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overview {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhaleLocation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub best_months: String,
    pub distance: String,
    pub species: Vec<String>,
    pub success_rate: String,
    pub tour_duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhaleSpecies {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub size: String,
    pub best_spots: String,
}

// Price stays display text ("$450 (up to 6 people)")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhaleTour {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub price: String,
    pub highlights: Vec<String>,
    pub included: Vec<String>,
    pub icon_name: String,
    pub departures: String,
}

// Booking form prices in USD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhalePricing {
    pub adult_price: f64,
    pub child_price: f64,
    pub deposit_note: String,
    pub refund_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhaleWatchingPage {
    pub hero: WhaleHero,
    pub overview: Overview,
    pub stats: Vec<Stat>,
    pub locations: Vec<WhaleLocation>,
    pub species: Vec<WhaleSpecies>,
    pub tours: Vec<WhaleTour>,
    pub pricing: WhalePricing,
    pub photo_gallery: Vec<String>,
    pub faqs: Vec<Faq>,
    pub contact: Contact,
    pub seo: SeoFields,
}

impl PageDocument for WhaleWatchingPage {
    const COLLECTION: &'static str = "whaleWatchingPage";
    const DOC_ID: &'static str = "content";

    fn defaults() -> Self {
        WhaleWatchingPage {
            hero: WhaleHero {
                title: "Whale Watching Adventures".to_string(),
                subtitle: "Encounter Blue Whales & Dolphins in Their Natural Habitat".to_string(),
                cta_text: "Book Whale Tour".to_string(),
                images: vec![
                    HeroImage::new(
                        "1",
                        "https://images.unsplash.com/photo-1568430462989-44163eb1752f?w=1920&h=1080&fit=crop",
                        "Blue Whale Breach",
                    ),
                    HeroImage::new(
                        "2",
                        "https://images.unsplash.com/photo-1544551763-92b13f5a8f89?w=1920&h=1080&fit=crop",
                        "Dolphin Pod Swimming",
                    ),
                ],
            },
            overview: Overview {
                title: "World-Class Whale Watching in Sri Lanka".to_string(),
                description: "Warm tropical waters bring blue whales, sperm whales and \
                              dolphins close to the southern and eastern coasts. Expert \
                              guides run responsible encounters from three harbours."
                    .to_string(),
            },
            stats: vec![
                Stat::new("1", "Whale Species", "26", "Fish"),
                Stat::new("2", "Success Rate", "90%+", "Eye"),
                Stat::new("3", "Season Length", "6 Months", "Calendar"),
            ],
            locations: vec![
                WhaleLocation {
                    id: "1".to_string(),
                    name: "Mirissa".to_string(),
                    description: "Highest success rates for blue whale sightings.".to_string(),
                    best_months: "November to April".to_string(),
                    distance: "6-10km offshore".to_string(),
                    species: strings(&["Blue Whales", "Sperm Whales", "Fin Whales", "Dolphins"]),
                    success_rate: "90-95%".to_string(),
                    tour_duration: "4-5 hours".to_string(),
                },
                WhaleLocation {
                    id: "2".to_string(),
                    name: "Trincomalee".to_string(),
                    description: "Less crowded, best for sperm whales.".to_string(),
                    best_months: "March to August".to_string(),
                    distance: "8-15km offshore".to_string(),
                    species: strings(&["Sperm Whales", "Blue Whales", "Spinner Dolphins"]),
                    success_rate: "85-90%".to_string(),
                    tour_duration: "4-6 hours".to_string(),
                },
            ],
            species: vec![
                WhaleSpecies {
                    id: "1".to_string(),
                    name: "Blue Whale".to_string(),
                    scientific_name: "Balaenoptera musculus".to_string(),
                    size: "Up to 30 meters".to_string(),
                    best_spots: "Mirissa, Dondra Point".to_string(),
                },
                WhaleSpecies {
                    id: "2".to_string(),
                    name: "Sperm Whale".to_string(),
                    scientific_name: "Physeter macrocephalus".to_string(),
                    size: "Up to 20 meters".to_string(),
                    best_spots: "Trincomalee, Kalpitiya".to_string(),
                },
            ],
            tours: vec![
                WhaleTour {
                    id: "1".to_string(),
                    name: "Premium Blue Whale Safari".to_string(),
                    duration: "Half Day".to_string(),
                    price: "$65".to_string(),
                    highlights: strings(&[
                        "Early morning departure",
                        "Marine biologist guide",
                        "Maximum 15 passengers",
                    ]),
                    included: strings(&["Hotel pickup/drop", "Breakfast on board", "Life jackets"]),
                    icon_name: "Ship".to_string(),
                    departures: "5:30 AM".to_string(),
                },
                WhaleTour {
                    id: "2".to_string(),
                    name: "Whale & Dolphin Combo".to_string(),
                    duration: "Full Day".to_string(),
                    price: "$85".to_string(),
                    highlights: strings(&["Extended ocean time", "Snorkeling opportunity"]),
                    included: strings(&["All transfers", "Meals & drinks", "Snorkeling gear"]),
                    icon_name: "Fish".to_string(),
                    departures: "6:00 AM".to_string(),
                },
            ],
            pricing: WhalePricing {
                adult_price: 65.0,
                child_price: 35.0,
                deposit_note: "Pay on the day at the harbour. No deposit needed.".to_string(),
                refund_policy: "Free rebooking when the sea state cancels a departure."
                    .to_string(),
            },
            photo_gallery: Vec::new(),
            faqs: vec![
                Faq::new(
                    "1",
                    "When is the best time to see blue whales?",
                    "November to April off Mirissa, March to August off Trincomalee.",
                ),
                Faq::new(
                    "2",
                    "What happens if we see no whales?",
                    "Premium tours include a free second trip when there are no sightings.",
                ),
            ],
            contact: Contact {
                phone: "+94 77 772 1999".to_string(),
                email: "info@rechargetravels.com".to_string(),
                website: "www.rechargetravels.com".to_string(),
            },
            seo: SeoFields::new(
                "Whale Watching Sri Lanka | Mirissa & Trincomalee Tours",
                "See blue whales, sperm whales and dolphins with responsible guided tours.",
                &["whale watching sri lanka", "mirissa whale watching", "blue whales"],
                "https://images.unsplash.com/photo-1568430462989-44163eb1752f?w=1200",
            ),
        }
    }
}
