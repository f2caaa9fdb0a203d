use super::{Faq, HeroImage, Stat};
use crate::content::PageDocument;
use crate::seo::SeoFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafariHero {
    pub title: String,
    pub subtitle: String,
    pub images: Vec<HeroImage>,
}

// Filter chip on the tour grid; `value` matches `SafariTour::category`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryChip {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafariAddOns {
    pub private_vehicle_fee: f64,
    pub guide_fee: f64,
    pub full_day_multiplier: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NationalParksPage {
    pub hero: SafariHero,
    pub stats: Vec<Stat>,
    pub categories: Vec<CategoryChip>,
    pub add_ons: SafariAddOns,
    pub booking_whatsapp: String,
    pub faqs: Vec<Faq>,
    pub seo: SeoFields,
}

impl PageDocument for NationalParksPage {
    const COLLECTION: &'static str = "pageContent";
    const DOC_ID: &'static str = "national-parks";

    fn defaults() -> Self {
        let chip = |value: &str, label: &str| CategoryChip {
            value: value.to_string(),
            label: label.to_string(),
        };

        NationalParksPage {
            hero: SafariHero {
                title: "Sri Lanka National Park Safaris".to_string(),
                subtitle: "Leopards in Yala, elephant gatherings in Minneriya and misty \
                           Horton Plains treks"
                    .to_string(),
                images: vec![HeroImage::new(
                    "1",
                    "https://images.unsplash.com/photo-1469474968028-56623f02e42e?w=1920",
                    "Morning game drive",
                )],
            },
            stats: vec![
                Stat::new("1", "National Parks", "26", "Trees"),
                Stat::new("2", "Leopard Sightings", "85%", "Eye"),
            ],
            categories: vec![
                chip("all", "All Experiences"),
                chip("safari", "Safari"),
                chip("jeep-safari", "Jeep Safari"),
                chip("elephant-watching", "Elephant Watching"),
                chip("leopard-tracking", "Leopard Tracking"),
                chip("multi-day", "Multi-day"),
            ],
            add_ons: SafariAddOns {
                private_vehicle_fee: 50.0,
                guide_fee: 25.0,
                full_day_multiplier: 1.5,
            },
            booking_whatsapp: "+94777721999".to_string(),
            faqs: vec![Faq::new(
                "1",
                "Are park entrance fees included?",
                "Entrance fees are included in every jeep safari package.",
            )],
            seo: SeoFields::new(
                "National Park Safaris Sri Lanka | Yala, Udawalawe, Minneriya",
                "Private jeep safaris with naturalist guides across Sri Lanka's national parks.",
                &["yala safari", "sri lanka national parks", "leopard safari"],
                "",
            ),
        }
    }
}
