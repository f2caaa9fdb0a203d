use super::{strings, Faq, HeroImage, Stat};
use crate::content::PageDocument;
use crate::seo::SeoFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BalloonHero {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub images: Vec<HeroImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlightPackage {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub price: f64,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BalloonPricing {
    pub currency: String,
    pub starting_price: f64,
    pub deposit_note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Logistics {
    pub meeting_point: String,
    pub pickup_time: String,
    pub season: String,
    pub what_to_bring: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotAirBalloonPage {
    pub hero: BalloonHero,
    pub stats: Vec<Stat>,
    pub packages: Vec<FlightPackage>,
    pub pricing: BalloonPricing,
    pub logistics: Logistics,
    pub faqs: Vec<Faq>,
    pub seo: SeoFields,
}

impl HotAirBalloonPage {
    // The booking form preselects the first package
    pub fn default_package(&self) -> Option<&FlightPackage> {
        self.packages.first()
    }

    pub fn package(&self, id: &str) -> Option<&FlightPackage> {
        self.packages
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.default_package())
    }
}

impl PageDocument for HotAirBalloonPage {
    const COLLECTION: &'static str = "pageContent";
    const DOC_ID: &'static str = "hot-air-balloon-sigiriya";

    fn defaults() -> Self {
        HotAirBalloonPage {
            hero: BalloonHero {
                title: "Hot Air Balloon Over Sigiriya".to_string(),
                subtitle: "Sunrise flights above the Lion Rock and the Cultural Triangle"
                    .to_string(),
                cta_text: "Reserve a flight".to_string(),
                images: vec![HeroImage::new(
                    "hero-1",
                    "https://images.unsplash.com/photo-1507608616759-54f48f0af0ee?w=1920",
                    "Sunrise over Sigiriya",
                )],
            },
            stats: vec![
                Stat::new("1", "Flight Time", "60 min", "Clock"),
                Stat::new("2", "Max Altitude", "1,000 m", "Mountain"),
            ],
            packages: vec![
                FlightPackage {
                    id: "sunrise-classic".to_string(),
                    name: "Sunrise Classic".to_string(),
                    duration: "1 hour flight".to_string(),
                    price: 220.0,
                    highlights: strings(&["Shared basket", "Champagne toast", "Flight certificate"]),
                },
                FlightPackage {
                    id: "private-basket".to_string(),
                    name: "Private Basket".to_string(),
                    duration: "1 hour flight".to_string(),
                    price: 480.0,
                    highlights: strings(&["Private pilot", "Breakfast picnic"]),
                },
            ],
            pricing: BalloonPricing {
                currency: "USD".to_string(),
                starting_price: 220.0,
                deposit_note: "20% deposit secures the flight date".to_string(),
            },
            logistics: Logistics {
                meeting_point: "Sigiriya village launch field".to_string(),
                pickup_time: "5:00 AM".to_string(),
                season: "October to April".to_string(),
                what_to_bring: strings(&["Light jacket", "Camera", "Closed shoes"]),
            },
            faqs: vec![Faq::new(
                "1",
                "What happens if the weather is bad?",
                "Flights cancelled for weather are rebooked or fully refunded.",
            )],
            seo: SeoFields::new(
                "Hot Air Balloon Sigiriya | Sunrise Flights",
                "Sunrise balloon flights over Sigiriya rock fortress with hotel pickup.",
                &["hot air balloon sigiriya", "dambulla balloon ride"],
                "https://images.unsplash.com/photo-1507608616759-54f48f0af0ee?w=1200",
            ),
        }
    }

    fn cache_key() -> String {
        "hot-air-balloon-sigiriya-page".to_string()
    }
}
