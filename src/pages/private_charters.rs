use super::{strings, Faq, HeroImage, Stat};
use crate::content::PageDocument;
use crate::seo::SeoFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartersHero {
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub video_url: Option<String>,
    pub images: Vec<HeroImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureJourney {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub route: String,
    pub description: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharterBookingInfo {
    pub concierge_note: String,
    pub contact_phone: String,
    pub whatsapp: String,
    pub email: String,
    pub response_time: String,
    pub is_live: bool,
    pub deposit_note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharterPricing {
    pub currency: String,
    pub yacht_minimum: f64,
    pub jet_minimum: f64,
    pub helicopter_minimum: f64,
    pub add_ons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quote {
    pub quote: String,
    pub author: String,
}

// The fleet itself lives in the charterAssets catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivateChartersPage {
    pub hero: ChartersHero,
    pub stats: Vec<Stat>,
    pub journeys: Vec<SignatureJourney>,
    pub booking: CharterBookingInfo,
    pub pricing: CharterPricing,
    pub testimonials: Vec<Quote>,
    pub partners: Vec<String>,
    pub faqs: Vec<Faq>,
    pub seo: SeoFields,
}

impl PageDocument for PrivateChartersPage {
    const COLLECTION: &'static str = "pageContent";
    const DOC_ID: &'static str = "private-charters";

    fn defaults() -> Self {
        PrivateChartersPage {
            hero: ChartersHero {
                badge: "Private Charter Desk".to_string(),
                title: "Indian Ocean Private Charters".to_string(),
                subtitle: "Superyachts, jets and twin-engine helicopters on standby for \
                           bespoke Sri Lankan journeys."
                    .to_string(),
                cta_text: "Request a charter plan".to_string(),
                video_url: None,
                images: vec![
                    HeroImage::new(
                        "hero-1",
                        "https://images.unsplash.com/photo-1500375592092-40eb2168fd21?w=2000",
                        "Sunset departures from Colombo Port City",
                    ),
                    HeroImage::new(
                        "hero-2",
                        "https://images.unsplash.com/photo-1503736334956-4c8f8e92946d?w=2000",
                        "Jets ready rampside",
                    ),
                ],
            },
            stats: vec![
                Stat::new("1", "Response time", "15 min", "Clock"),
                Stat::new("2", "Charters flown", "340+", "Plane"),
            ],
            journeys: vec![SignatureJourney {
                id: "south-coast".to_string(),
                title: "South Coast Villa Hop".to_string(),
                duration: "3 days".to_string(),
                route: "Colombo - Galle - Tangalle".to_string(),
                description: "Helicopter transfers between private villas with sea days \
                              aboard a crewed yacht."
                    .to_string(),
                services: strings(&["Helicopter transfers", "Crewed yacht", "Private chef"]),
            }],
            booking: CharterBookingInfo {
                concierge_note: "A charter manager confirms availability and routing.".to_string(),
                contact_phone: "+94 77 772 1999".to_string(),
                whatsapp: "+94777721999".to_string(),
                email: "charters@rechargetravels.com".to_string(),
                response_time: "Under 15 minutes".to_string(),
                is_live: true,
                deposit_note: "30% deposit on contract signature".to_string(),
            },
            pricing: CharterPricing {
                currency: "USD".to_string(),
                yacht_minimum: 4500.0,
                jet_minimum: 18000.0,
                helicopter_minimum: 2200.0,
                add_ons: strings(&["Onboard chef", "Photographer", "Security detail"]),
            },
            testimonials: Vec::new(),
            partners: strings(&["Colombo Port City Marina", "Bandaranaike VIP Terminal"]),
            faqs: vec![Faq::new(
                "1",
                "How far ahead should I book?",
                "Yachts need 72 hours, helicopters can fly same day subject to permits.",
            )],
            seo: SeoFields::new(
                "Private Charters Sri Lanka | Yachts, Jets & Helicopters",
                "Bespoke yacht, jet and helicopter charters across Sri Lanka.",
                &["private charter sri lanka", "yacht charter", "helicopter charter"],
                "https://images.unsplash.com/photo-1500375592092-40eb2168fd21?w=1200",
            ),
        }
    }
}
