use super::strings;
use crate::content::PageDocument;
use crate::seo::SeoFields;
use serde::{Deserialize, Serialize};

pub const TICKET_CLASSES: [&str; 5] = [
    "3rd Class",
    "2nd Class",
    "2nd Class Observation Car",
    "1st Class",
    "1st Class AC",
];

// First entry is the catch-all filter value
pub const ROUTE_CATEGORIES: [&str; 4] = ["All", "Hill Country", "Main Line", "Coastal Line"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Badge {
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainHero {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub background_image: String,
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrustIndicators {
    pub rating: String,
    pub bookings_completed: String,
    pub support: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfoBlock {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainBookingPage {
    pub hero: TrainHero,
    pub trust_indicators: TrustIndicators,
    pub important_info: Vec<InfoBlock>,
    pub seo: SeoFields,
}

impl PageDocument for TrainBookingPage {
    const COLLECTION: &'static str = "pageContent";
    const DOC_ID: &'static str = "train-booking";

    fn defaults() -> Self {
        let badge = |icon: &str, text: &str| Badge {
            icon: icon.to_string(),
            text: text.to_string(),
        };

        TrainBookingPage {
            hero: TrainHero {
                title: "Book Your Train Journey Through Paradise".to_string(),
                subtitle: "Sri Lanka Railways - Scenic Journeys".to_string(),
                description: "The most scenic train routes through the hill country, coastal \
                              lines and tea plantations. We handle the booking for you."
                    .to_string(),
                background_image: "https://i.imgur.com/cTqS05p.jpeg".to_string(),
                badges: vec![
                    badge("Star", "Famous Scenic Routes"),
                    badge("Clock", "Manual Booking Service"),
                    badge("AlertCircle", "Live Updates"),
                ],
            },
            trust_indicators: TrustIndicators {
                rating: "4.9".to_string(),
                bookings_completed: "2,500+".to_string(),
                support: "24/7".to_string(),
            },
            important_info: vec![
                InfoBlock {
                    id: "1".to_string(),
                    icon: "AlertCircle".to_string(),
                    title: "Booking Process".to_string(),
                    items: strings(&[
                        "Submit booking request online",
                        "We check availability manually",
                        "Confirmation within 24 hours",
                        "Tickets delivered or ready at station",
                    ]),
                },
                InfoBlock {
                    id: "2".to_string(),
                    icon: "Info".to_string(),
                    title: "Best Booking Tips".to_string(),
                    items: strings(&[
                        "Book at least 7-14 days in advance",
                        "Observation cars fill up quickly",
                        "Early morning trains offer best views",
                    ]),
                },
            ],
            seo: SeoFields::new(
                "Sri Lanka Train Booking - Scenic Railway Journeys | Recharge Travels",
                "Book famous Sri Lankan train routes: Kandy to Ella, the Colombo to Galle \
                 coastal line and more.",
                &["Sri Lanka train booking", "Kandy to Ella train", "Sri Lanka railway"],
                "",
            ),
        }
    }
}
