// Content documents, one per tourism vertical
// Sections shared by several verticals live here; every vertical module owns
// its document shape and its seed defaults.

use serde::{Deserialize, Serialize};

pub mod hot_air_balloon;
pub mod national_parks;
pub mod private_charters;
pub mod train_booking;
pub mod waterfalls;
pub mod whale_watching;

pub use hot_air_balloon::HotAirBalloonPage;
pub use national_parks::NationalParksPage;
pub use private_charters::PrivateChartersPage;
pub use train_booking::TrainBookingPage;
pub use waterfalls::WaterfallsPage;
pub use whale_watching::WhaleWatchingPage;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroImage {
    pub id: String,
    pub url: String,
    pub caption: String,
}

impl HeroImage {
    pub fn new(id: &str, url: &str, caption: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            caption: caption.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl Faq {
    pub fn new(id: &str, question: &str, answer: &str) -> Self {
        Self {
            id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

// Pairs ready for the FAQ page schema
pub fn faq_pairs(faqs: &[Faq]) -> Vec<(&str, &str)> {
    faqs.iter()
        .map(|f| (f.question.as_str(), f.answer.as_str()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stat {
    pub id: String,
    pub label: String,
    pub value: String,
    pub icon_name: String,
}

impl Stat {
    pub fn new(id: &str, label: &str, value: &str, icon_name: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: value.to_string(),
            icon_name: icon_name.to_string(),
        }
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
