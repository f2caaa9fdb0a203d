use super::{strings, Faq, HeroImage};
use crate::content::PageDocument;
use crate::seo::SeoFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaterfallsHero {
    pub title: String,
    pub subtitle: String,
    pub images: Vec<HeroImage>,
}

// Individual falls are catalog records, see `catalog::Waterfall`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaterfallsPage {
    pub hero: WaterfallsHero,
    pub introduction: String,
    pub best_season: String,
    pub safety_tips: Vec<String>,
    pub faqs: Vec<Faq>,
    pub seo: SeoFields,
}

impl PageDocument for WaterfallsPage {
    const COLLECTION: &'static str = "pageContent";
    const DOC_ID: &'static str = "waterfalls";

    fn defaults() -> Self {
        WaterfallsPage {
            hero: WaterfallsHero {
                title: "Waterfalls of Sri Lanka".to_string(),
                subtitle: "Over 400 cascades across the central highlands".to_string(),
                images: vec![HeroImage::new(
                    "1",
                    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=1920",
                    "Bambarakanda Falls",
                )],
            },
            introduction: "From Bambarakanda, the island's highest at 263 meters, to the \
                           twin drops of Diyaluma, the hill country is threaded with falls \
                           reachable on short hikes."
                .to_string(),
            best_season: "October to February, after the monsoon".to_string(),
            safety_tips: strings(&[
                "Do not swim above a drop",
                "Wear shoes with grip on wet rock",
                "Leave before afternoon rain",
            ]),
            faqs: vec![Faq::new(
                "1",
                "Which waterfall is easiest to reach?",
                "Ravana Falls sits beside the Ella-Wellawaya road.",
            )],
            seo: SeoFields::new(
                "Sri Lanka Waterfalls Guide | Bambarakanda, Diyaluma, Ravana",
                "Heights, access and best seasons for Sri Lanka's most scenic waterfalls.",
                &["sri lanka waterfalls", "bambarakanda falls", "ravana falls"],
                "",
            ),
        }
    }
}
