// SEO metadata: head tags, schema.org JSON-LD and sitemap.xml

use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("Sitemap serialization error: {0}")]
    Serialize(String),

    #[error("Sitemap parse error: {0}")]
    Parse(String),
}

/// The SEO block every content document carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoFields {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub og_image: String,
}

impl SeoFields {
    pub fn new(title: &str, description: &str, keywords: &[&str], og_image: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            og_image: og_image.to_string(),
        }
    }

    pub fn head_tags(&self, canonical_url: &str) -> HeadTags {
        let mut meta = vec![MetaTag::name("description", &self.description)];
        if !self.keywords.is_empty() {
            meta.push(MetaTag::name("keywords", &self.keywords.join(", ")));
        }
        meta.push(MetaTag::property("og:title", &self.title));
        meta.push(MetaTag::property("og:description", &self.description));
        meta.push(MetaTag::property("og:type", "website"));
        if !canonical_url.is_empty() {
            meta.push(MetaTag::property("og:url", canonical_url));
        }
        if !self.og_image.is_empty() {
            meta.push(MetaTag::property("og:image", &self.og_image));
            meta.push(MetaTag::name("twitter:card", "summary_large_image"));
        }

        HeadTags {
            title: self.title.clone(),
            canonical: (!canonical_url.is_empty()).then(|| canonical_url.to_string()),
            meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaTag {
    pub attribute: &'static str,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    fn name(key: &str, content: &str) -> Self {
        Self {
            attribute: "name",
            key: key.to_string(),
            content: content.to_string(),
        }
    }

    fn property(key: &str, content: &str) -> Self {
        Self {
            attribute: "property",
            key: key.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadTags {
    pub title: String,
    pub canonical: Option<String>,
    pub meta: Vec<MetaTag>,
}

impl HeadTags {
    pub fn to_html(&self) -> String {
        let mut html = format!("<title>{}</title>\n", escape_html(&self.title));
        for tag in &self.meta {
            html.push_str(&format!(
                "<meta {}=\"{}\" content=\"{}\" />\n",
                tag.attribute,
                escape_html(&tag.key),
                escape_html(&tag.content)
            ));
        }
        if let Some(canonical) = &self.canonical {
            html.push_str(&format!(
                "<link rel=\"canonical\" href=\"{}\" />\n",
                escape_html(canonical)
            ));
        }
        html
    }
}

// Attribute-safe: quotes and apostrophes are escaped too
pub fn escape_html(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

// The business published as the schema.org organization
#[derive(Debug, Clone)]
pub struct Organization {
    pub name: String,
    pub legal_name: String,
    pub url: String,
    pub logo: String,
    pub email: String,
    pub phone: String,
    pub country: String,
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            name: "Recharge Travels".to_string(),
            legal_name: "Recharge Travels & Tours (Pvt) Ltd".to_string(),
            url: "https://www.rechargetravels.com".to_string(),
            logo: "https://www.rechargetravels.com/logo-v2.png".to_string(),
            email: "info@rechargetravels.com".to_string(),
            phone: "+94777721999".to_string(),
            country: "LK".to_string(),
        }
    }
}

pub fn organization_schema(org: &Organization) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "TravelAgency",
        "@id": format!("{}/#organization", org.url),
        "name": org.name,
        "legalName": org.legal_name,
        "url": org.url,
        "logo": { "@type": "ImageObject", "url": org.logo },
        "email": org.email,
        "telephone": org.phone,
        "address": { "@type": "PostalAddress", "addressCountry": org.country },
    })
}

pub fn faq_schema<'a, I>(entries: I) -> Value
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let questions: Vec<Value> = entries
        .into_iter()
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": { "@type": "Answer", "text": answer },
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

impl Breadcrumb {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

pub fn breadcrumb_schema(trail: &[Breadcrumb]) -> Value {
    let items: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.name,
                "item": crumb.url,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

#[derive(Debug, Clone, Default)]
pub struct TouristTrip {
    pub name: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub duration_days: u32,
    pub price: f64,
    pub currency: String,
    pub itinerary: Vec<String>,
}

pub fn tourist_trip_schema(trip: &TouristTrip, org: &Organization) -> Value {
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "TouristTrip",
        "name": trip.name,
        "description": trip.description,
        "image": trip.image,
        "url": trip.url,
        "touristType": ["Leisure", "Adventure", "Cultural"],
        "provider": { "@type": "TravelAgency", "name": org.name, "url": org.url },
        "offers": {
            "@type": "Offer",
            "price": format!("{:.2}", trip.price),
            "priceCurrency": trip.currency,
            "availability": "https://schema.org/InStock",
        },
    });

    if trip.duration_days > 0 {
        schema["duration"] = Value::String(format!("P{}D", trip.duration_days));
    }
    if !trip.itinerary.is_empty() {
        let stops: Vec<Value> = trip
            .itinerary
            .iter()
            .enumerate()
            .map(|(i, stop)| json!({ "@type": "ListItem", "position": i + 1, "name": stop }))
            .collect();
        schema["itinerary"] = json!({ "@type": "ItemList", "itemListElement": stops });
    }
    schema
}

/// Merge several schemas into one `@graph` document.
pub fn combine(schemas: Vec<Value>) -> Value {
    let graph: Vec<Value> = schemas
        .into_iter()
        .map(|schema| match schema {
            Value::Object(mut map) => {
                map.remove("@context");
                Value::Object(map)
            }
            other => other,
        })
        .collect();

    let mut combined = Map::new();
    combined.insert("@context".to_string(), json!("https://schema.org"));
    combined.insert("@graph".to_string(), Value::Array(graph));
    Value::Object(combined)
}

pub fn json_ld_script(schema: &Value) -> String {
    // "</" inside a string would close the script element early
    let body = schema.to_string().replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">{}</script>", body)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "urlset")]
pub struct Sitemap {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "url", default)]
    pub urls: Vec<SitemapUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapUrl {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lastmod: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub changefreq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub priority: Option<f32>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self {
            xmlns: SITEMAP_NAMESPACE.to_string(),
            urls: Vec::new(),
        }
    }

    // Paths are joined onto the site base url
    pub fn add(
        &mut self,
        base_url: &str,
        path: &str,
        lastmod: Option<chrono::NaiveDate>,
        changefreq: Option<ChangeFreq>,
        priority: Option<f32>,
    ) -> &mut Self {
        let loc = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        self.urls.push(SitemapUrl {
            loc,
            lastmod: lastmod.map(|d| d.format("%Y-%m-%d").to_string()),
            changefreq: changefreq.map(|c| c.as_str().to_string()),
            priority: priority.map(|p| p.clamp(0.0, 1.0)),
        });
        self
    }

    pub fn to_xml(&self) -> Result<String, SeoError> {
        let body =
            quick_xml::se::to_string(self).map_err(|e| SeoError::Serialize(e.to_string()))?;
        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
            body
        ))
    }

    pub fn from_xml(xml: &str) -> Result<Self, SeoError> {
        from_str(xml).map_err(|e| SeoError::Parse(e.to_string()))
    }
}
