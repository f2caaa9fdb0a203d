// Site configuration: store endpoint, cache sizing, public URLs and the
// booking WhatsApp number, read from the environment with defaults.

use crate::booking::BookingChannel;
use crate::cache::{CacheConfig, EvictionPolicy};
use crate::remote::{ClientConfig, RetryConfig};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Site settings loaded from environment variables.
///
/// | Env Var              | Default                          |
/// |----------------------|----------------------------------|
/// | `STORE_URL`          | `http://localhost:8080`          |
/// | `STORE_API_KEY`      | empty                            |
/// | `STORE_TIMEOUT_MS`   | `10000`                          |
/// | `SITE_BASE_URL`      | `https://www.rechargetravels.com`|
/// | `WHATSAPP_NUMBER`    | `+94777721999`                   |
/// | `CACHE_TTL_SECONDS`  | `600`                            |
/// | `CACHE_MAX_SIZE_MB`  | `16`                             |
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub store_timeout_ms: u64,
    pub site_base_url: String,
    pub whatsapp_number: String,
    pub cache_ttl_seconds: u64,
    pub cache_max_size_mb: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:8080".to_string(),
            store_api_key: String::new(),
            store_timeout_ms: 10_000,
            site_base_url: "https://www.rechargetravels.com".to_string(),
            whatsapp_number: "+94777721999".to_string(),
            cache_ttl_seconds: 600,
            cache_max_size_mb: 16,
        }
    }
}

impl SiteConfig {
    /// Load `.env` when present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    // Unset variables keep their default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |name: &str, default: String| lookup(name).unwrap_or(default);
        let number = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };

        Ok(Self {
            store_url: text("STORE_URL", defaults.store_url),
            store_api_key: text("STORE_API_KEY", defaults.store_api_key),
            store_timeout_ms: number("STORE_TIMEOUT_MS", defaults.store_timeout_ms)?,
            site_base_url: text("SITE_BASE_URL", defaults.site_base_url),
            whatsapp_number: text("WHATSAPP_NUMBER", defaults.whatsapp_number),
            cache_ttl_seconds: number("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds)?,
            cache_max_size_mb: number("CACHE_MAX_SIZE_MB", defaults.cache_max_size_mb as u64)?
                as usize,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.store_url.clone(),
            api_key: self.store_api_key.clone(),
            timeout_ms: self.store_timeout_ms,
            retry_config: RetryConfig::default(),
        }
    }

    // Channels hand off to the site number unless their page sets its own
    pub fn booking_channel(&self, channel: BookingChannel) -> BookingChannel {
        channel.with_default_whatsapp(&self.whatsapp_number)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_size_mb: self.cache_max_size_mb,
            default_ttl_seconds: self.cache_ttl_seconds,
            eviction_policy: EvictionPolicy::LeastRecentlyUsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_unset_variables_use_defaults() {
        let config = SiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.cache_config().default_ttl_seconds, 600);
    }

    #[test]
    fn test_overrides_flow_into_client_and_cache() {
        let config = SiteConfig::from_lookup(lookup(&[
            ("STORE_URL", "https://store.example.com"),
            ("STORE_API_KEY", "secret"),
            ("CACHE_TTL_SECONDS", " 60 "),
        ]))
        .unwrap();

        let client = config.client_config();
        assert_eq!(client.base_url, "https://store.example.com");
        assert_eq!(client.api_key, "secret");
        assert_eq!(config.cache_config().default_ttl_seconds, 60);
    }

    #[test]
    fn test_whatsapp_number_reaches_booking_channels() {
        let config = SiteConfig::from_lookup(lookup(&[("WHATSAPP_NUMBER", "+94 70 555 0101")]))
            .unwrap();
        let channel = config.booking_channel(BookingChannel::wild_tours());
        assert_eq!(channel.whatsapp(), "+94 70 555 0101");

        let page = crate::pages::NationalParksPage {
            booking_whatsapp: "+94 77 000 1111".to_string(),
            ..Default::default()
        };
        let channel = config.booking_channel(BookingChannel::national_parks_from(&page));
        assert_eq!(channel.whatsapp(), "+94 77 000 1111");
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = SiteConfig::from_lookup(lookup(&[("STORE_TIMEOUT_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                name: "STORE_TIMEOUT_MS",
                value: "soon".to_string()
            }
        );
    }
}
