// Booking submission and admin workflow
// A submission is validated, priced on the server from the item's unit price,
// given a human-readable reference and written with pending status. Admin
// moves status and payment status independently.

use crate::cache::{CacheConfig, ContentCache, EvictionPolicy};
use crate::catalog::SafariTour;
use crate::links::{booking_handoff_message, whatsapp_link};
use crate::pages::hot_air_balloon::FlightPackage;
use crate::pages::private_charters::CharterPricing;
use crate::pages::whale_watching::{WhalePricing, WhaleTour};
use crate::pages::{NationalParksPage, PrivateChartersPage, WhaleWatchingPage};
use crate::pricing::{
    self, CharterType, Currency, Estimate, EstimateInput, PricingPlan, HAND_DELIVERY,
};
use crate::store::{
    add_as, from_document, get_as, query_as, Direction, Document, DocumentStore, Query, StoreError,
};
use crate::validation::{validate, BookingForm, FieldError, ValidationError, ValidationRules};
use chrono::{DateTime, NaiveDate, Utc};
use bytes::Bytes;
use dashmap::DashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const COUNTERS_COLLECTION: &str = "counters";
pub const COUNTER_FIELD: &str = "lastNumber";
pub const DEFAULT_WHATSAPP: &str = "+94777721999";
pub const TOP_ITEMS: usize = 5;
pub const DEFAULT_RECEIPT_TTL: Duration = Duration::from_secs(60 * 60);

// Differences below this are rounding noise between browser and server
const PRICE_TOLERANCE: f64 = 0.5;
const REFERENCE_SUFFIX_LEN: usize = 4;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Submission already in progress: {0}")]
    DuplicateSubmission(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    TicketsPurchased,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_confirmed_or_later(&self) -> bool {
        matches!(
            self,
            BookingStatus::Confirmed
                | BookingStatus::InProgress
                | BookingStatus::TicketsPurchased
                | BookingStatus::Completed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    PaidDeposit,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceScheme {
    /// Prefix, base36 milliseconds and four random characters, e.g. `TRMGX3K2Q1A7F2`.
    TimeRandom,
    /// Prefix and a zero-padded number drawn from a counter document, e.g. `PT01001`.
    Sequential {
        counter: String,
        start: u64,
        width: usize,
    },
}

/// Everything that differs between the booking pages.
#[derive(Debug, Clone)]
pub struct BookingChannel {
    pub name: String,
    pub collection: String,
    pub reference_prefix: String,
    pub scheme: ReferenceScheme,
    pub plan: PricingPlan,
    pub rules: ValidationRules,
    // Currency the item prices are quoted in
    pub currency: Currency,
    // The page's own booking number, when its admin set one
    pub whatsapp_number: Option<String>,
    pub default_whatsapp: String,
}

impl BookingChannel {
    pub fn new(name: &str, collection: &str, prefix: &str, plan: PricingPlan) -> Self {
        Self {
            name: name.to_string(),
            collection: collection.to_string(),
            reference_prefix: prefix.to_string(),
            scheme: ReferenceScheme::TimeRandom,
            rules: ValidationRules::for_group_size(plan.max_group_size),
            plan,
            currency: Currency::Usd,
            whatsapp_number: None,
            default_whatsapp: DEFAULT_WHATSAPP.to_string(),
        }
    }

    /// Page-level number. Blank input leaves the channel as it was.
    pub fn with_whatsapp(mut self, number: &str) -> Self {
        if let Some(number) = non_blank(number) {
            self.whatsapp_number = Some(number);
        }
        self
    }

    // Site-wide number used when the page has none
    pub fn with_default_whatsapp(mut self, number: &str) -> Self {
        if let Some(number) = non_blank(number) {
            self.default_whatsapp = number;
        }
        self
    }

    pub fn whatsapp(&self) -> &str {
        self.whatsapp_number
            .as_deref()
            .unwrap_or(&self.default_whatsapp)
    }

    pub fn train() -> Self {
        let mut channel = Self::new(
            "train",
            "trainBookings",
            "TR",
            pricing::train_tickets(1500.0, 2000.0),
        );
        channel.currency = Currency::Lkr;
        channel.rules.require_nationality = true;
        channel.rules.passport_required_with = Some(HAND_DELIVERY);
        channel
    }

    pub fn national_parks() -> Self {
        Self::new(
            "national_parks",
            "nationalparks_bookings",
            "NP",
            pricing::national_parks(),
        )
    }

    /// National parks priced with the add-on amounts the admin saved on the
    /// page, and handed off to the page's booking number.
    pub fn national_parks_from(page: &NationalParksPage) -> Self {
        Self {
            plan: pricing::national_parks_with(&page.add_ons),
            ..Self::national_parks()
        }
        .with_whatsapp(&page.booking_whatsapp)
    }

    pub fn whale_watching_from(page: &WhaleWatchingPage) -> Self {
        Self::new(
            "whale_watching",
            "whaleWatchingBookings",
            "WW",
            pricing::whale_watching(&page.pricing),
        )
    }

    pub fn private_charters_from(page: &PrivateChartersPage) -> Self {
        Self::new(
            "private_charters",
            "privateCharterRequests",
            "PC",
            pricing::private_charters(),
        )
        .with_whatsapp(&page.booking.whatsapp)
    }

    pub fn private_tours() -> Self {
        let mut channel = Self::new(
            "private_tours",
            "privateTourBookings",
            "PT",
            pricing::private_tours(),
        );
        channel.scheme = ReferenceScheme::Sequential {
            counter: "privateTourBookings".to_string(),
            start: 1000,
            width: 5,
        };
        channel
    }

    pub fn wild_tours() -> Self {
        Self::new("wild_tours", "wildtours_bookings", "WT", pricing::wild_tours())
    }

    pub fn global_tours() -> Self {
        Self::new("global_tours", "globalTourBookings", "GT", pricing::global_tours())
    }

    pub fn cultural_tours() -> Self {
        Self::new(
            "cultural_tours",
            "cultural_bookings",
            "CT",
            pricing::cultural_tours(&[("airport", 35.0), ("negombo", 20.0)]),
        )
    }

    pub fn tea_trails() -> Self {
        Self::new("tea_trails", "teaTrailBookings", "TT", pricing::tea_trails())
    }

    pub fn hot_air_balloon() -> Self {
        Self::new(
            "hot_air_balloon",
            "hotAirBalloonBookings",
            "HB",
            pricing::hot_air_balloon(),
        )
    }
}

/// The part of a catalog item a booking snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct BookableItem {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub max_group_size: Option<u32>,
}

impl BookableItem {
    pub fn new(id: &str, name: &str, unit_price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit_price,
            max_group_size: None,
        }
    }
}

impl From<&SafariTour> for BookableItem {
    fn from(tour: &SafariTour) -> Self {
        Self {
            id: tour.id.clone(),
            name: tour.title.clone(),
            unit_price: tour.price,
            max_group_size: (tour.max_group_size > 0).then_some(tour.max_group_size),
        }
    }
}

impl BookableItem {
    // Priced per adult at the page's adult price
    pub fn whale_tour(tour: &WhaleTour, pricing: &WhalePricing) -> Self {
        Self::new(&tour.id, &tour.name, pricing.adult_price)
    }

    pub fn charter(kind: CharterType, pricing: &CharterPricing) -> Self {
        let id = kind.label().to_lowercase().replace(' ', "-");
        Self::new(&id, kind.label(), kind.minimum(pricing))
    }
}

impl From<&FlightPackage> for BookableItem {
    fn from(package: &FlightPackage) -> Self {
        Self::new(&package.id, &package.name, package.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub booking_reference: String,
    pub item_id: String,
    pub item_name: String,
    pub unit_price: f64,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub nationality: String,
    pub passport_number: Option<String>,
    pub travel_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub selected_options: Vec<String>,
    pub pickup_location: Option<String>,
    pub special_requests: Option<String>,
    pub pricing: Estimate,
    pub client_total: Option<f64>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    pub idempotency_key: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub id: String,
    pub reference: String,
    pub estimate: Estimate,
    pub whatsapp_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatistics {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub revenue: f64,
    // (item name, bookings), most booked first
    pub top_items: Vec<(String, usize)>,
}

// Releases the idempotency key when the submission finishes or is dropped
struct InFlightGuard<'a> {
    keys: &'a DashSet<String>,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}

pub struct BookingService {
    store: Arc<dyn DocumentStore>,
    channel: BookingChannel,
    in_flight: DashSet<String>,
    // Recent receipts by idempotency key. Older keys are answered from the store.
    receipts: ContentCache,
    receipt_ttl: Duration,
    counter_lock: Mutex<()>,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>, channel: BookingChannel) -> Self {
        Self {
            store,
            channel,
            in_flight: DashSet::new(),
            receipts: ContentCache::new(CacheConfig {
                max_size_mb: 1,
                default_ttl_seconds: DEFAULT_RECEIPT_TTL.as_secs(),
                eviction_policy: EvictionPolicy::OldestFirst,
            }),
            receipt_ttl: DEFAULT_RECEIPT_TTL,
            counter_lock: Mutex::new(()),
        }
    }

    pub fn with_receipt_ttl(mut self, ttl: Duration) -> Self {
        self.receipt_ttl = ttl;
        self
    }

    pub fn channel(&self) -> &BookingChannel {
        &self.channel
    }

    /// Validate, price and store a booking request.
    ///
    /// A form carrying an idempotency key that already produced a booking
    /// returns the original receipt; one still being processed is rejected.
    pub async fn submit(
        &self,
        form: &BookingForm,
        item: &BookableItem,
    ) -> Result<BookingReceipt, BookingError> {
        let key = form
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let _guard = match key {
            Some(key) => {
                if let Some(receipt) = self.remembered_receipt(key) {
                    info!("Replaying receipt {} for key {}", receipt.reference, key);
                    return Ok(receipt);
                }
                if !self.in_flight.insert(key.to_string()) {
                    warn!("Rejected concurrent submission for key {}", key);
                    return Err(BookingError::DuplicateSubmission(key.to_string()));
                }
                let guard = InFlightGuard {
                    keys: &self.in_flight,
                    key: key.to_string(),
                };
                if let Some(existing) = self.find_by_idempotency_key(key).await? {
                    let receipt = self.receipt_for(&existing, form);
                    self.remember_receipt(key, &receipt);
                    return Ok(receipt);
                }
                Some(guard)
            }
            None => None,
        };

        let rules = match item.max_group_size {
            Some(max_group_size) => ValidationRules {
                max_group_size,
                ..self.channel.rules.clone()
            },
            None => self.channel.rules.clone(),
        };
        let today = Utc::now().date_naive();
        validate(form, &rules, today)?;
        let Some(travel_date) = form.parsed_travel_date() else {
            return Err(BookingError::Validation(ValidationError(vec![FieldError {
                field: "travelDate",
                message: "Travel date must be YYYY-MM-DD".to_string(),
            }])));
        };

        if form.item_id != item.id {
            debug!("Form item {} priced as {}", form.item_id, item.id);
        }

        let estimate = self.estimate(form, item);
        if let Some(client_total) = form.client_total {
            if (client_total - estimate.total).abs() > PRICE_TOLERANCE {
                warn!(
                    "Client total {} differs from server total {} for {}",
                    client_total, estimate.total, item.id
                );
            }
        }

        let reference = self.next_reference().await;
        let now = Utc::now();
        let mut booking = Booking {
            id: String::new(),
            booking_reference: reference.clone(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            unit_price: item.unit_price,
            contact_name: form.contact_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            whatsapp: form.whatsapp.clone().filter(|w| !w.trim().is_empty()),
            nationality: form.nationality.trim().to_string(),
            passport_number: form.passport_number.clone(),
            travel_date,
            adults: form.adults,
            children: form.children,
            selected_options: form.selected_options.clone(),
            pickup_location: form.pickup_location.clone(),
            special_requests: form.special_requests.clone(),
            pricing: estimate,
            client_total: form.client_total,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            admin_notes: None,
            idempotency_key: key.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        booking.id = add_as(&*self.store, &self.channel.collection, &booking).await?;
        info!(
            "Created {} booking {} ({}) for {}",
            self.channel.name, booking.booking_reference, booking.id, booking.item_id
        );

        let receipt = self.receipt_for(&booking, form);
        if let Some(key) = key {
            self.remember_receipt(key, &receipt);
        }
        Ok(receipt)
    }

    fn remembered_receipt(&self, key: &str) -> Option<BookingReceipt> {
        let data = self.receipts.get(&receipt_cache_key(key))?;
        serde_json::from_slice(&data).ok()
    }

    fn remember_receipt(&self, key: &str, receipt: &BookingReceipt) {
        match serde_json::to_vec(receipt) {
            Ok(data) => {
                self.receipts.store(
                    &receipt_cache_key(key),
                    Bytes::from(data),
                    Some(self.receipt_ttl),
                );
            }
            Err(e) => warn!("Could not keep receipt {}: {}", receipt.reference, e),
        }
    }

    /// Server-side price for a form, ignoring whatever the browser computed.
    pub fn estimate(&self, form: &BookingForm, item: &BookableItem) -> Estimate {
        let currency = if self.channel.plan.converts() {
            form.currency
        } else {
            self.channel.currency
        };
        let input = EstimateInput {
            unit_price: item.unit_price,
            adults: form.adults,
            children: form.children,
            selected: form.selected_options.clone(),
            currency,
        };
        self.channel.plan.estimate(&input)
    }

    fn receipt_for(&self, booking: &Booking, form: &BookingForm) -> BookingReceipt {
        let message = booking_handoff_message(
            &booking.booking_reference,
            &booking.item_name,
            form,
            booking.pricing.total,
            booking.pricing.currency.code(),
        );
        BookingReceipt {
            id: booking.id.clone(),
            reference: booking.booking_reference.clone(),
            estimate: booking.pricing.clone(),
            whatsapp_link: whatsapp_link(self.channel.whatsapp(), &message),
        }
    }

    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Booking>, StoreError> {
        let query = Query::new().where_eq("idempotencyKey", key).limit(1);
        let mut found: Vec<Booking> = query_as(&*self.store, &self.channel.collection, &query).await?;
        Ok(found.pop())
    }

    pub async fn next_reference(&self) -> String {
        let prefix = &self.channel.reference_prefix;
        match &self.channel.scheme {
            ReferenceScheme::TimeRandom => time_random_reference(prefix, Utc::now()),
            ReferenceScheme::Sequential {
                counter,
                start,
                width,
            } => match self.next_sequence(counter, *start).await {
                Ok(number) => format!("{}{:0width$}", prefix, number, width = *width),
                Err(e) => {
                    warn!("Counter {} unavailable, using timestamp reference: {}", counter, e);
                    format!(
                        "{}{}",
                        prefix,
                        to_base36(Utc::now().timestamp_millis() as u64).to_uppercase()
                    )
                }
            },
        }
    }

    // The store has no atomic increment, so draws are serialized in-process
    async fn next_sequence(&self, counter: &str, start: u64) -> Result<u64, StoreError> {
        let _lock = self.counter_lock.lock().await;
        let last = self
            .store
            .get(COUNTERS_COLLECTION, counter)
            .await?
            .and_then(|doc| doc.get(COUNTER_FIELD).and_then(Value::as_u64))
            .unwrap_or(start);
        let next = last + 1;

        let mut patch = counter_document(next);
        patch.insert("updatedAt".to_string(), Value::from(Utc::now().timestamp_millis()));
        self.store.merge(COUNTERS_COLLECTION, counter, patch).await?;
        Ok(next)
    }

    // Admin operations

    /// Newest first, optionally restricted to one status.
    pub async fn list(
        &self,
        status: Option<BookingStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<Booking>, BookingError> {
        let mut query = Query::new().order_by("createdAt", Direction::Desc);
        if let Some(status) = status {
            query = query.where_eq("status", serde_json::to_value(status).map_err(StoreError::from)?);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query_as(&*self.store, &self.channel.collection, &query).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Booking, BookingError> {
        get_as(&*self.store, &self.channel.collection, id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    pub async fn get_by_reference(&self, reference: &str) -> Result<Booking, BookingError> {
        let query = Query::new().where_eq("bookingReference", reference).limit(1);
        let docs = self.store.query(&self.channel.collection, &query).await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(from_document(doc)?),
            None => Err(BookingError::NotFound(reference.to_string())),
        }
    }

    /// Any status may follow any other; the previous value is logged.
    pub async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        admin_notes: Option<&str>,
    ) -> Result<Booking, BookingError> {
        let current = self.get(id).await?;
        let mut patch = Document::new();
        patch.insert(
            "status".to_string(),
            serde_json::to_value(status).map_err(StoreError::from)?,
        );
        if let Some(notes) = admin_notes {
            patch.insert("adminNotes".to_string(), Value::from(notes));
        }
        let updated = self.apply_patch(id, patch).await?;
        info!(
            "Booking {} status {:?} -> {:?}",
            current.booking_reference, current.status, status
        );
        Ok(updated)
    }

    pub async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> Result<Booking, BookingError> {
        let current = self.get(id).await?;
        let mut patch = Document::new();
        patch.insert(
            "paymentStatus".to_string(),
            serde_json::to_value(payment_status).map_err(StoreError::from)?,
        );
        let updated = self.apply_patch(id, patch).await?;
        info!(
            "Booking {} payment {:?} -> {:?}",
            current.booking_reference, current.payment_status, payment_status
        );
        Ok(updated)
    }

    async fn apply_patch(&self, id: &str, mut patch: Document) -> Result<Booking, BookingError> {
        patch.insert(
            "updatedAt".to_string(),
            Value::from(Utc::now().timestamp_millis()),
        );
        self.store
            .update(&self.channel.collection, id, patch)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => BookingError::NotFound(id.to_string()),
                other => BookingError::Store(other),
            })?;
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), BookingError> {
        self.store
            .delete(&self.channel.collection, id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => BookingError::NotFound(id.to_string()),
                other => BookingError::Store(other),
            })?;
        info!("Deleted {} booking {}", self.channel.name, id);
        Ok(())
    }

    pub async fn statistics(&self) -> Result<BookingStatistics, BookingError> {
        let bookings = self.list(None, None).await?;
        let mut stats = BookingStatistics {
            total: bookings.len(),
            ..Default::default()
        };
        let mut per_item: HashMap<&str, usize> = HashMap::new();

        for booking in &bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Cancelled => stats.cancelled += 1,
                status if status.is_confirmed_or_later() => {
                    stats.confirmed += 1;
                    stats.revenue += booking.pricing.total;
                }
                _ => {}
            }
            *per_item.entry(booking.item_name.as_str()).or_default() += 1;
        }

        let mut top: Vec<(String, usize)> = per_item
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(TOP_ITEMS);
        stats.top_items = top;
        Ok(stats)
    }
}

pub fn time_random_reference(prefix: &str, now: DateTime<Utc>) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!(
        "{}{}{}",
        prefix,
        to_base36(now.timestamp_millis().max(0) as u64).to_uppercase(),
        suffix
    )
}

pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn receipt_cache_key(idempotency_key: &str) -> String {
    format!("receipt:{}", idempotency_key)
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn counter_document(last_number: u64) -> Document {
    let mut doc = Document::new();
    doc.insert(COUNTER_FIELD.to_string(), Value::from(last_number));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PageDocument;
    use crate::pricing::{FULL_DAY, GUIDE, PRIVATE_VEHICLE};
    use crate::store::{MemoryStore, UnavailableStore};
    use std::time::Duration;

    fn form(item_id: &str) -> BookingForm {
        BookingForm {
            item_id: item_id.to_string(),
            contact_name: "Alex Perera".to_string(),
            email: "alex@example.com".to_string(),
            phone: "+94 77 123 4567".to_string(),
            nationality: "Sri Lankan".to_string(),
            travel_date: "2099-01-15".to_string(),
            adults: 2,
            children: 1,
            agree_to_terms: true,
            ..Default::default()
        }
    }

    fn yala() -> BookableItem {
        BookableItem::new("yala-leopard", "Yala Leopard Safari", 85.0)
    }

    fn service(channel: BookingChannel) -> (Arc<MemoryStore>, BookingService) {
        let store = Arc::new(MemoryStore::new());
        let service = BookingService::new(store.clone(), channel);
        (store, service)
    }

    #[tokio::test]
    async fn test_submit_prices_on_server() {
        let (store, service) = service(BookingChannel::national_parks());
        let submitted = BookingForm {
            selected_options: vec![
                PRIVATE_VEHICLE.to_string(),
                GUIDE.to_string(),
                FULL_DAY.to_string(),
            ],
            client_total: Some(400.0),
            ..form("yala-leopard")
        };

        let receipt = service.submit(&submitted, &yala()).await.unwrap();
        assert_eq!(receipt.estimate.total, 431.0);
        assert!(receipt.reference.starts_with("NP"));
        assert!(receipt.whatsapp_link.starts_with("https://wa.me/94777721999?text="));
        assert_eq!(store.count("nationalparks_bookings"), 1);

        let booking = service.get(&receipt.id).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.item_name, "Yala Leopard Safari");
        assert_eq!(booking.client_total, Some(400.0));
        assert_eq!(booking.pricing.total, 431.0);
        assert_eq!(booking.id, receipt.id);
    }

    #[tokio::test]
    async fn test_missing_email_writes_nothing() {
        let (store, service) = service(BookingChannel::national_parks());
        let invalid = BookingForm {
            email: String::new(),
            ..form("yala-leopard")
        };
        let err = service.submit(&invalid, &yala()).await.unwrap_err();
        match err {
            BookingError::Validation(e) => assert!(e.has_field("email")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count("nationalparks_bookings"), 0);
    }

    #[tokio::test]
    async fn test_item_group_size_overrides_plan() {
        let (_, service) = service(BookingChannel::national_parks());
        let small = BookableItem {
            max_group_size: Some(2),
            ..yala()
        };
        let crowd = BookingForm {
            adults: 3,
            children: 0,
            ..form("yala-leopard")
        };
        assert!(matches!(
            service.submit(&crowd, &small).await,
            Err(BookingError::Validation(_))
        ));
        assert!(service.submit(&crowd, &yala()).await.is_ok());
    }

    #[tokio::test]
    async fn test_same_idempotency_key_returns_first_receipt() {
        let (store, service) = service(BookingChannel::wild_tours());
        let keyed = BookingForm {
            idempotency_key: Some("form-42".to_string()),
            ..form("leopard-trail")
        };
        let item = BookableItem::new("leopard-trail", "Leopard Trail", 65.0);

        let (first, second) = tokio::join!(service.submit(&keyed, &item), service.submit(&keyed, &item));
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_eq!(first.reference, second.reference);

        let third = service.submit(&keyed, &item).await.unwrap();
        assert_eq!(third, first);
        assert_eq!(store.count("wildtours_bookings"), 1);
    }

    #[tokio::test]
    async fn test_children_count_toward_group_size() {
        let (store, service) = service(BookingChannel::national_parks());
        let crowd = BookingForm {
            adults: 15,
            children: 10,
            ..form("yala-leopard")
        };
        match service.submit(&crowd, &yala()).await {
            Err(BookingError::Validation(e)) => assert!(e.has_field("guests")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(store.count("nationalparks_bookings"), 0);
    }

    #[tokio::test]
    async fn test_expired_receipt_is_replayed_from_store() {
        let (store, service) = service(BookingChannel::wild_tours());
        let service = service.with_receipt_ttl(Duration::from_millis(20));
        let keyed = BookingForm {
            idempotency_key: Some("form-99".to_string()),
            ..form("leopard-trail")
        };
        let item = BookableItem::new("leopard-trail", "Leopard Trail", 65.0);

        let first = service.submit(&keyed, &item).await.unwrap();
        assert_eq!(service.remembered_receipt("form-99"), Some(first.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(service.remembered_receipt("form-99"), None);
        assert_eq!(service.receipts.stats().items_count, 0);

        let again = service.submit(&keyed, &item).await.unwrap();
        assert_eq!(again.reference, first.reference);
        assert_eq!(store.count("wildtours_bookings"), 1);
    }

    #[tokio::test]
    async fn test_national_parks_channel_follows_page_add_ons() {
        let mut page = NationalParksPage::defaults();
        page.add_ons.private_vehicle_fee = 80.0;
        page.booking_whatsapp = "+94 11 234 5678".to_string();
        let (_, service) = service(BookingChannel::national_parks_from(&page));

        let submitted = BookingForm {
            selected_options: vec![PRIVATE_VEHICLE.to_string()],
            ..form("yala-leopard")
        };
        let receipt = service.submit(&submitted, &yala()).await.unwrap();
        // 212.5 base plus the page's 80 vehicle fee, rounded
        assert_eq!(receipt.estimate.total, 293.0);
        assert!(receipt.whatsapp_link.starts_with("https://wa.me/94112345678?text="));
    }

    #[test]
    fn test_page_number_wins_over_site_number() {
        let site = BookingChannel::wild_tours().with_default_whatsapp("+94 70 000 0000");
        assert_eq!(site.whatsapp(), "+94 70 000 0000");

        let page = site.clone().with_whatsapp("+94 77 111 2222");
        assert_eq!(page.whatsapp(), "+94 77 111 2222");
        assert_eq!(page.clone().with_whatsapp("  ").whatsapp(), "+94 77 111 2222");
        assert_eq!(
            page.with_default_whatsapp("+94 71 999 9999").whatsapp(),
            "+94 77 111 2222"
        );
        assert_eq!(BookingChannel::train().whatsapp(), DEFAULT_WHATSAPP);
    }

    #[tokio::test]
    async fn test_whale_watching_prices_children_separately() {
        let page = WhaleWatchingPage::defaults();
        let (store, service) = service(BookingChannel::whale_watching_from(&page));
        let item = BookableItem::whale_tour(&page.tours[0], &page.pricing);
        let family = BookingForm {
            adults: 2,
            children: 2,
            ..form(&item.id)
        };

        let receipt = service.submit(&family, &item).await.unwrap();
        // 65 × 2 + 35 × 2
        assert_eq!(receipt.estimate.total, 200.0);
        assert!(receipt.reference.starts_with("WW"));
        assert_eq!(store.count("whaleWatchingBookings"), 1);
    }

    #[tokio::test]
    async fn test_charter_request_quotes_type_minimum() {
        let page = PrivateChartersPage::defaults();
        let (_, service) = service(BookingChannel::private_charters_from(&page));
        let jet = BookableItem::charter(CharterType::PrivateJet, &page.pricing);
        assert_eq!(jet.id, "private-jet");

        let receipt = service.submit(&form(&jet.id), &jet).await.unwrap();
        assert_eq!(receipt.estimate.total, 18000.0);
        assert_eq!(receipt.estimate.deposit, Some(5400.0));
        assert!(receipt.reference.starts_with("PC"));
    }

    #[tokio::test]
    async fn test_key_found_in_store_is_not_resubmitted() {
        let store = Arc::new(MemoryStore::new());
        let keyed = BookingForm {
            idempotency_key: Some("form-7".to_string()),
            ..form("yala-leopard")
        };
        let first = BookingService::new(store.clone(), BookingChannel::national_parks())
            .submit(&keyed, &yala())
            .await
            .unwrap();

        // A fresh service has no in-memory receipts
        let restarted = BookingService::new(store.clone(), BookingChannel::national_parks());
        let again = restarted.submit(&keyed, &yala()).await.unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(store.count("nationalparks_bookings"), 1);
    }

    #[tokio::test]
    async fn test_in_flight_key_is_rejected() {
        let (store, service) = service(BookingChannel::national_parks());
        service.in_flight.insert("busy".to_string());
        let keyed = BookingForm {
            idempotency_key: Some("busy".to_string()),
            ..form("yala-leopard")
        };
        assert!(matches!(
            service.submit(&keyed, &yala()).await,
            Err(BookingError::DuplicateSubmission(key)) if key == "busy"
        ));
        assert_eq!(store.count("nationalparks_bookings"), 0);

        service.in_flight.remove("busy");
        assert!(service.submit(&keyed, &yala()).await.is_ok());
        assert!(service.in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_references() {
        let (store, service) = service(BookingChannel::private_tours());
        assert_eq!(service.next_reference().await, "PT01001");
        assert_eq!(service.next_reference().await, "PT01002");

        store
            .set(COUNTERS_COLLECTION, "privateTourBookings", counter_document(1500))
            .await
            .unwrap();
        let receipt = service
            .submit(&form("kandy-ella"), &BookableItem::new("kandy-ella", "Kandy & Ella", 250.0))
            .await
            .unwrap();
        assert_eq!(receipt.reference, "PT01501");
        assert_eq!(receipt.estimate.total, 656.0);
    }

    #[tokio::test]
    async fn test_sequential_reference_falls_back_to_timestamp() {
        let service = BookingService::new(Arc::new(UnavailableStore), BookingChannel::private_tours());
        let reference = service.next_reference().await;
        assert!(reference.starts_with("PT"));
        assert!(!reference.starts_with("PT0"));
    }

    #[test]
    fn test_time_random_reference_shape() {
        let now = Utc::now();
        let reference = time_random_reference("TR", now);
        let stamp = to_base36(now.timestamp_millis() as u64).to_uppercase();
        assert!(reference.starts_with(&format!("TR{}", stamp)));
        assert_eq!(reference.len(), 2 + stamp.len() + 4);
        assert!(reference.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[tokio::test]
    async fn test_train_hand_delivery_needs_passport() {
        let (_, service) = service(BookingChannel::train());
        let item = BookableItem::new("kandy-ella", "Kandy to Ella", 1200.0);
        let delivered = BookingForm {
            selected_options: vec![HAND_DELIVERY.to_string()],
            ..form("kandy-ella")
        };
        let err = service.submit(&delivered, &item).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(e) if e.has_field("passportNumber")));

        let with_passport = BookingForm {
            passport_number: Some("N1234567".to_string()),
            ..delivered
        };
        let receipt = service.submit(&with_passport, &item).await.unwrap();
        assert!(receipt.reference.starts_with("TR"));
        assert_eq!(receipt.estimate.total, 7100.0);
        assert_eq!(receipt.estimate.currency, Currency::Lkr);
    }

    #[tokio::test]
    async fn test_status_and_payment_move_independently() {
        let (_, service) = service(BookingChannel::national_parks());
        let receipt = service.submit(&form("yala-leopard"), &yala()).await.unwrap();

        let booking = service
            .update_status(&receipt.id, BookingStatus::Completed, Some("Guide assigned"))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Completed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.admin_notes.as_deref(), Some("Guide assigned"));

        // Backwards moves are allowed
        let booking = service
            .update_status(&receipt.id, BookingStatus::Pending, None)
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.admin_notes.as_deref(), Some("Guide assigned"));

        let booking = service
            .update_payment_status(&receipt.id, PaymentStatus::Refunded)
            .await
            .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Refunded);
        assert_eq!(booking.status, BookingStatus::Pending);

        let by_reference = service.get_by_reference(&receipt.reference).await.unwrap();
        assert_eq!(by_reference.id, receipt.id);
    }

    #[tokio::test]
    async fn test_missing_booking_is_not_found() {
        let (_, service) = service(BookingChannel::national_parks());
        assert!(matches!(
            service.update_status("nope", BookingStatus::Confirmed, None).await,
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(service.delete("nope").await, Err(BookingError::NotFound(_))));
        assert!(matches!(
            service.get_by_reference("NPNOPE").await,
            Err(BookingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_statistics() {
        let (_, service) = service(BookingChannel::national_parks());
        let minneriya = BookableItem::new("minneriya-gathering", "Minneriya Gathering", 120.0);

        let a = service.submit(&form("yala-leopard"), &yala()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let b = service.submit(&form("yala-leopard"), &yala()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let c = service.submit(&form("minneriya-gathering"), &minneriya).await.unwrap();

        service
            .update_status(&a.id, BookingStatus::Confirmed, None)
            .await
            .unwrap();
        service
            .update_status(&c.id, BookingStatus::Cancelled, None)
            .await
            .unwrap();

        let all = service.list(None, None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![c.id.as_str(), b.id.as_str(), a.id.as_str()]);

        let pending = service.list(Some(BookingStatus::Pending), None).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b.id);
        assert_eq!(service.list(None, Some(2)).await.unwrap().len(), 2);

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.revenue, a.estimate.total);
        assert_eq!(
            stats.top_items,
            vec![
                ("Yala Leopard Safari".to_string(), 2),
                ("Minneriya Gathering".to_string(), 1)
            ]
        );

        service.delete(&b.id).await.unwrap();
        assert_eq!(service.list(None, None).await.unwrap().len(), 2);
    }
}
