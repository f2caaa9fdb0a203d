// Booking form schema
// Checked on every submission before anything is priced or written.

use crate::pricing::{clamp_guests, Currency};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PHONE_DIGITS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingForm {
    pub item_id: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub nationality: String,
    pub passport_number: Option<String>,
    pub travel_date: String,
    pub adults: u32,
    pub children: u32,
    pub selected_options: Vec<String>,
    pub pickup_location: Option<String>,
    pub special_requests: Option<String>,
    pub currency: Currency,
    pub client_total: Option<f64>,
    pub idempotency_key: Option<String>,
    pub agree_to_terms: bool,
}

impl BookingForm {
    pub fn guests(&self) -> u32 {
        self.adults + self.children
    }

    /// Adult stepper. Keeps at least one adult and leaves room for the
    /// children already on the form.
    pub fn step_adults(&mut self, delta: i64, rules: &ValidationRules) {
        let room = rules.max_group_size.saturating_sub(self.children);
        self.adults = clamp_guests(self.adults as i64 + delta, room);
    }

    pub fn step_children(&mut self, delta: i64, rules: &ValidationRules) {
        let room = rules
            .max_children
            .min(rules.max_group_size.saturating_sub(self.adults));
        self.children = (self.children as i64 + delta).clamp(0, room as i64) as u32;
    }

    // Only meaningful after `validate` succeeded
    pub fn parsed_travel_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.travel_date.trim(), DATE_FORMAT).ok()
    }
}

#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub max_group_size: u32,
    pub max_children: u32,
    pub require_nationality: bool,
    pub require_terms: bool,
    // Selecting this option makes the passport number mandatory
    pub passport_required_with: Option<&'static str>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_group_size: 15,
            max_children: 10,
            require_nationality: false,
            require_terms: true,
            passport_required_with: None,
        }
    }
}

impl ValidationRules {
    pub fn for_group_size(max_group_size: u32) -> Self {
        Self {
            max_group_size,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid booking form: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

/// Validate every field and report all failures together.
pub fn validate(
    form: &BookingForm,
    rules: &ValidationRules,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, message: &str| {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        })
    };

    if form.item_id.trim().is_empty() {
        fail("itemId", "Select an item to book");
    }
    if form.contact_name.trim().chars().count() < MIN_NAME_LEN {
        fail("contactName", "Name must be at least 2 characters");
    }
    if form.email.trim().is_empty() {
        fail("email", "Email is required");
    } else if !is_valid_email(form.email.trim()) {
        fail("email", "Enter a valid email address");
    }
    if !is_valid_phone(&form.phone) {
        fail("phone", "Phone number must have at least 8 digits");
    }
    if let Some(whatsapp) = form.whatsapp.as_deref().filter(|w| !w.trim().is_empty()) {
        if !is_valid_phone(whatsapp) {
            fail("whatsapp", "WhatsApp number must have at least 8 digits");
        }
    }
    if rules.require_nationality && form.nationality.trim().chars().count() < MIN_NAME_LEN {
        fail("nationality", "Nationality is required");
    }

    if let Some(option) = rules.passport_required_with {
        let has_passport = form
            .passport_number
            .as_deref()
            .map_or(false, |p| !p.trim().is_empty());
        if form.selected_options.iter().any(|o| o == option) && !has_passport {
            fail("passportNumber", "Passport number is required for this option");
        }
    }

    match form.parsed_travel_date() {
        None if form.travel_date.trim().is_empty() => fail("travelDate", "Travel date is required"),
        None => fail("travelDate", "Travel date must be YYYY-MM-DD"),
        Some(date) if date <= today => fail("travelDate", "Travel date must be in the future"),
        Some(_) => {}
    }

    if form.adults < 1 {
        fail("adults", "At least one adult is required");
    }
    if form.children > rules.max_children {
        fail("children", &format!("At most {} children", rules.max_children));
    }
    // Children take seats too
    if form.guests() > rules.max_group_size {
        fail(
            "guests",
            &format!("At most {} guests per booking", rules.max_group_size),
        );
    }
    if rules.require_terms && !form.agree_to_terms {
        fail("agreeToTerms", "You must accept the terms and conditions");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

pub fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    allowed && phone.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}
