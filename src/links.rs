// Outbound hand-off links
// Bookings are handed to staff through pre-filled WhatsApp, mail and phone
// links. Nothing here talks to the messaging providers.

use crate::validation::BookingForm;

pub const WHATSAPP_BASE: &str = "https://wa.me/";

pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `https://wa.me/<digits>?text=<encoded message>`.
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let base = format!("{}{}", WHATSAPP_BASE, phone_digits(phone));
    if message.is_empty() {
        return base;
    }
    format!("{}?text={}", base, encode_component(message))
}

pub fn mailto_link(email: &str, subject: &str, body: &str) -> String {
    let mut link = format!("mailto:{}", email.trim());
    let mut params = Vec::new();
    if !subject.is_empty() {
        params.push(format!("subject={}", encode_component(subject)));
    }
    if !body.is_empty() {
        params.push(format!("body={}", encode_component(body)));
    }
    if !params.is_empty() {
        link.push('?');
        link.push_str(&params.join("&"));
    }
    link
}

// Keeps a leading plus for international numbers
pub fn tel_link(phone: &str) -> String {
    let digits = phone_digits(phone);
    if phone.trim_start().starts_with('+') {
        format!("tel:+{}", digits)
    } else {
        format!("tel:{}", digits)
    }
}

/// Percent-encode a link component. Spaces become %20, not '+', which
/// mail clients and WhatsApp would show literally.
pub fn encode_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Pre-filled message staff receive when a customer taps the WhatsApp button
/// after submitting.
pub fn booking_handoff_message(
    reference: &str,
    item_name: &str,
    form: &BookingForm,
    total: f64,
    currency: &str,
) -> String {
    let mut lines = vec![
        format!("New booking request {}", reference),
        format!("Experience: {}", item_name),
        format!("Date: {}", form.travel_date),
        format!("Guests: {} adults, {} children", form.adults, form.children),
        format!("Name: {}", form.contact_name),
        format!("Email: {}", form.email),
        format!("Phone: {}", form.phone),
    ];
    if !form.selected_options.is_empty() {
        lines.push(format!("Options: {}", form.selected_options.join(", ")));
    }
    if let Some(pickup) = form.pickup_location.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("Pickup: {}", pickup));
    }
    if let Some(requests) = form.special_requests.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("Requests: {}", requests));
    }
    lines.push(format!("Estimated total: {} {:.2}", currency, total));
    lines.join("\n")
}
