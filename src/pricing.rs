// Booking estimate calculator
// Every booking page prices the same way (unit price per adult, a child
// factor, then a list of add-ons and modifiers) but applies the add-ons in its
// own order. A `PricingPlan` pins one page's order so results stay identical.

use crate::pages::national_parks::SafariAddOns;
use crate::pages::private_charters::CharterPricing;
use crate::pages::whale_watching::WhalePricing;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CHILD_FACTOR: f64 = 0.5;
pub const DEFAULT_MAX_GROUP_SIZE: u32 = 20;

#[derive(Error, Debug, PartialEq)]
pub enum PricingError {
    #[error("Invalid guest count: {0:?}")]
    InvalidGuestCount(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Lkr,
}

impl Currency {
    // Fixed display rates from USD
    pub fn rate(&self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Eur => 0.92,
            Currency::Gbp => 0.79,
            Currency::Lkr => 300.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Lkr => "LKR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimateInput {
    pub unit_price: f64,
    pub adults: u32,
    pub children: u32,
    pub selected: Vec<String>,
    pub currency: Currency,
}

impl EstimateInput {
    pub fn new(unit_price: f64, adults: u32, children: u32) -> Self {
        Self {
            unit_price,
            adults,
            children,
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.selected = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn guests(&self) -> u32 {
        self.adults + self.children
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }
}

/// One pricing instruction. Option-gated steps only apply when the named
/// option is among the selected ones.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceStep {
    // Always charged
    Fee { label: String, amount: f64 },
    Flat { option: String, amount: f64 },
    PerGuest { option: String, amount: f64 },
    Multiply { option: String, factor: f64 },
    // Adds round(running total × rate)
    ServiceFee { rate: f64 },
    // Converts the running total into the input currency
    Convert,
    Round,
}

impl PriceStep {
    pub fn fee(label: &str, amount: f64) -> Self {
        PriceStep::Fee {
            label: label.to_string(),
            amount,
        }
    }

    pub fn flat(option: &str, amount: f64) -> Self {
        PriceStep::Flat {
            option: option.to_string(),
            amount,
        }
    }

    pub fn per_guest(option: &str, amount: f64) -> Self {
        PriceStep::PerGuest {
            option: option.to_string(),
            amount,
        }
    }

    pub fn multiply(option: &str, factor: f64) -> Self {
        PriceStep::Multiply {
            option: option.to_string(),
            factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub base: f64,
    pub adjustments: Vec<Adjustment>,
    pub total: f64,
    pub deposit: Option<f64>,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingPlan {
    pub name: String,
    pub child_factor: f64,
    // Overrides the factor when the page lists its own child price
    pub fixed_child_price: Option<f64>,
    pub round_child_price: bool,
    // The unit price covers the whole party
    pub per_booking: bool,
    pub max_group_size: u32,
    pub steps: Vec<PriceStep>,
    pub deposit_rate: Option<f64>,
}

impl PricingPlan {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            child_factor: DEFAULT_CHILD_FACTOR,
            fixed_child_price: None,
            round_child_price: false,
            per_booking: false,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            steps: Vec::new(),
            deposit_rate: None,
        }
    }

    pub fn child_price(&self, unit_price: f64) -> f64 {
        let price = self
            .fixed_child_price
            .unwrap_or(unit_price * self.child_factor);
        if self.round_child_price {
            price.round()
        } else {
            price
        }
    }

    // Plans without a conversion step quote in the item's own currency
    pub fn converts(&self) -> bool {
        self.steps.contains(&PriceStep::Convert)
    }

    pub fn estimate(&self, input: &EstimateInput) -> Estimate {
        let base = if self.per_booking {
            input.unit_price
        } else {
            input.unit_price * input.adults as f64
                + self.child_price(input.unit_price) * input.children as f64
        };

        let mut total = base;
        let mut adjustments = Vec::new();
        let mut record = |label: String, before: f64, after: f64| {
            if after != before {
                adjustments.push(Adjustment {
                    label,
                    amount: after - before,
                });
            }
        };

        for step in &self.steps {
            let before = total;
            match step {
                PriceStep::Fee { label, amount } => {
                    total += amount;
                    record(label.clone(), before, total);
                }
                PriceStep::Flat { option, amount } if input.is_selected(option) => {
                    total += amount;
                    record(option.clone(), before, total);
                }
                PriceStep::PerGuest { option, amount } if input.is_selected(option) => {
                    total += amount * input.guests() as f64;
                    record(option.clone(), before, total);
                }
                PriceStep::Multiply { option, factor } if input.is_selected(option) => {
                    total *= factor;
                    record(option.clone(), before, total);
                }
                PriceStep::ServiceFee { rate } => {
                    total += (total * rate).round();
                    record("service_fee".to_string(), before, total);
                }
                PriceStep::Convert => {
                    total *= input.currency.rate();
                    record(format!("currency_{}", input.currency.code()), before, total);
                }
                PriceStep::Round => {
                    total = total.round();
                    record("rounding".to_string(), before, total);
                }
                _ => {}
            }
        }

        Estimate {
            base,
            adjustments,
            total,
            deposit: self.deposit_rate.map(|rate| deposit(total, rate)),
            currency: input.currency,
        }
    }
}

// Options shared by the safari pages
pub const PRIVATE_VEHICLE: &str = "private_vehicle";
pub const GUIDE: &str = "guide";
pub const FULL_DAY: &str = "full_day";

/// National parks: flats are added before the full-day multiplier, then rounded.
pub fn national_parks() -> PricingPlan {
    national_parks_with(&SafariAddOns {
        private_vehicle_fee: 50.0,
        guide_fee: 25.0,
        full_day_multiplier: 1.5,
    })
}

// Same order, amounts taken from the page's editable add-ons section
pub fn national_parks_with(add_ons: &SafariAddOns) -> PricingPlan {
    PricingPlan {
        max_group_size: 15,
        steps: vec![
            PriceStep::flat(PRIVATE_VEHICLE, add_ons.private_vehicle_fee),
            PriceStep::flat(GUIDE, add_ons.guide_fee),
            PriceStep::multiply(FULL_DAY, add_ons.full_day_multiplier),
            PriceStep::Round,
        ],
        ..PricingPlan::new("national_parks")
    }
}

/// Cultural tours: per-guest pickup surcharge, currency conversion, then rounding.
pub fn cultural_tours(pickup_costs: &[(&str, f64)]) -> PricingPlan {
    let mut steps: Vec<PriceStep> = pickup_costs
        .iter()
        .filter(|(_, cost)| *cost > 0.0)
        .map(|(id, cost)| PriceStep::per_guest(id, *cost))
        .collect();
    steps.push(PriceStep::Convert);
    steps.push(PriceStep::Round);

    PricingPlan {
        steps,
        ..PricingPlan::new("cultural_tours")
    }
}

/// Tea trails: the child price is rounded on its own, pickup is charged per guest.
pub fn tea_trails() -> PricingPlan {
    PricingPlan {
        round_child_price: true,
        max_group_size: 10,
        steps: vec![
            PriceStep::per_guest("airport", 35.0),
            PriceStep::per_guest("negombo", 20.0),
        ],
        ..PricingPlan::new("tea_trails")
    }
}

/// Wild tours: flat price per guest with a 20% deposit.
pub fn wild_tours() -> PricingPlan {
    PricingPlan {
        child_factor: 1.0,
        deposit_rate: Some(0.2),
        ..PricingPlan::new("wild_tours")
    }
}

/// Global tours: half-price children, no rounding.
pub fn global_tours() -> PricingPlan {
    PricingPlan::new("global_tours")
}

/// Hot-air balloon: teen tickets at 60% of the starting price, rounded.
pub fn hot_air_balloon() -> PricingPlan {
    PricingPlan {
        child_factor: 0.6,
        round_child_price: true,
        max_group_size: 10,
        deposit_rate: Some(0.2),
        ..PricingPlan::new("hot_air_balloon")
    }
}

/// Private tours: 5% service fee on the subtotal.
pub fn private_tours() -> PricingPlan {
    PricingPlan {
        max_group_size: 15,
        steps: vec![PriceStep::ServiceFee { rate: 0.05 }, PriceStep::Round],
        ..PricingPlan::new("private_tours")
    }
}

/// Whale watching: the page's adult price per adult and its own child price
/// per child, nothing else.
pub fn whale_watching(pricing: &WhalePricing) -> PricingPlan {
    PricingPlan {
        fixed_child_price: Some(pricing.child_price),
        max_group_size: 20,
        ..PricingPlan::new("whale_watching")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharterType {
    Superyacht,
    #[serde(rename = "Private Jet")]
    PrivateJet,
    Helicopter,
}

impl CharterType {
    pub fn label(&self) -> &'static str {
        match self {
            CharterType::Superyacht => "Superyacht",
            CharterType::PrivateJet => "Private Jet",
            CharterType::Helicopter => "Helicopter",
        }
    }

    // Unknown labels quote as a superyacht
    pub fn from_label(label: &str) -> Self {
        match label {
            "Private Jet" => CharterType::PrivateJet,
            "Helicopter" => CharterType::Helicopter,
            _ => CharterType::Superyacht,
        }
    }

    pub fn minimum(&self, pricing: &CharterPricing) -> f64 {
        match self {
            CharterType::Superyacht => pricing.yacht_minimum,
            CharterType::PrivateJet => pricing.jet_minimum,
            CharterType::Helicopter => pricing.helicopter_minimum,
        }
    }
}

/// Private charters: the estimate is the charter type's minimum whatever the
/// party size, with a 30% deposit.
pub fn private_charters() -> PricingPlan {
    PricingPlan {
        per_booking: true,
        max_group_size: 16,
        deposit_rate: Some(0.3),
        ..PricingPlan::new("private_charters")
    }
}

pub const HAND_DELIVERY: &str = "hand_delivery";

/// Train tickets: every passenger pays the ticket price, plus the booking
/// service fee and the optional hotel hand delivery (LKR).
pub fn train_tickets(service_fee: f64, delivery_fee: f64) -> PricingPlan {
    PricingPlan {
        child_factor: 1.0,
        max_group_size: 10,
        steps: vec![
            PriceStep::fee("service_fee", service_fee),
            PriceStep::flat(HAND_DELIVERY, delivery_fee),
        ],
        ..PricingPlan::new("train_tickets")
    }
}

pub fn deposit(total: f64, rate: f64) -> f64 {
    (total * rate).round()
}

/// Clamp a stepper value into `[1, max]`.
pub fn clamp_guests(value: i64, max: u32) -> u32 {
    value.clamp(1, max.max(1) as i64) as u32
}

/// Parse a guest count typed into a form field. Non-numeric input is an
/// error rather than a silent zero.
pub fn parse_guest_count(text: &str) -> Result<u32, PricingError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| PricingError::InvalidGuestCount(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_national_parks_pinned_example() {
        let input = EstimateInput::new(85.0, 2, 1).with_options(&[PRIVATE_VEHICLE, GUIDE, FULL_DAY]);
        let estimate = national_parks().estimate(&input);
        assert_eq!(estimate.base, 212.5);
        assert_eq!(estimate.total, 431.0);

        let labels: Vec<&str> = estimate.adjustments.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec![PRIVATE_VEHICLE, GUIDE, FULL_DAY, "rounding"]);
    }

    #[test_case(&[], 213.0 ; "no options rounds base")]
    #[test_case(&[GUIDE], 238.0 ; "guide only")]
    #[test_case(&[FULL_DAY], 319.0 ; "multiplier without flats")]
    #[test_case(&[PRIVATE_VEHICLE, FULL_DAY], 394.0 ; "flat applied before multiplier")]
    fn test_national_parks_order(options: &[&str], expected: f64) {
        let input = EstimateInput::new(85.0, 2, 1).with_options(options);
        assert_eq!(national_parks().estimate(&input).total, expected);
    }

    #[test]
    fn test_national_parks_uses_page_add_ons() {
        let plan = national_parks_with(&SafariAddOns {
            private_vehicle_fee: 100.0,
            guide_fee: 0.0,
            full_day_multiplier: 2.0,
        });
        let input = EstimateInput::new(100.0, 1, 0).with_options(&[PRIVATE_VEHICLE, FULL_DAY]);
        assert_eq!(plan.estimate(&input).total, 400.0);
    }

    #[test_case(Currency::Usd, 210.0)]
    #[test_case(Currency::Eur, 193.0)]
    #[test_case(Currency::Gbp, 166.0)]
    fn test_cultural_tours_convert_after_pickup(currency: Currency, expected: f64) {
        // 60 × 2 + 30 × 1, plus 20 × 3 guests for the Negombo pickup
        let plan = cultural_tours(&[("airport", 35.0), ("negombo", 20.0), ("colombo", 0.0)]);
        let input = EstimateInput::new(60.0, 2, 1)
            .with_options(&["negombo"])
            .with_currency(currency);
        assert_eq!(plan.estimate(&input).total, expected);
    }

    #[test]
    fn test_tea_trails_round_child_price_first() {
        let plan = tea_trails();
        assert_eq!(plan.child_price(45.0), 23.0);
        let input = EstimateInput::new(45.0, 2, 2).with_options(&["airport"]);
        // 90 + 46 + 35 × 4
        assert_eq!(plan.estimate(&input).total, 276.0);
    }

    #[test]
    fn test_wild_tours_deposit() {
        let estimate = wild_tours().estimate(&EstimateInput::new(65.0, 3, 0));
        assert_eq!(estimate.total, 195.0);
        assert_eq!(estimate.deposit, Some(39.0));
    }

    #[test]
    fn test_global_tours_keep_fractions() {
        let estimate = global_tours().estimate(&EstimateInput::new(99.0, 1, 1));
        assert_eq!(estimate.total, 148.5);
        assert!(estimate.adjustments.is_empty());
    }

    #[test]
    fn test_hot_air_balloon_teen_price() {
        let plan = hot_air_balloon();
        assert_eq!(plan.child_price(225.0), 135.0);
        assert_eq!(plan.child_price(219.0), 131.0);
        let estimate = plan.estimate(&EstimateInput::new(219.0, 2, 1));
        assert_eq!(estimate.total, 569.0);
        assert_eq!(estimate.deposit, Some(114.0));
    }

    #[test]
    fn test_private_tours_service_fee() {
        let estimate = private_tours().estimate(&EstimateInput::new(250.0, 2, 0));
        assert_eq!(estimate.total, 525.0);
        assert_eq!(estimate.adjustments[0].label, "service_fee");
        assert_eq!(estimate.adjustments[0].amount, 25.0);
    }

    #[test]
    fn test_train_tickets_fees() {
        let plan = train_tickets(1500.0, 2000.0);
        let plain = plan.estimate(&EstimateInput::new(1200.0, 2, 1));
        assert_eq!(plain.total, 5100.0);
        let delivered = plan.estimate(&EstimateInput::new(1200.0, 2, 1).with_options(&[HAND_DELIVERY]));
        assert_eq!(delivered.total, 7100.0);
        assert_eq!(delivered.adjustments.len(), 2);
    }

    #[test]
    fn test_whale_watching_uses_page_prices() {
        let plan = whale_watching(&WhalePricing {
            adult_price: 65.0,
            child_price: 35.0,
            ..Default::default()
        });
        assert_eq!(plan.child_price(65.0), 35.0);
        let estimate = plan.estimate(&EstimateInput::new(65.0, 2, 1));
        assert_eq!(estimate.base, 165.0);
        assert_eq!(estimate.total, 165.0);
        assert!(estimate.adjustments.is_empty());
        assert_eq!(estimate.deposit, None);
    }

    #[test_case(CharterType::Superyacht, 4500.0)]
    #[test_case(CharterType::PrivateJet, 18000.0)]
    #[test_case(CharterType::Helicopter, 2200.0)]
    fn test_private_charters_quote_the_minimum(kind: CharterType, expected: f64) {
        let pricing = CharterPricing {
            yacht_minimum: 4500.0,
            jet_minimum: 18000.0,
            helicopter_minimum: 2200.0,
            ..Default::default()
        };
        let minimum = kind.minimum(&pricing);
        // Party size does not change a charter quote
        for (adults, children) in [(1, 0), (6, 4)] {
            let estimate = private_charters().estimate(&EstimateInput::new(minimum, adults, children));
            assert_eq!(estimate.total, expected);
        }
        assert_eq!(
            private_charters().estimate(&EstimateInput::new(minimum, 2, 0)).deposit,
            Some((expected * 0.3).round())
        );
    }

    #[test]
    fn test_charter_type_labels() {
        assert_eq!(CharterType::from_label("Private Jet"), CharterType::PrivateJet);
        assert_eq!(CharterType::from_label("Seaplane"), CharterType::Superyacht);
        assert_eq!(
            CharterType::from_label(CharterType::Helicopter.label()),
            CharterType::Helicopter
        );
    }

    #[test_case(0, 15, 1)]
    #[test_case(-4, 15, 1)]
    #[test_case(7, 15, 7)]
    #[test_case(40, 15, 15)]
    #[test_case(3, 0, 1 ; "zero max still allows one guest")]
    fn test_clamp_guests(value: i64, max: u32, expected: u32) {
        assert_eq!(clamp_guests(value, max), expected);
    }

    #[test_case("4", Ok(4))]
    #[test_case(" 2 ", Ok(2))]
    #[test_case("", Err(PricingError::InvalidGuestCount(String::new())))]
    #[test_case("two", Err(PricingError::InvalidGuestCount("two".to_string())))]
    #[test_case("-1", Err(PricingError::InvalidGuestCount("-1".to_string())))]
    fn test_parse_guest_count(text: &str, expected: Result<u32, PricingError>) {
        assert_eq!(parse_guest_count(text), expected);
    }
}
