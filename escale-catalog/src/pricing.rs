use escale_core::tourisme::TicketType;
use serde::{Deserialize, Serialize};

/// Label shown instead of an amount when entry is free.
pub const FREE_LABEL: &str = "Gratuit";

/// Fraction of the base entrance price charged per visitor category.
pub fn multiplier(ticket_type: TicketType) -> f64 {
    match ticket_type {
        TicketType::Adult => 1.0,
        TicketType::Child => 0.5,
        TicketType::Student => 0.7,
        TicketType::Senior => 0.8,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Service fee added on top of the ticket subtotal (0.10 = 10%).
    pub service_fee_rate: f64,

    /// Suffix used when formatting amounts.
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee_rate: 0.10,
            currency_symbol: "€".to_string(),
        }
    }
}

/// Quoted total for a reservation before submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketQuote {
    pub unit_price: f64,
    pub ticket_type: TicketType,
    pub multiplier: f64,
    pub count: u32,
    pub subtotal: f64,
    pub service_fee: f64,
    pub grand_total: f64,
    pub is_free: bool,
    /// `"Gratuit"` for free places, otherwise the formatted grand total.
    pub label: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("Invalid base price: {0}")]
    InvalidPrice(f64),

    #[error("Ticket count must be at least 1")]
    InvalidCount,
}

pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// `subtotal = price * multiplier * count`, fee and grand total on top.
    pub fn quote(&self, price: f64, ticket_type: TicketType, count: u32) -> Result<TicketQuote, PricingError> {
        if !price.is_finite() || price < 0.0 {
            return Err(PricingError::InvalidPrice(price));
        }
        if count == 0 {
            return Err(PricingError::InvalidCount);
        }

        let multiplier = multiplier(ticket_type);
        let subtotal = price * multiplier * count as f64;
        let service_fee = subtotal * self.config.service_fee_rate;
        let grand_total = subtotal * (1.0 + self.config.service_fee_rate);
        let is_free = price == 0.0;

        Ok(TicketQuote {
            unit_price: price * multiplier,
            ticket_type,
            multiplier,
            count,
            subtotal,
            service_fee,
            grand_total,
            is_free,
            label: if is_free { FREE_LABEL.to_string() } else { self.format_amount(grand_total) },
        })
    }

    /// Display label for a base price on listing cards.
    pub fn price_label(&self, price: f64) -> String {
        if price == 0.0 {
            FREE_LABEL.to_string()
        } else {
            self.format_amount(price)
        }
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.config.currency_symbol)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
