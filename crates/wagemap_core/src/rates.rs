use std::collections::HashMap;

use serde::Deserialize;

use crate::normalize::round_cents;

/// Point-in-time snapshot of exchange rates against the base currency,
/// matching the shape of the public rate API's JSON response.
///
/// Loaded once per run and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeRates {
    #[serde(default = "usd")]
    pub base: String,
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub time_last_updated: Option<i64>,
}

fn usd() -> String {
    "USD".to_string()
}

impl ExchangeRates {
    /// Convert an amount to USD via the table.
    ///
    /// USD passes through untouched. A table hit divides by the rate and
    /// rounds to cents. A miss (or a nonsensical rate) returns `None` and is
    /// left to the caller's fallback source.
    pub fn to_usd(&self, amount: f64, currency: &str) -> Option<f64> {
        if currency == self.base {
            return Some(amount);
        }
        let rate = self.rates.get(currency)?;
        if !rate.is_finite() || *rate <= 0.0 {
            return None;
        }
        Some(round_cents(amount / rate))
    }

    pub fn contains(&self, currency: &str) -> bool {
        currency == self.base || self.rates.contains_key(currency)
    }
}
