use std::collections::HashMap;

use pretty_assertions::assert_eq;
use wagemap_core::ExchangeRates;

fn table(pairs: &[(&str, f64)]) -> ExchangeRates {
    ExchangeRates {
        base: "USD".to_string(),
        rates: pairs
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect(),
        time_last_updated: None,
    }
}

#[test]
fn table_hit_divides_by_rate_and_rounds() {
    let rates = table(&[("AUD", 1.5)]);
    assert_eq!(rates.to_usd(10_000.0, "AUD"), Some(6_666.67));
    assert_eq!(rates.to_usd(1.0, "AUD"), Some(0.67));
}

#[test]
fn usd_passes_through_unchanged() {
    let rates = table(&[("AUD", 1.5)]);
    assert_eq!(rates.to_usd(2_500.0, "USD"), Some(2_500.0));
    assert_eq!(rates.to_usd(1_234.567, "USD"), Some(1_234.567));
}

#[test]
fn unknown_currency_is_a_miss() {
    let rates = table(&[("AUD", 1.5)]);
    assert_eq!(rates.to_usd(100.0, "XYZ"), None);
    assert!(!rates.contains("XYZ"));
    assert!(rates.contains("AUD"));
    assert!(rates.contains("USD"));
}

#[test]
fn degenerate_rates_are_treated_as_misses() {
    let rates = table(&[("BAD", 0.0), ("NEG", -2.0)]);
    assert_eq!(rates.to_usd(100.0, "BAD"), None);
    assert_eq!(rates.to_usd(100.0, "NEG"), None);
}

#[test]
fn snapshot_json_deserializes() {
    let raw = r#"{
        "base": "USD",
        "date": "2024-01-02",
        "time_last_updated": 1704153601,
        "rates": { "USD": 1.0, "AUD": 1.5, "EUR": 0.92 }
    }"#;
    let rates: ExchangeRates = serde_json::from_str(raw).unwrap();
    assert_eq!(rates.base, "USD");
    assert_eq!(rates.time_last_updated, Some(1_704_153_601));
    assert_eq!(rates.rates.len(), 3);
    assert_eq!(rates.to_usd(92.0, "EUR"), Some(100.0));
}

#[test]
fn snapshot_without_base_defaults_to_usd() {
    let rates: ExchangeRates = serde_json::from_str(r#"{ "rates": {} }"#).unwrap();
    assert_eq!(rates.base, "USD");
    let mut with_rates = rates;
    with_rates.rates = HashMap::from([("CAD".to_string(), 1.25)]);
    assert_eq!(with_rates.to_usd(125.0, "CAD"), Some(100.0));
}
