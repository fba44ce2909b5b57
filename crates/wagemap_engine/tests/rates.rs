use std::collections::HashMap;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wagemap_core::ExchangeRates;
use wagemap_engine::{
    parse_converter_result, ConverterSiteFallback, CurrencyConverter, FetchSettings,
    RateSnapshotProvider, ReqwestPageFetcher,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SNAPSHOT_JSON: &str = r#"{
    "base": "USD",
    "date": "2024-01-02",
    "time_last_updated": 1704153601,
    "rates": { "USD": 1.0, "AUD": 1.5, "EUR": 0.92 }
}"#;

const CONVERTER_PAGE: &str = r#"<html><body>
  <div class="converter">
    <p class="result__BigRate-sc-1bsijpp-1 iGrAod">1,234.56 US Dollars</p>
  </div>
</body></html>"#;

fn fetcher() -> ReqwestPageFetcher {
    ReqwestPageFetcher::new(FetchSettings::default()).unwrap()
}

#[tokio::test]
async fn missing_cache_fetches_and_persists_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rates"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SNAPSHOT_JSON, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let cache = temp.path().join("exchange_rate_data.json");
    let fetcher = fetcher();
    let provider = RateSnapshotProvider::new(&fetcher, cache.clone())
        .with_snapshot_url(format!("{}/rates", server.uri()));

    let rates = provider.load_or_fetch().await.expect("snapshot fetched");
    assert_eq!(rates.to_usd(150.0, "AUD"), Some(100.0));
    assert_eq!(fs::read_to_string(&cache).unwrap(), SNAPSHOT_JSON);

    // Second load is served from the cache file; expect(1) above verifies
    // the API was hit only once.
    let cached = provider.load_or_fetch().await.expect("cache hit");
    assert_eq!(cached, rates);
}

#[tokio::test]
async fn corrupt_cache_is_discarded_and_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rates"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SNAPSHOT_JSON, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let cache = temp.path().join("exchange_rate_data.json");
    fs::write(&cache, "{ not json").unwrap();

    let fetcher = fetcher();
    let provider = RateSnapshotProvider::new(&fetcher, cache.clone())
        .with_snapshot_url(format!("{}/rates", server.uri()));

    let rates = provider.load_or_fetch().await.expect("refetched");
    assert!(rates.contains("EUR"));
    assert_eq!(fs::read_to_string(&cache).unwrap(), SNAPSHOT_JSON);
}

#[tokio::test]
async fn snapshot_fetch_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rates"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let fetcher = fetcher();
    let provider = RateSnapshotProvider::new(&fetcher, temp.path().join("cache.json"))
        .with_snapshot_url(format!("{}/rates", server.uri()));

    assert!(provider.load_or_fetch().await.is_err());
}

#[test]
fn converter_page_yields_the_leading_token() {
    assert_eq!(parse_converter_result(CONVERTER_PAGE), Some(1_234.56));
}

#[test]
fn converter_page_without_result_yields_nothing() {
    assert_eq!(parse_converter_result("<html><p>try again</p></html>"), None);
    assert_eq!(
        parse_converter_result(r#"<p class="result__BigRate-sc-1bsijpp-1">soon</p>"#),
        None
    );
}

#[tokio::test]
async fn fallback_scrapes_the_converter_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CONVERTER_PAGE, "text/html"))
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let fallback = ConverterSiteFallback::new(&fetcher)
        .with_base_url(format!("{}/convert", server.uri()));
    assert_eq!(fallback.usd_value(10_000.0, "VES").await, Some(1_234.56));
}

#[tokio::test]
async fn fallback_failure_yields_none_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let fallback = ConverterSiteFallback::new(&fetcher)
        .with_base_url(format!("{}/convert", server.uri()));
    assert_eq!(fallback.usd_value(10_000.0, "VES").await, None);
}

#[tokio::test]
async fn table_hits_never_reach_the_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CONVERTER_PAGE, "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let rates = ExchangeRates {
        base: "USD".to_string(),
        rates: HashMap::from([("AUD".to_string(), 1.5)]),
        time_last_updated: None,
    };
    let fetcher = fetcher();
    let fallback = ConverterSiteFallback::new(&fetcher)
        .with_base_url(format!("{}/convert", server.uri()));
    let converter = CurrencyConverter::new(&rates, fallback);

    assert_eq!(converter.to_usd(10_000.0, "AUD").await, Some(6_666.67));
    assert_eq!(converter.to_usd(2_500.0, "USD").await, Some(2_500.0));
}

#[tokio::test]
async fn table_miss_falls_back_to_the_converter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CONVERTER_PAGE, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let rates = ExchangeRates {
        base: "USD".to_string(),
        rates: HashMap::new(),
        time_last_updated: None,
    };
    let fetcher = fetcher();
    let fallback = ConverterSiteFallback::new(&fetcher)
        .with_base_url(format!("{}/convert", server.uri()));
    let converter = CurrencyConverter::new(&rates, fallback);

    assert_eq!(converter.to_usd(10_000.0, "VES").await, Some(1_234.56));
}
