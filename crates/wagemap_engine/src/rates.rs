use std::io::ErrorKind;
use std::path::PathBuf;

use log::{info, warn};
use scraper::{Html, Selector};
use thiserror::Error;
use wagemap_core::ExchangeRates;

use crate::fetch::{FetchError, PageFetcher};
use crate::persist::{write_atomic, PersistError};

/// Public rate API serving the USD-based snapshot.
pub const RATE_SNAPSHOT_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Converter site used when a currency is absent from the snapshot.
pub const CONVERTER_URL: &str = "https://www.xe.com/currencyconverter/convert/";

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate snapshot fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("rate snapshot is not valid JSON: {0}")]
    BadSnapshot(#[from] serde_json::Error),
    #[error("rate cache write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Cache-or-fetch provider for the exchange-rate snapshot.
///
/// The snapshot is read from the cache file when present; otherwise it is
/// fetched from the rate API and persisted for reuse across runs. A corrupt
/// cache is discarded and refetched. With neither a cache nor a reachable
/// API the run cannot convert anything, so the error is surfaced.
pub struct RateSnapshotProvider<'a> {
    fetcher: &'a dyn PageFetcher,
    snapshot_url: String,
    cache_path: PathBuf,
}

impl<'a> RateSnapshotProvider<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            snapshot_url: RATE_SNAPSHOT_URL.to_string(),
            cache_path: cache_path.into(),
        }
    }

    pub fn with_snapshot_url(mut self, url: impl Into<String>) -> Self {
        self.snapshot_url = url.into();
        self
    }

    pub async fn load_or_fetch(&self) -> Result<ExchangeRates, RateError> {
        match std::fs::read_to_string(&self.cache_path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(rates) => return Ok(rates),
                Err(err) => warn!(
                    "discarding corrupt rate cache {}: {err}",
                    self.cache_path.display()
                ),
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("rate cache not found, fetching snapshot");
            }
            Err(err) => warn!(
                "rate cache {} unreadable: {err}",
                self.cache_path.display()
            ),
        }
        self.refresh().await
    }

    async fn refresh(&self) -> Result<ExchangeRates, RateError> {
        let body = self.fetcher.fetch(&self.snapshot_url).await?;
        let rates: ExchangeRates = serde_json::from_str(&body)?;
        write_atomic(&self.cache_path, body.as_bytes())?;
        info!("rate snapshot cached at {}", self.cache_path.display());
        Ok(rates)
    }
}

/// Secondary source for currencies the snapshot does not carry: scrape the
/// converter site for the amount/currency pair. The displayed value is
/// already USD-denominated.
///
/// Failures here are logged and swallowed; one missing rate must not end
/// the country, let alone the run.
pub struct ConverterSiteFallback<'a> {
    fetcher: &'a dyn PageFetcher,
    base_url: String,
}

impl<'a> ConverterSiteFallback<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            fetcher,
            base_url: CONVERTER_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn usd_value(&self, amount: f64, currency: &str) -> Option<f64> {
        let url = format!(
            "{}?Amount={amount}&From={currency}&To=USD",
            self.base_url
        );
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(err) => {
                warn!("fallback rate fetch for {currency} failed: {err}");
                return None;
            }
        };
        let value = parse_converter_result(&html);
        if value.is_none() {
            warn!("no rate for {currency} on the converter page");
        }
        value
    }
}

/// The converter renders its result in a styled paragraph whose class name
/// carries a generated suffix; match on the stable prefix. The leading
/// whitespace-delimited token is the amount, commas included.
pub fn parse_converter_result(html: &str) -> Option<f64> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(r#"p[class*="result__BigRate"]"#).expect("static selector");
    let paragraph = document.select(&selector).next()?;
    let text = paragraph.text().collect::<String>();
    let token = text.split_whitespace().next()?;
    token.replace(',', "").parse().ok()
}

/// Table-first conversion with a single fallback lookup per figure.
pub struct CurrencyConverter<'a> {
    rates: &'a ExchangeRates,
    fallback: ConverterSiteFallback<'a>,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(rates: &'a ExchangeRates, fallback: ConverterSiteFallback<'a>) -> Self {
        Self { rates, fallback }
    }

    pub async fn to_usd(&self, amount: f64, currency: &str) -> Option<f64> {
        if let Some(usd) = self.rates.to_usd(amount, currency) {
            return Some(usd);
        }
        self.fallback.usd_value(amount, currency).await
    }
}
