use log::warn;
use thiserror::Error;
use wagemap_core::{to_monthly, CountryLink, SalaryFigures, SalaryRecord, WageSpan};

use crate::continent::ContinentResolver;
use crate::fetch::{FetchError, PageFetcher};
use crate::parse::{parse_salary_page, ParseError};
use crate::rates::CurrencyConverter;

/// Observable pipeline milestones, consumed by the driver for its progress
/// line. Not a correctness contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    CountryProcessed {
        index: usize,
        total: usize,
        name: String,
    },
    CountrySkipped {
        index: usize,
        total: usize,
        name: String,
        reason: String,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Sink for callers that do not track progress.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: PipelineEvent) {}
}

/// Why one country produced no row. Contained here; never ends the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CountryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Sequences fetch → parse → normalize → convert → resolve for each country
/// and accumulates the output rows in input order.
pub struct Pipeline<'a> {
    fetcher: &'a dyn PageFetcher,
    converter: CurrencyConverter<'a>,
    continents: &'a dyn ContinentResolver,
    progress: &'a dyn ProgressSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        converter: CurrencyConverter<'a>,
        continents: &'a dyn ContinentResolver,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            fetcher,
            converter,
            continents,
            progress,
        }
    }

    /// Process every country in harvest order, one at a time. Failures are
    /// contained per country; the loop never aborts early.
    pub async fn run(&self, links: &[CountryLink]) -> Vec<SalaryRecord> {
        let total = links.len();
        let mut records = Vec::with_capacity(total);
        for (idx, link) in links.iter().enumerate() {
            let index = idx + 1;
            match self.process_country(link).await {
                Ok(record) => {
                    records.push(record);
                    self.progress.emit(PipelineEvent::CountryProcessed {
                        index,
                        total,
                        name: link.name.clone(),
                    });
                }
                Err(err) => {
                    warn!("skipping {}: {err}", link.name);
                    self.progress.emit(PipelineEvent::CountrySkipped {
                        index,
                        total,
                        name: link.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        records
    }

    async fn process_country(&self, link: &CountryLink) -> Result<SalaryRecord, CountryError> {
        let html = self.fetcher.fetch(&link.url).await?;
        let figures = parse_salary_page(&html)?;
        let figures = monthly_figures(figures);
        let (average, lowest, highest, median) = self.convert_figures(&figures).await;

        let continent = match self.continents.resolve(&link.name) {
            Ok(region) => Some(region),
            Err(err) => {
                warn!("continent lookup failed: {err}");
                None
            }
        };

        Ok(SalaryRecord {
            country: link.name.clone(),
            continent,
            // Figures are on the monthly basis from here on, whatever the
            // page reported.
            wage_span: WageSpan::Monthly,
            average,
            lowest,
            highest,
            median,
        })
    }

    /// Degrade policy: the three span figures convert as a unit. When any of
    /// them cannot be priced in USD the whole row keeps the native amounts,
    /// so a single row never mixes currencies. The median converts
    /// independently and is dropped rather than fabricated.
    async fn convert_figures(&self, figures: &SalaryFigures) -> (f64, f64, f64, Option<f64>) {
        if figures.currency == "USD" {
            return (
                figures.average,
                figures.lowest,
                figures.highest,
                Some(figures.median),
            );
        }

        let currency = figures.currency.as_str();
        let average = self.converter.to_usd(figures.average, currency).await;
        let lowest = self.converter.to_usd(figures.lowest, currency).await;
        let highest = self.converter.to_usd(figures.highest, currency).await;
        let median = self.converter.to_usd(figures.median, currency).await;

        match (average, lowest, highest) {
            (Some(average), Some(lowest), Some(highest)) => (average, lowest, highest, median),
            _ => {
                warn!("conversion from {currency} failed, keeping native amounts");
                (
                    figures.average,
                    figures.lowest,
                    figures.highest,
                    Some(figures.median),
                )
            }
        }
    }
}

fn monthly_figures(figures: SalaryFigures) -> SalaryFigures {
    let span = figures.wage_span;
    SalaryFigures {
        average: to_monthly(figures.average, span),
        lowest: to_monthly(figures.lowest, span),
        highest: to_monthly(figures.highest, span),
        median: to_monthly(figures.median, span),
        ..figures
    }
}
