//! Salary-site extraction pipeline: fetch, parse, normalize, export.
mod continent;
mod export;
mod fetch;
mod index;
mod parse;
mod persist;
mod pipeline;
mod rates;

pub use continent::{ContinentError, ContinentResolver, EmbeddedContinentDb};
pub use export::{write_csv, ExportError, ExportSummary, CSV_HEADER};
pub use fetch::{FetchError, FetchSettings, PageFetcher, ReqwestPageFetcher};
pub use index::{extract_country_links, harvest_country_links, BROWSE_INDEX_URL};
pub use parse::{parse_salary_page, ParseError};
pub use persist::{write_atomic, PersistError};
pub use pipeline::{
    CountryError, NullProgressSink, Pipeline, PipelineEvent, ProgressSink,
};
pub use rates::{
    parse_converter_result, ConverterSiteFallback, CurrencyConverter, RateError,
    RateSnapshotProvider, CONVERTER_URL, RATE_SNAPSHOT_URL,
};
