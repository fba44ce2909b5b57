//! Pure domain types and normalization rules for the salary pipeline.
//!
//! Nothing in this crate performs I/O; everything here can be exercised
//! directly from tests with plain values.
mod normalize;
mod rates;
mod types;

pub use normalize::{clean_amount, round_cents, to_monthly, yearly_to_monthly};
pub use rates::ExchangeRates;
pub use types::{CountryLink, SalaryFigures, SalaryRecord, WageSpan};
