use std::fmt;

/// Time basis a salary page reports its figures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WageSpan {
    Monthly,
    Yearly,
    Unknown,
}

impl WageSpan {
    pub fn as_str(self) -> &'static str {
        match self {
            WageSpan::Monthly => "Monthly",
            WageSpan::Yearly => "Yearly",
            WageSpan::Unknown => "N/A",
        }
    }
}

impl fmt::Display for WageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry from the country index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryLink {
    pub name: String,
    pub url: String,
}

/// Figures as parsed from one country's salary page, still in the page's
/// native currency.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryFigures {
    pub wage_span: WageSpan,
    pub average: f64,
    pub lowest: f64,
    pub highest: f64,
    pub median: f64,
    pub currency: String,
}

/// One output row: monthly-basis figures, USD where conversion succeeded.
///
/// The median is the only figure that can be individually absent; the three
/// span figures either all carry USD or all keep the native amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub country: String,
    pub continent: Option<String>,
    pub wage_span: WageSpan,
    pub average: f64,
    pub lowest: f64,
    pub highest: f64,
    pub median: Option<f64>,
}
