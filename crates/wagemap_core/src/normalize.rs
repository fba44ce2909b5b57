use crate::WageSpan;

/// Convert a yearly amount to its monthly basis, truncating to whole units
/// the way the source site reports them.
pub fn yearly_to_monthly(yearly: f64) -> f64 {
    (yearly / 12.0).trunc()
}

/// Bring a figure onto the monthly basis. Monthly and unclassified figures
/// pass through unchanged.
pub fn to_monthly(value: f64, span: WageSpan) -> f64 {
    match span {
        WageSpan::Yearly => yearly_to_monthly(value),
        WageSpan::Monthly | WageSpan::Unknown => value,
    }
}

/// Strip everything but digits and the decimal point from a displayed
/// amount ("12,345.67 AUD" and friends), then parse it.
pub fn clean_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
