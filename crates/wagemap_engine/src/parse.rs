use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use wagemap_core::{clean_amount, SalaryFigures, WageSpan};

const MONTHLY_MARKER: &str = "Average Monthly Salary";
const YEARLY_MARKER: &str = "Average Yearly Salary";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("salary block missing from page")]
    MissingSalaryBlock,
    #[error("{0} figure missing from salary block")]
    MissingFigure(&'static str),
    #[error("median table cell missing from page")]
    MissingMedianCell,
    #[error("currency marker missing after average figure")]
    MissingCurrency,
    #[error("unparseable amount: {0:?}")]
    BadNumber(String),
}

/// Extract the raw figures from one country's salary page.
///
/// The page layout is taken as found: three bolded amounts inside the
/// salary block, the currency code in the text node after the `<br>` that
/// follows the average amount, and the median in the second table cell of
/// the page. Every structural assumption is guarded with its own error so a
/// malformed page skips one country instead of ending the run.
pub fn parse_salary_page(html: &str) -> Result<SalaryFigures, ParseError> {
    let document = Html::parse_document(html);

    let wage_span = classify_wage_span(&document);

    let block = document
        .select(&sel("div.salaryblock"))
        .next()
        .ok_or(ParseError::MissingSalaryBlock)?;
    let average = figure(block, "average")?;
    let lowest = figure(block, "lowest")?;
    let highest = figure(block, "highest")?;
    let currency = currency_after_average(block)?;

    // The median has no semantic marker anywhere on the page; it sits in
    // the second table cell, wherever that table happens to be.
    let median_text = document
        .select(&sel("td"))
        .nth(1)
        .map(|cell| cell.text().collect::<String>())
        .ok_or(ParseError::MissingMedianCell)?;
    let median = amount(&median_text)?;

    Ok(SalaryFigures {
        wage_span,
        average,
        lowest,
        highest,
        median,
        currency,
    })
}

fn classify_wage_span(document: &Html) -> WageSpan {
    let text: String = document.root_element().text().collect();
    if text.contains(MONTHLY_MARKER) {
        WageSpan::Monthly
    } else if text.contains(YEARLY_MARKER) {
        WageSpan::Yearly
    } else {
        WageSpan::Unknown
    }
}

fn figure(block: ElementRef, which: &'static str) -> Result<f64, ParseError> {
    let selector = Selector::parse(&format!("span.{which} b")).expect("valid selector");
    let bold = block
        .select(&selector)
        .next()
        .ok_or(ParseError::MissingFigure(which))?;
    amount(&bold.text().collect::<String>())
}

/// The currency code is the first non-empty text node after a `<br>` that
/// follows the bolded average amount.
fn currency_after_average(block: ElementRef) -> Result<String, ParseError> {
    let average = block
        .select(&sel("span.average"))
        .next()
        .ok_or(ParseError::MissingFigure("average"))?;
    let bold = average
        .select(&sel("b"))
        .next()
        .ok_or(ParseError::MissingFigure("average"))?;
    currency_from_siblings(bold.next_siblings()).ok_or(ParseError::MissingCurrency)
}

fn currency_from_siblings<'a>(
    siblings: impl Iterator<Item = NodeRef<'a, Node>>,
) -> Option<String> {
    let mut past_break = false;
    for node in siblings {
        match node.value() {
            Node::Element(element) if element.name() == "br" => past_break = true,
            Node::Text(text) if past_break => {
                let code = text.trim();
                if !code.is_empty() {
                    return Some(code.to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn amount(text: &str) -> Result<f64, ParseError> {
    clean_amount(text).ok_or_else(|| ParseError::BadNumber(text.trim().to_string()))
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}
