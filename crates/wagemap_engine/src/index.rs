use scraper::{Html, Selector};
use url::Url;
use wagemap_core::CountryLink;

use crate::fetch::{FetchError, PageFetcher};

/// Listing page carrying the per-country links.
pub const BROWSE_INDEX_URL: &str = "https://www.salaryexplorer.com/#browsesalaries";

/// Fetch the index page and return its country links in document order.
///
/// A failure here is fatal for the run: without the index there is no work.
pub async fn harvest_country_links(
    fetcher: &dyn PageFetcher,
    index_url: &str,
) -> Result<Vec<CountryLink>, FetchError> {
    let html = fetcher.fetch(index_url).await?;
    Ok(extract_country_links(&html, Some(index_url)))
}

/// Pull (name, url) pairs out of the index page.
///
/// Country entries are anchors wrapped in `<b>` elements; the anchor text is
/// the display name and the href points at the country's salary page.
/// No deduplication; document order is preserved.
pub fn extract_country_links(html: &str, base_url: Option<&str>) -> Vec<CountryLink> {
    let document = Html::parse_document(html);
    let bold = sel("b");
    let anchor = sel("a");
    let base = base_url.and_then(|raw| Url::parse(raw).ok());

    let mut links = Vec::new();
    for element in document.select(&bold) {
        let Some(a) = element.select(&anchor).next() else {
            continue;
        };
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(href, base.as_ref()) else {
            continue;
        };
        let name = a.text().collect::<String>().trim().to_string();
        links.push(CountryLink { name, url });
    }
    links
}

fn resolve_href(href: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(trimmed).ok()).map(Into::into)
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}
