// Link extraction for forum listing pages

use crate::error::{Result, ScanError};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const CLASSED_ANCHORS: &str = "a[class]";
const ACCESSKEY_ANCHORS: &str = "a[accesskey]";

/// Links pulled out of one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub comment_links: Vec<String>,
    pub next_page: Option<String>,
}

/// Prefixes `href` with the base URL exactly as written, without resolving it.
pub fn join_base(base_url: &str, href: &str) -> String {
    format!("{}{}", base_url, href)
}

/// Parses a listing page and extracts both kinds of link.
///
/// The parsed document is dropped before returning, so callers can hold the
/// result across `.await` points.
pub fn parse_listing(
    html: &str,
    page_url: &str,
    base_url: &str,
    comment_class: &str,
    next_accesskey: &str,
) -> Result<Listing> {
    let document = Html::parse_document(html);

    let comment_links = extract_comment_links(&document, page_url, base_url, comment_class)?;
    let next_page = find_next_link(&document, page_url, base_url, next_accesskey)?;

    debug!(
        "{}: {} comment link(s), next page: {:?}",
        page_url,
        comment_links.len(),
        next_page
    );

    Ok(Listing {
        comment_links,
        next_page,
    })
}

/// Every anchor whose class list contains `comment_class`, in document order.
pub fn extract_comment_links(
    document: &Html,
    page_url: &str,
    base_url: &str,
    comment_class: &str,
) -> Result<Vec<String>> {
    let selector = parse_selector(CLASSED_ANCHORS)?;

    document
        .select(&selector)
        .filter(|element| element.value().classes().any(|class| class == comment_class))
        .map(|element| {
            let href = required_href(element, &format!("a.{}", comment_class), page_url)?;
            Ok(join_base(base_url, href))
        })
        .collect()
}

/// The first anchor whose `accesskey` equals `next_accesskey`, if any.
pub fn find_next_link(
    document: &Html,
    page_url: &str,
    base_url: &str,
    next_accesskey: &str,
) -> Result<Option<String>> {
    let selector = parse_selector(ACCESSKEY_ANCHORS)?;

    let Some(element) = document
        .select(&selector)
        .find(|element| element.value().attr("accesskey") == Some(next_accesskey))
    else {
        return Ok(None);
    };

    let href = required_href(
        element,
        &format!("a[accesskey=\"{}\"]", next_accesskey),
        page_url,
    )?;
    Ok(Some(join_base(base_url, href)))
}

fn required_href<'a>(element: ElementRef<'a>, selector: &str, page_url: &str) -> Result<&'a str> {
    element
        .value()
        .attr("href")
        .ok_or_else(|| ScanError::MissingAttribute {
            selector: selector.to_string(),
            attribute: "href".to_string(),
            page: page_url.to_string(),
        })
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("{}: {:?}", css, e)))
}
