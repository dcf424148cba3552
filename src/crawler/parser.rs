//! Field extraction from fetched documents
//!
//! The traversal engine only needs a handful of raw values from each page:
//! links from organisation and event pages, and biographical fields plus the
//! bout history from fighter profiles. `FieldExtractor` is that contract;
//! `SherdogExtractor` implements it for the Sherdog page layout.
//!
//! Hrefs are returned as written in the document. Resolving them against the
//! page URL and canonicalising fighter ids is the engine's job.

use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Links found on an organisation or event page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Every navigable `<a href>` in document order
    pub links: Vec<String>,

    /// Fighter profile hrefs from the fight card, deduplicated, in page order
    pub fighter_links: Vec<String>,
}

/// One finished bout row, as raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoutRow {
    pub opponent_href: String,
    pub result: String,
    pub method: String,
    pub round: String,
    pub time: String,
    pub date: String,
}

/// Fields read from a fighter profile
///
/// Bout rows that could not be read are kept as errors so the caller can
/// skip them individually without losing the rest of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FighterProfile {
    pub weight_class: Option<String>,
    pub birth_date: Option<String>,
    pub bouts: Vec<Result<BoutRow, ExtractionError>>,
}

/// Reads the raw fields the crawl needs out of a parsed document
pub trait FieldExtractor {
    /// Links from an organisation or event page
    fn extract_listing(&self, document: &Html) -> Listing;

    /// Biographical fields and bout history from a fighter profile
    ///
    /// Fails with page scope when the document is not a fighter profile.
    fn extract_fighter(&self, document: &Html) -> Result<FighterProfile, ExtractionError>;
}

/// Parses an HTML body into a document
pub fn parse_html(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extractor for Sherdog-style pages
///
/// # Layout
///
/// - Fight card: `tr > td.text*` cells holding exactly one `div > a[href]`
/// - Weight class: the single `h6 > strong`
/// - Birth date: the single `span[itemprop*=birthDate]`
/// - Bout history: `tr` rows with a `td > span.final*` result; cells 1..=5
///   hold opponent link, date span, method, round and time
#[derive(Debug, Clone, Copy, Default)]
pub struct SherdogExtractor;

impl SherdogExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for SherdogExtractor {
    fn extract_listing(&self, document: &Html) -> Listing {
        Listing {
            links: extract_links(document),
            fighter_links: extract_fight_card(document),
        }
    }

    fn extract_fighter(&self, document: &Html) -> Result<FighterProfile, ExtractionError> {
        let has_heading = Selector::parse("h1")
            .map(|s| document.select(&s).next().is_some())
            .unwrap_or(false);
        if !has_heading {
            return Err(ExtractionError::NotAFighterPage);
        }

        Ok(FighterProfile {
            weight_class: single_text(document, "h6 > strong"),
            birth_date: single_text(document, r#"span[itemprop*="birthDate"]"#),
            bouts: extract_bouts(document),
        })
    }
}

/// Extracts every href from `<a>` tags, skipping download links
fn extract_links(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|a| a.value().attr("download").is_none())
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Extracts the fighter links from an event's fight card
fn extract_fight_card(document: &Html) -> Vec<String> {
    let Ok(cell_selector) = Selector::parse(r#"tr > td[class*="text"]"#) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut fighters = Vec::new();

    for cell in document.select(&cell_selector) {
        let anchors: Vec<&str> = child_elements(cell, "div")
            .flat_map(|div| child_elements(div, "a"))
            .filter_map(|a| a.value().attr("href"))
            .collect();

        // Cells with several links are not a single fighter slot
        if let [href] = anchors.as_slice() {
            let href = href.trim().to_string();
            if !href.is_empty() && seen.insert(href.clone()) {
                fighters.push(href);
            }
        }
    }

    fighters
}

/// Extracts the finished bouts from a profile, in page order
fn extract_bouts(document: &Html) -> Vec<Result<BoutRow, ExtractionError>> {
    let Ok(row_selector) = Selector::parse("tr") else {
        return Vec::new();
    };

    document
        .select(&row_selector)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = child_elements(row, "td").collect();
            let result = final_result(&cells)?;
            Some(parse_bout(&cells, result))
        })
        .collect()
}

/// Returns the result text if the row carries a `final` result marker
fn final_result(cells: &[ElementRef]) -> Option<String> {
    cells
        .iter()
        .flat_map(|cell| child_elements(*cell, "span"))
        .find(|span| {
            span.value()
                .attr("class")
                .is_some_and(|class| class.contains("final"))
        })
        .map(|span| element_text(span))
}

fn parse_bout(cells: &[ElementRef], result: String) -> Result<BoutRow, ExtractionError> {
    if result.is_empty() {
        return Err(ExtractionError::MissingField { field: "result" });
    }

    let opponent_href = cells
        .get(1)
        .and_then(|cell| child_elements(*cell, "a").next())
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .ok_or(ExtractionError::MissingField { field: "opponent" })?;

    let date = cells
        .get(2)
        .and_then(|cell| child_elements(*cell, "span").next())
        .map(element_text)
        .filter(|date| !date.is_empty())
        .ok_or(ExtractionError::MissingField { field: "date" })?;

    let method = cell_own_text(cells, 3, "method")?;
    let round = cell_own_text(cells, 4, "round")?;
    let time = cell_own_text(cells, 5, "time")?;

    Ok(BoutRow {
        opponent_href,
        result,
        method,
        round,
        time,
        date,
    })
}

fn cell_own_text(
    cells: &[ElementRef],
    index: usize,
    field: &'static str,
) -> Result<String, ExtractionError> {
    cells
        .get(index)
        .map(|cell| own_text(*cell))
        .ok_or(ExtractionError::MissingField { field })
}

/// Text of the only element matching `css`; absent when zero or several match
fn single_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let mut matches = document.select(&selector);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(element_text(first)).filter(|text| !text.is_empty())
}

/// Direct element children with the given tag name
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// All descendant text, trimmed
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The first non-blank text node directly under the element, trimmed
///
/// Cells such as the method carry a sub-line (`<br><span>referee</span>`)
/// that is not part of the value.
fn own_text(element: ElementRef) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .unwrap_or("")
        .to_string()
}
