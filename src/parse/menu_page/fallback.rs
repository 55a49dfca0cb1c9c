use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use super::snapshot::SnapshotBuilder;
use crate::parse::day_label::looks_like_day_heading;
use crate::parse::normalize::element_text;
use crate::static_selector;

/// How many preceding sibling / ancestor elements to inspect before giving
/// up on finding a day heading for a candidate row.
const MAX_BACKWARD_HOPS: usize = 8;
/// Day headings are short; anything longer is a paragraph, not a heading.
const MAX_HEADING_CHARS: usize = 64;
/// Upper bound on the flattened text of a leaf element that could still be
/// a meal fragment.
const MAX_FRAGMENT_CHARS: usize = 80;

fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(oběd|lunch)\b").expect("regex should be valid"))
}

fn meal_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b((?:oběd|lunch)\s*\d*)").expect("regex should be valid"))
}

fn contains_meal_keyword(text: &str) -> bool {
    keyword_regex().is_match(text)
}

/// Walks backward from `start` through preceding siblings, climbing to the
/// parent when a level is exhausted, and returns the first short fragment
/// that looks like a day heading. Bounded so a drifted page cannot send the
/// search across the whole document.
fn day_label_near(start: ElementRef) -> Option<String> {
    let mut hops = 0usize;
    let mut current = *start;
    loop {
        let mut sibling = current.prev_sibling();
        while let Some(node) = sibling {
            if let Some(element) = ElementRef::wrap(node) {
                hops += 1;
                if hops > MAX_BACKWARD_HOPS {
                    return None;
                }
                let text = element_text(element);
                if !text.is_empty()
                    && text.chars().count() <= MAX_HEADING_CHARS
                    && looks_like_day_heading(&text)
                {
                    return Some(text);
                }
            }
            sibling = node.prev_sibling();
        }
        let parent = current.parent()?;
        if ElementRef::wrap(parent).is_some() {
            hops += 1;
            if hops > MAX_BACKWARD_HOPS {
                return None;
            }
        }
        current = parent;
    }
}

/// Second strategy: the day containers are gone but the menu still lives in
/// table rows. A row is a meal candidate when its text mentions a meal
/// keyword; the day heading is recovered from nearby preceding markup.
pub(super) fn tabular_scan(document: &Html) -> SnapshotBuilder {
    static_selector!(ROW_SELECTOR <- "tr");
    static_selector!(CELL_SELECTOR <- "td, th");

    let mut out = SnapshotBuilder::new();
    for row in document.select(&ROW_SELECTOR) {
        if !contains_meal_keyword(&element_text(row)) {
            continue;
        }
        let Some(label) = day_label_near(row) else {
            continue;
        };
        let mut cells = row.select(&CELL_SELECTOR);
        let Some(first_cell) = cells.next() else {
            continue;
        };
        let meal_type = element_text(first_cell);
        // the meal description is the longest remaining cell
        let name = cells
            .map(element_text)
            .filter(|text| !text.is_empty() && *text != meal_type)
            .max_by_key(|text| text.chars().count());
        if let Some(name) = name {
            out.push(&label, &meal_type, &name);
        }
    }
    out
}

/// Last-resort strategy: scan every leaf element for a short fragment
/// mentioning a meal keyword and reconstruct type, name and day from its
/// surroundings. Allowed to under-extract; it only exists so a drifted page
/// still yields something.
pub(super) fn generic_scan(document: &Html) -> SnapshotBuilder {
    static_selector!(ANY_SELECTOR <- "*");

    let mut out = SnapshotBuilder::new();
    for element in document.select(&ANY_SELECTOR) {
        if element.children().any(|c| c.value().is_element()) {
            continue;
        }
        let text = element_text(element);
        if text.is_empty()
            || text.chars().count() > MAX_FRAGMENT_CHARS
            || !contains_meal_keyword(&text)
        {
            continue;
        }
        let Some(label) = day_label_near(element) else {
            continue;
        };
        let Some((meal_type, mut name)) = split_meal_fragment(&text) else {
            continue;
        };
        if name.is_empty() {
            name = following_sibling_text(element).unwrap_or_default();
        }
        out.push(&label, &meal_type, &name);
    }
    out
}

/// Splits "Oběd 1 Guláš s rýží" into the type and whatever follows it.
fn split_meal_fragment(text: &str) -> Option<(String, String)> {
    let found = meal_type_regex().find(text)?;
    let meal_type = found.as_str().trim().to_owned();
    let name = text[found.end()..]
        .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == '–')
        .to_owned();
    Some((meal_type, name))
}

fn following_sibling_text(start: ElementRef) -> Option<String> {
    let mut sibling = start.next_sibling();
    while let Some(node) = sibling {
        if let Some(element) = ElementRef::wrap(node) {
            let text = element_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
        sibling = node.next_sibling();
    }
    None
}
