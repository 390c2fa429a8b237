//! Parser for the bin details panel of the results page.
//!
//! The panel is a loosely structured table. Its flattened text reads: the address
//! line, optional column headers, then four cells per bin: name, collection day,
//! frequency, and next collection date (e.g. `Mon Sep  1 2025`).

use std::collections::HashMap;
use std::sync::LazyLock;

use binday_core::BinType;
use chrono::{NaiveDate, Weekday};
use scraper::{ElementRef, Html, Selector};

use crate::controls::RESULTS_PANEL_ID;
use crate::form::selector;

static RESULTS_PANEL: LazyLock<Selector> =
    LazyLock::new(|| selector(&format!("#{RESULTS_PANEL_ID}")));

const DATE_FORMAT: &str = "%b %d %Y";
const PREVIEW_CHARS: usize = 1000;
const WINDOW: usize = 4;
const HEADER_LABELS: [&str; 4] = ["type of bin", "day(s)", "how often?", "next collection"];
const BIN_KEYWORDS: [&str; 5] = ["bin", "general", "recycling", "compost", "brown"];
const QUALIFIERS: [&str; 2] = ["bin", "waste"];

/// Address and per-type next collection dates read from the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BinDetails {
    pub(crate) address: String,
    pub(crate) entries: HashMap<BinType, NaiveDate>,
}

pub(crate) fn find_panel(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&RESULTS_PANEL).next()
}

pub(crate) fn parse_panel(panel: ElementRef<'_>) -> BinDetails {
    parse_lines(&panel_lines(panel))
}

/// Non-blank text nodes of the panel, trimmed.
pub(crate) fn panel_lines(panel: ElementRef<'_>) -> Vec<&str> {
    panel
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Leading text of a page, used to show what came back instead of the panel.
pub(crate) fn page_preview(document: &Html) -> String {
    let text = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    text.chars().take(PREVIEW_CHARS).collect()
}

fn parse_lines(lines: &[&str]) -> BinDetails {
    let address = lines
        .first()
        .and_then(|line| line.split(',').next())
        .map(title_case)
        .unwrap_or_default();

    let cells: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| !HEADER_LABELS.contains(&line.to_lowercase().as_str()))
        .collect();

    let mut entries = HashMap::new();
    let mut index = 0;
    while let Some(window) = cells.get(index..index + WINDOW) {
        if let &[name, _day, _frequency, date_text] = window
            && names_a_bin(name)
            && let Some(date) = parse_collection_date(date_text)
        {
            entries.insert(normalize_bin_name(name), date);
            index += WINDOW;
        } else {
            index += 1;
        }
    }

    BinDetails { address, entries }
}

fn names_a_bin(name: &str) -> bool {
    let name = name.to_lowercase();
    BIN_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

// The portal pads single-digit days with an extra space. The leading weekday must
// name a day but is not checked against the date.
fn parse_collection_date(text: &str) -> Option<NaiveDate> {
    let mut tokens = text.split_whitespace();
    tokens.next()?.parse::<Weekday>().ok()?;
    let rest = tokens.collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&rest, DATE_FORMAT).ok()
}

pub(crate) fn normalize_bin_name(raw: &str) -> BinType {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    while words.len() > 1
        && words
            .last()
            .is_some_and(|word| QUALIFIERS.contains(&word.to_lowercase().as_str()))
    {
        words.pop();
    }
    let residue = words.join(" ");
    let lower = residue.to_lowercase();

    if lower.starts_with("general") {
        BinType::General
    } else if lower.starts_with("recycling") {
        BinType::Recycling
    } else if lower.starts_with("compost") || lower.starts_with("brown") {
        BinType::Compost
    } else {
        BinType::Other(title_case(&residue))
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
