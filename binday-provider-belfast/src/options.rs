//! Locating selection controls and choosing one of their options.
//!
//! The portal renames and reshuffles its list controls from time to time, so each list
//! is looked up through a short chain of [`OptionSource`] strategies, most specific
//! first. Choosing an option is kept separate from finding the control: the policies
//! below only see the scraped `(text, value)` pairs.

use std::sync::LazyLock;

use binday_core::LookupTrace;
use scraper::{ElementRef, Html, Selector};

use crate::form::{element_text, selector};

static SELECT: LazyLock<Selector> = LazyLock::new(|| selector("select"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));

const FLAT_MARKERS: [&str; 3] = ["FLAT", "APT", "APPT"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectOption {
    pub(crate) text: String,
    pub(crate) value: Option<String>,
}

impl SelectOption {
    pub(crate) fn new(text: &str, value: Option<&str>) -> Self {
        Self {
            text: text.to_owned(),
            value: value.map(str::to_owned),
        }
    }

    /// The value attribute, when it is non-empty.
    pub(crate) fn explicit_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|value| !value.is_empty())
    }

    /// The trimmed value attribute, falling back to the visible text.
    pub(crate) fn value_or_text(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or_else(|| Some(self.text.as_str()).filter(|text| !text.is_empty()))
    }
}

/// Options of one `<select>` together with the attributes needed to post it back.
#[derive(Debug, Clone)]
pub(crate) struct OptionList {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) options: Vec<SelectOption>,
}

impl OptionList {
    fn from_select(select: ElementRef<'_>) -> Self {
        let element = select.value();
        Self {
            id: element.id().map(str::to_owned),
            name: element.attr("name").map(str::to_owned),
            options: select
                .select(&OPTION)
                .map(|option| {
                    SelectOption::new(&element_text(option), option.value().attr("value"))
                })
                .collect(),
        }
    }

    /// Form field to post the chosen value under.
    pub(crate) fn field_name(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_owned())
    }

    /// Identifier used when the list itself triggers the postback.
    pub(crate) fn event_target(&self, fallback: &str) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| fallback.to_owned())
    }
}

/// A way of finding a selectable list on a page.
pub(crate) trait OptionSource {
    fn describe(&self) -> String;

    fn locate(&self, document: &Html) -> Option<OptionList>;
}

/// A `<select>` with a known `id`.
pub(crate) struct ById {
    pub(crate) id: &'static str,
    /// Skip the control unless it also carries a `name`.
    pub(crate) require_name: bool,
}

impl OptionSource for ById {
    fn describe(&self) -> String {
        format!("select#{}", self.id)
    }

    fn locate(&self, document: &Html) -> Option<OptionList> {
        document
            .select(&SELECT)
            .find(|select| select.value().id() == Some(self.id))
            .filter(|select| !self.require_name || select.value().attr("name").is_some())
            .map(OptionList::from_select)
    }
}

/// Any `<select>` whose `id` or `name` mentions a fragment and offers more than one option.
pub(crate) struct ByFragment {
    pub(crate) fragment: &'static str,
}

impl OptionSource for ByFragment {
    fn describe(&self) -> String {
        format!("select mentioning {:?}", self.fragment)
    }

    fn locate(&self, document: &Html) -> Option<OptionList> {
        document
            .select(&SELECT)
            .filter(|select| {
                let element = select.value();
                [element.id(), element.attr("name")]
                    .into_iter()
                    .flatten()
                    .any(|attr| attr.to_lowercase().contains(self.fragment))
            })
            .map(OptionList::from_select)
            .find(|list| list.options.len() > 1)
    }
}

/// The first named `<select>` offering more than one option.
pub(crate) struct ByOptionCount;

impl OptionSource for ByOptionCount {
    fn describe(&self) -> String {
        "any named select with several options".to_owned()
    }

    fn locate(&self, document: &Html) -> Option<OptionList> {
        document
            .select(&SELECT)
            .filter(|select| select.value().attr("name").is_some())
            .map(OptionList::from_select)
            .find(|list| list.options.len() > 1)
    }
}

/// Try each source in order and return the first list found.
pub(crate) fn locate(
    document: &Html,
    sources: &[&dyn OptionSource],
    trace: &mut LookupTrace,
) -> Option<OptionList> {
    for source in sources {
        if let Some(list) = source.locate(document) {
            trace.record(format!(
                "options: {} -> id={:?} name={:?} options={}",
                source.describe(),
                list.id.as_deref().unwrap_or_default(),
                list.name.as_deref().unwrap_or_default(),
                list.options.len()
            ));
            return Some(list);
        }
    }
    None
}

/// Record every `<select>` on the page; used when an expected list is missing.
pub(crate) fn record_selects(document: &Html, trace: &mut LookupTrace) {
    if !trace.is_verbose() {
        return;
    }
    trace.record("Select elements found:");
    for select in document.select(&SELECT) {
        let element = select.value();
        trace.record(format!(
            "  select name={:?} id={:?} options={}",
            element.attr("name").unwrap_or_default(),
            element.id().unwrap_or_default(),
            select.select(&OPTION).count()
        ));
    }
}

/// First option whose text contains the hint, else the first option with a value.
pub(crate) fn choose_address<'a>(options: &'a [SelectOption], hint: Option<&str>) -> Option<&'a str> {
    let candidates = || {
        options
            .iter()
            .filter_map(|option| option.explicit_value().map(|value| (option, value)))
    };

    hint.map(str::to_lowercase)
        .and_then(|hint| {
            candidates()
                .find(|(option, _value)| option.text.to_lowercase().contains(&hint))
                .map(|(_option, value)| value)
        })
        .or_else(|| candidates().next().map(|(_option, value)| value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreetMatch {
    OutwardCode,
    Query,
    FirstAvailable,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StreetChoice<'a> {
    pub(crate) strategy: StreetMatch,
    pub(crate) text: &'a str,
    pub(crate) value: &'a str,
}

/// Pick a street: outward code first, then the query text, then anything selectable.
pub(crate) fn choose_street<'a>(
    options: &'a [SelectOption],
    outward: Option<&str>,
    query: &str,
) -> Option<StreetChoice<'a>> {
    let candidates = || {
        options.iter().filter_map(|option| {
            option.value_or_text().map(|value| (option.text.as_str(), value))
        })
    };
    let choice = |strategy: StreetMatch| {
        move |(text, value): (&'a str, &'a str)| StreetChoice {
            strategy,
            text,
            value,
        }
    };

    let by_outward = outward.filter(|code| !code.is_empty()).and_then(|code| {
        candidates()
            .find(|(text, value)| {
                value.to_uppercase().contains(code) || text.to_uppercase().contains(code)
            })
            .map(choice(StreetMatch::OutwardCode))
    });

    let query = query.trim().to_lowercase();
    let by_query = || {
        Some(query.as_str())
            .filter(|query| !query.is_empty())
            .and_then(|query| {
                candidates()
                    .find(|(text, _value)| text.to_lowercase().contains(query))
                    .map(choice(StreetMatch::Query))
            })
    };

    by_outward
        .or_else(by_query)
        .or_else(|| candidates().next().map(choice(StreetMatch::FirstAvailable)))
}

/// Outward code of a postcode: its first segment, upper-cased.
pub(crate) fn outward_code(postcode: &str) -> Option<String> {
    postcode.split_whitespace().next().map(str::to_uppercase)
}

/// Drop leading flat markers and house numbers from an address hint.
pub(crate) fn street_from_hint(hint: &str) -> Option<String> {
    let street: Vec<&str> = hint
        .split_whitespace()
        .skip_while(|token| {
            let marker = token.trim_end_matches('.').to_uppercase();
            FLAT_MARKERS.contains(&marker.as_str()) || token.chars().any(|ch| ch.is_ascii_digit())
        })
        .collect();

    if street.is_empty() {
        None
    } else {
        Some(street.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_street() -> Vec<SelectOption> {
        vec![
            SelectOption::new("1 High Street", Some("A")),
            SelectOption::new("2 High Street", Some("B")),
        ]
    }

    #[test]
    fn address_hint_matches_case_insensitively() {
        assert_eq!(choose_address(&high_street(), Some("2 high")), Some("B"));
    }

    #[test]
    fn address_without_hint_takes_first_with_value() {
        assert_eq!(choose_address(&high_street(), None), Some("A"));

        let options = vec![
            SelectOption::new("Select an address", Some("")),
            SelectOption::new("3 Low Road", Some("C")),
        ];
        assert_eq!(choose_address(&options, None), Some("C"));
        assert_eq!(choose_address(&options, Some("nowhere")), Some("C"));
    }

    #[test]
    fn address_hint_ignores_options_without_value() {
        let options = vec![
            SelectOption::new("2 High Street (no longer served)", None),
            SelectOption::new("2 High Street", Some("B")),
        ];
        assert_eq!(choose_address(&options, Some("2 high")), Some("B"));
        assert_eq!(choose_address(&[SelectOption::new("Pick one", None)], None), None);
    }

    #[test]
    fn street_prefers_outward_code() {
        let options = vec![
            SelectOption::new("High Street, BT9", Some("HS-BT9")),
            SelectOption::new("High Street, BT1", Some("HS-BT1")),
        ];

        let choice = choose_street(&options, Some("BT1"), "High Street").expect("a street");
        assert_eq!(choice.strategy, StreetMatch::OutwardCode);
        assert_eq!(choice.value, "HS-BT1");
    }

    #[test]
    fn street_falls_back_to_query_then_first() {
        let options = vec![
            SelectOption::new("Castle Street", Some("CS")),
            SelectOption::new("High Street", Some("")),
        ];

        let choice = choose_street(&options, Some("BT7"), "high street").expect("a street");
        assert_eq!(choice.strategy, StreetMatch::Query);
        assert_eq!(choice.value, "High Street");

        let choice = choose_street(&options, None, "Nowhere Lane").expect("a street");
        assert_eq!(choice.strategy, StreetMatch::FirstAvailable);
        assert_eq!(choice.value, "CS");

        assert!(choose_street(&[SelectOption::new("", None)], None, "x").is_none());
    }

    #[test]
    fn street_hint_drops_flat_and_house_numbers() {
        assert_eq!(
            street_from_hint("Flat 3B 12 High Street").as_deref(),
            Some("High Street")
        );
        assert_eq!(street_from_hint("High Street").as_deref(), Some("High Street"));
        assert_eq!(street_from_hint("apt. 4 2A  Mill Road").as_deref(), Some("Mill Road"));
        assert_eq!(street_from_hint("Flat 12"), None);
    }

    #[test]
    fn outward_code_is_first_segment_upper_cased() {
        assert_eq!(outward_code("bt1 1aa").as_deref(), Some("BT1"));
        assert_eq!(outward_code("   "), None);
    }

    #[test]
    fn sources_are_tried_in_priority_order() {
        let document = Html::parse_document(
            r#"<form>
                 <select name="ctl00$MainContent$other"><option value="1">One</option><option value="2">Two</option></select>
                 <select id="lstAddresses"><option value="9">Nine</option><option value="8">Eight</option></select>
                 <select id="street_choice" name="streetPick"><option>Only</option></select>
                 <select id="streets_alt" name="streetAlt"><option>A</option><option>B</option></select>
               </form>"#,
        );
        let mut trace = LookupTrace::new(true);

        let strict = ById {
            id: "lstAddresses",
            require_name: true,
        };
        let lenient = ById {
            id: "lstAddresses",
            require_name: false,
        };

        let list = locate(&document, &[&strict, &ByOptionCount], &mut trace).expect("a list");
        assert_eq!(list.name.as_deref(), Some("ctl00$MainContent$other"));

        let list = locate(&document, &[&lenient, &ByOptionCount], &mut trace).expect("a list");
        assert_eq!(list.id.as_deref(), Some("lstAddresses"));
        assert_eq!(list.field_name("fallback"), "fallback");

        let list = locate(&document, &[&ByFragment { fragment: "street" }], &mut trace)
            .expect("a list");
        assert_eq!(list.id.as_deref(), Some("streets_alt"));
        assert_eq!(list.event_target("fallback"), "streets_alt");

        assert!(locate(&Html::parse_document("<p></p>"), &[&lenient], &mut trace).is_none());
    }
}
