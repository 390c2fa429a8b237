//! Extraction of the postback form's current field values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use binday_core::LookupError;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::controls::STATE_FIELD_PREFIX;
use crate::session::Submission;

static FORM: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static INPUT: LazyLock<Selector> = LazyLock::new(|| selector("input"));
static TEXTAREA: LazyLock<Selector> = LazyLock::new(|| selector("textarea"));
static SELECT: LazyLock<Selector> = LazyLock::new(|| selector("select"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));
static SELECTED_OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option[selected]"));

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Visible text of an element, each text node trimmed and concatenated.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// A submit control; left out of the fields until a step decides to click it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmitButton {
    pub(crate) name: String,
    pub(crate) label: String,
}

/// Action and field values of the page's primary form.
#[derive(Debug, Clone)]
pub(crate) struct FormState {
    pub(crate) action: String,
    pub(crate) fields: BTreeMap<String, String>,
    pub(crate) buttons: Vec<SubmitButton>,
}

impl FormState {
    pub(crate) fn extract(document: &Html) -> Result<Self, LookupError> {
        let form = primary_form(document).ok_or(LookupError::NoFormFound)?;

        let mut fields = BTreeMap::new();
        let mut buttons = Vec::new();

        for input in form.select(&INPUT) {
            let element = input.value();
            let Some(name) = element.attr("name") else {
                continue;
            };
            let value = element.attr("value");

            match element.attr("type").map(str::to_ascii_lowercase).as_deref() {
                Some("submit") => buttons.push(SubmitButton {
                    name: name.to_owned(),
                    label: value.unwrap_or_default().to_owned(),
                }),
                Some("checkbox" | "radio") => {
                    if element.attr("checked").is_some() {
                        fields.insert(name.to_owned(), value.unwrap_or("on").to_owned());
                    }
                }
                _ => {
                    fields.insert(name.to_owned(), value.unwrap_or_default().to_owned());
                }
            }
        }

        for textarea in form.select(&TEXTAREA) {
            if let Some(name) = textarea.value().attr("name") {
                fields.insert(name.to_owned(), textarea.text().collect());
            }
        }

        for select in form.select(&SELECT) {
            if let Some(name) = select.value().attr("name") {
                fields.insert(name.to_owned(), selected_value(select));
            }
        }

        Ok(Self {
            action: form.value().attr("action").unwrap_or_default().to_owned(),
            fields,
            buttons,
        })
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub(crate) fn set(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_owned(), value.to_owned());
    }

    /// Set a field only when the page did not already provide it.
    pub(crate) fn set_default(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_owned())
            .or_insert_with(|| value.to_owned());
    }

    pub(crate) fn state_field_count(&self) -> usize {
        self.fields
            .keys()
            .filter(|name| name.starts_with(STATE_FIELD_PREFIX))
            .count()
    }

    pub(crate) fn find_button<P>(&self, predicate: P) -> Option<&SubmitButton>
    where
        P: Fn(&SubmitButton) -> bool,
    {
        self.buttons.iter().find(|button| predicate(button))
    }

    /// Resolve the action against the page it came from.
    pub(crate) fn into_submission(self, page_url: &Url) -> Result<Submission, LookupError> {
        let url = if self.action.is_empty() {
            page_url.clone()
        } else {
            page_url
                .join(&self.action)
                .map_err(|err| LookupError::InvalidUrl {
                    url: self.action.clone(),
                    reason: err.to_string(),
                })?
        };

        Ok(Submission {
            url,
            fields: self.fields,
        })
    }
}

fn primary_form(document: &Html) -> Option<ElementRef<'_>> {
    let forms: Vec<ElementRef<'_>> = document.select(&FORM).collect();

    forms
        .iter()
        .find(|form| form.value().attr("id").is_some())
        .or_else(|| forms.iter().find(|form| form.value().attr("name").is_some()))
        .or_else(|| forms.first())
        .copied()
}

// An option without a value attribute submits its text, as browsers do.
fn selected_value(select: ElementRef<'_>) -> String {
    select
        .select(&SELECTED_OPTION)
        .next()
        .or_else(|| select.select(&OPTION).next())
        .map(|option| {
            option
                .value()
                .attr("value")
                .map_or_else(|| element_text(option), str::to_owned)
        })
        .unwrap_or_default()
}
