//! Street search detour, used when the postcode results offer no usable address list.
//!
//! The detour takes three postbacks: search by street name, pick the street, pick the
//! address. Each one re-reads the form of the page it answers, so state fields from an
//! earlier response are never replayed.

use binday_core::{LookupError, LookupTrace};
use reqwest::Url;

use crate::controls::{
    ADDRESS_LIST_FIELD, ADDRESS_LIST_ID, EVENT_ARGUMENT_FIELD, EVENT_TARGET_FIELD,
    SEARCH_BY_STREET, SEARCH_MODE_FIELD, SELECT_ADDRESS_BUTTON, SELECT_ADDRESS_LABEL,
    SELECT_STREET_BUTTON, SELECT_STREET_LABEL, STREET_FIELD, STREET_LIST_FIELD, STREET_LIST_ID,
    STREET_SEARCH_BUTTON, STREET_SEARCH_LABEL,
};
use crate::form::{FormState, SubmitButton};
use crate::options::{ByFragment, ById, choose_address, choose_street, locate, outward_code};
use crate::session::{Page, PortalSession, Submission};

/// What the detour searches for.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StreetSearch<'a> {
    /// Street name typed into the street search box.
    pub(crate) street_query: &'a str,
    /// Postcode of the original request; its outward code narrows the street list.
    pub(crate) postcode: Option<&'a str>,
    /// Address fragment of the original request.
    pub(crate) address_hint: Option<&'a str>,
}

impl StreetSearch<'_> {
    // The address hint is the sharper filter when the caller gave one.
    fn street_filter(&self) -> &str {
        self.address_hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .unwrap_or(self.street_query)
    }
}

/// Run the whole detour from a fresh landing page to the results page.
pub(crate) async fn street_flow(
    session: &PortalSession,
    landing: &Url,
    search: StreetSearch<'_>,
    trace: &mut LookupTrace,
) -> Result<Page, LookupError> {
    trace.record(format!(
        "street_flow: start street_query={:?} postcode_hint={:?}",
        search.street_query, search.postcode
    ));

    let landing_page = session.get(landing).await?;
    let submission = plan_street_search(&landing_page, search.street_query)?;
    let streets_page = session.submit(&landing_page.url, submission).await?;
    trace.record("street_flow: posted search");

    let submission = plan_street_selection(&streets_page, search, trace)?;
    let addresses_page = session.submit(&streets_page.url, submission).await?;
    trace.record("street_flow: posted street selection");

    let submission = plan_address_selection(&addresses_page, search.address_hint, trace)?;
    session.submit(&addresses_page.url, submission).await
}

fn plan_street_search(page: &Page, street_query: &str) -> Result<Submission, LookupError> {
    let mut form = FormState::extract(&page.document())?;
    form.set(SEARCH_MODE_FIELD, SEARCH_BY_STREET);
    form.set(STREET_FIELD, street_query);
    form.set(STREET_SEARCH_BUTTON, STREET_SEARCH_LABEL);

    form.into_submission(&page.url)
}

fn plan_street_selection(
    page: &Page,
    search: StreetSearch<'_>,
    trace: &mut LookupTrace,
) -> Result<Submission, LookupError> {
    let document = page.document();

    let listed = ById {
        id: STREET_LIST_ID,
        require_name: false,
    };
    let mentioned = ByFragment { fragment: "street" };
    let Some(streets) = locate(&document, &[&listed, &mentioned], trace) else {
        trace.record("street_flow: no streets select found");
        return Err(LookupError::NoStreetList);
    };

    let outward = search.postcode.and_then(outward_code);
    let Some(choice) = choose_street(&streets.options, outward.as_deref(), search.street_filter())
    else {
        trace.record("street_flow: could not select a street option");
        for option in &streets.options {
            trace.record(format!("  value={:?} text={:?}", option.value, option.text));
        }
        return Err(LookupError::NoSelectableStreet);
    };
    trace.record(format!(
        "street_flow: {:?} match -> {:?}",
        choice.strategy, choice.text
    ));

    let mut form = FormState::extract(&document)?;
    form.set(&streets.field_name(STREET_LIST_FIELD), choice.value);

    match form.find_button(is_select_street).cloned() {
        Some(button) => {
            let label = if button.label.is_empty() {
                SELECT_STREET_LABEL
            } else {
                button.label.as_str()
            };
            form.set(&button.name, label);
        }
        None => {
            // No button: the list posts back on change, so fake that event.
            form.set(EVENT_TARGET_FIELD, &streets.event_target(STREET_LIST_FIELD));
            form.set_default(EVENT_ARGUMENT_FIELD, "");
        }
    }

    form.into_submission(&page.url)
}

fn is_select_street(button: &SubmitButton) -> bool {
    button.name == SELECT_STREET_BUTTON
        || button.name.to_lowercase().contains("selectstreet")
        || button.label.to_lowercase().contains("select street")
}

fn plan_address_selection(
    page: &Page,
    hint: Option<&str>,
    trace: &mut LookupTrace,
) -> Result<Submission, LookupError> {
    let document = page.document();

    let listed = ById {
        id: ADDRESS_LIST_ID,
        require_name: false,
    };
    let Some(addresses) = locate(&document, &[&listed], trace) else {
        trace.record("street_flow: address list not found after selecting street");
        return Err(LookupError::NoAddressList);
    };
    let value =
        choose_address(&addresses.options, hint).ok_or(LookupError::NoSelectableAddress)?;
    trace.record(format!("street_flow: address value={value:?}"));

    let mut form = FormState::extract(&document)?;
    form.set(&addresses.field_name(ADDRESS_LIST_FIELD), value);
    form.set(SELECT_ADDRESS_BUTTON, SELECT_ADDRESS_LABEL);

    form.into_submission(&page.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Page {
        Page {
            url: Url::parse("https://portal.example/bins/Default.aspx").expect("valid url"),
            body: body.to_owned(),
        }
    }

    fn search<'a>(postcode: Option<&'a str>, hint: Option<&'a str>) -> StreetSearch<'a> {
        StreetSearch {
            street_query: "High Street",
            postcode,
            address_hint: hint,
        }
    }

    const STREETS_WITH_BUTTON: &str = r#"<form id="form1">
        <input type="hidden" name="__VIEWSTATE" value="vs-streets">
        <select id="streets_listbox" name="ctl00$MainContent$streets_listbox">
          <option value="HS9">HIGH STREET, BT9</option>
          <option value="HS1">HIGH STREET, BT1</option>
        </select>
        <input type="submit" name="ctl00$MainContent$btn_selectStreet" value="Choose street">
      </form>"#;

    #[test]
    fn street_search_switches_mode_and_clicks_search() {
        let landing = page(
            r#"<form id="form1"><input type="hidden" name="__VIEWSTATE" value="vs0">
               <input type="text" name="ctl00$MainContent$Postcode_textbox"></form>"#,
        );

        let submission = plan_street_search(&landing, "High Street").expect("plan");
        let field = |name: &str| submission.fields.get(name).map(String::as_str);

        assert_eq!(field(SEARCH_MODE_FIELD), Some("S"));
        assert_eq!(field(STREET_FIELD), Some("High Street"));
        assert_eq!(field(STREET_SEARCH_BUTTON), Some("Search"));
        assert_eq!(field("__VIEWSTATE"), Some("vs0"));
    }

    #[test]
    fn street_selection_uses_outward_code_and_clicks_button() {
        let mut trace = LookupTrace::new(false);

        let submission = plan_street_selection(
            &page(STREETS_WITH_BUTTON),
            search(Some("bt1 1aa"), Some("12 High Street")),
            &mut trace,
        )
        .expect("plan");
        let field = |name: &str| submission.fields.get(name).map(String::as_str);

        assert_eq!(field(STREET_LIST_FIELD), Some("HS1"));
        assert_eq!(field(SELECT_STREET_BUTTON), Some("Choose street"));
        assert_eq!(field("__VIEWSTATE"), Some("vs-streets"));
        assert_eq!(field(EVENT_TARGET_FIELD), None);
    }

    #[test]
    fn street_selection_without_button_posts_back_through_event_target() {
        let mut trace = LookupTrace::new(false);
        let body = r#"<form id="form1">
            <input type="hidden" name="__EVENTTARGET" value="">
            <select id="streetList" name="ctl00$MainContent$streetList">
              <option value="">Choose</option>
              <option value="CS">CASTLE STREET</option>
              <option value="HS">HIGH STREET</option>
            </select>
          </form>"#;

        let submission =
            plan_street_selection(&page(body), search(None, None), &mut trace).expect("plan");
        let field = |name: &str| submission.fields.get(name).map(String::as_str);

        assert_eq!(field("ctl00$MainContent$streetList"), Some("HS"));
        assert_eq!(field(EVENT_TARGET_FIELD), Some("streetList"));
        assert_eq!(field(EVENT_ARGUMENT_FIELD), Some(""));
    }

    #[test]
    fn street_selection_requires_a_street_list() {
        let mut trace = LookupTrace::new(false);
        let body = r#"<form id="form1"><select name="ward"><option>A</option><option>B</option></select></form>"#;

        let result = plan_street_selection(&page(body), search(None, None), &mut trace);

        assert!(matches!(result, Err(LookupError::NoStreetList)));
    }

    #[test]
    fn street_list_without_usable_options_is_reported() {
        let mut trace = LookupTrace::new(true);
        let body = r#"<form id="form1"><select id="streets_listbox"><option value=""></option></select></form>"#;

        let result = plan_street_selection(&page(body), search(None, None), &mut trace);

        assert!(matches!(result, Err(LookupError::NoSelectableStreet)));
        assert_eq!(trace.tail(1), ["  value=Some(\"\") text=\"\""]);
    }

    #[test]
    fn address_selection_after_street_uses_known_list() {
        let mut trace = LookupTrace::new(false);
        let body = r#"<form id="form1">
            <input type="hidden" name="__VIEWSTATE" value="vs-addr">
            <select id="lstAddresses"><option value="11">10 High Street</option><option value="12">12 High Street</option></select>
          </form>"#;

        let submission =
            plan_address_selection(&page(body), Some("12 high"), &mut trace).expect("plan");
        let field = |name: &str| submission.fields.get(name).map(String::as_str);

        assert_eq!(field(ADDRESS_LIST_FIELD), Some("12"));
        assert_eq!(field(SELECT_ADDRESS_BUTTON), Some("Select"));
        assert_eq!(field("__VIEWSTATE"), Some("vs-addr"));
    }

    #[test]
    fn address_selection_after_street_requires_known_list() {
        let mut trace = LookupTrace::new(false);
        let body = r#"<form id="form1"><select name="other"><option value="1">1</option><option value="2">2</option></select></form>"#;

        let result = plan_address_selection(&page(body), None, &mut trace);

        assert!(matches!(result, Err(LookupError::NoAddressList)));
    }

    #[test]
    fn address_hint_outranks_street_query_as_filter() {
        assert_eq!(search(None, Some(" 12 High ")).street_filter(), "12 High");
        assert_eq!(search(None, Some("  ")).street_filter(), "High Street");
        assert_eq!(search(None, None).street_filter(), "High Street");
    }
}
