//! Second step: pick an address from the postcode results.

use binday_core::{LookupError, LookupTrace};

use crate::controls::{ADDRESS_LIST_FIELD, ADDRESS_LIST_ID, SELECT_ADDRESS_BUTTON, SELECT_ADDRESS_LABEL};
use crate::form::FormState;
use crate::options::{ById, ByOptionCount, choose_address, locate, record_selects};
use crate::session::{Page, PortalSession, Submission};

/// Select the address matching `hint` (or the first one) and submit it.
pub(crate) async fn select_address(
    session: &PortalSession,
    page: &Page,
    hint: Option<&str>,
    trace: &mut LookupTrace,
) -> Result<Page, LookupError> {
    let submission = plan_address(page, hint, trace)?;
    session.submit(&page.url, submission).await
}

fn plan_address(
    page: &Page,
    hint: Option<&str>,
    trace: &mut LookupTrace,
) -> Result<Submission, LookupError> {
    let document = page.document();

    let listed = ById {
        id: ADDRESS_LIST_ID,
        require_name: true,
    };
    let Some(list) = locate(&document, &[&listed, &ByOptionCount], trace) else {
        if let Ok(form) = FormState::extract(&document) {
            trace.record_fields("Postcode page", &form.fields);
        }
        record_selects(&document, trace);
        return Err(LookupError::NoAddressList);
    };

    let value = choose_address(&list.options, hint).ok_or(LookupError::NoSelectableAddress)?;
    trace.record(format!("address: hint={hint:?} -> value={value:?}"));

    // Re-read the form: the postcode postback issued fresh state fields.
    let mut form = FormState::extract(&document)?;
    form.set(&list.field_name(ADDRESS_LIST_FIELD), value);
    form.set(SELECT_ADDRESS_BUTTON, SELECT_ADDRESS_LABEL);

    form.into_submission(&page.url)
}

#[cfg(test)]
mod tests {
    use reqwest::Url;

    use super::*;

    fn page(body: &str) -> Page {
        Page {
            url: Url::parse("https://portal.example/bins/Default.aspx").expect("valid url"),
            body: body.to_owned(),
        }
    }

    const ADDRESSES: &str = r#"<form id="form1" action="Default.aspx">
        <input type="hidden" name="__VIEWSTATE" value="vs2">
        <select id="lstAddresses" name="ctl00$MainContent$lstAddresses">
          <option value="">Select your address</option>
          <option value="A">1 High Street, Belfast</option>
          <option value="B">2 High Street, Belfast</option>
        </select>
        <input type="submit" name="ctl00$MainContent$SelectAddress_button" value="Select">
      </form>"#;

    #[test]
    fn hint_selects_matching_address_with_fresh_state() {
        let mut trace = LookupTrace::new(false);

        let submission = plan_address(&page(ADDRESSES), Some("2 high"), &mut trace).expect("plan");
        let field = |name: &str| submission.fields.get(name).map(String::as_str);

        assert_eq!(field(ADDRESS_LIST_FIELD), Some("B"));
        assert_eq!(field(SELECT_ADDRESS_BUTTON), Some("Select"));
        assert_eq!(field("__VIEWSTATE"), Some("vs2"));
    }

    #[test]
    fn no_hint_selects_first_address_with_value() {
        let mut trace = LookupTrace::new(false);

        let submission = plan_address(&page(ADDRESSES), None, &mut trace).expect("plan");

        assert_eq!(
            submission.fields.get(ADDRESS_LIST_FIELD).map(String::as_str),
            Some("A")
        );
    }

    #[test]
    fn page_without_selects_has_no_address_list() {
        let mut trace = LookupTrace::new(true);
        let body = r#"<form id="form1"><p>No addresses found for this postcode</p></form>"#;

        let result = plan_address(&page(body), Some("2 High Street"), &mut trace);

        assert!(matches!(result, Err(LookupError::NoAddressList)));
        assert_eq!(trace.tail(1), ["Select elements found:"]);
    }

    #[test]
    fn list_of_placeholders_has_nothing_selectable() {
        let mut trace = LookupTrace::new(false);
        let body = r#"<form id="form1">
            <select id="lstAddresses" name="list"><option value="">-</option><option value="">--</option></select>
          </form>"#;

        let result = plan_address(&page(body), None, &mut trace);

        assert!(matches!(result, Err(LookupError::NoSelectableAddress)));
    }
}
