//! First step: search the portal by postcode.

use binday_core::{LookupError, LookupTrace};
use reqwest::Url;

use crate::controls::{
    ADDRESS_LOOKUP_BUTTON, ADDRESS_LOOKUP_LABEL, POSTCODE_FIELD, SEARCH_BY_POSTCODE,
    SEARCH_MODE_FIELD,
};
use crate::form::FormState;
use crate::session::{Page, PortalSession, Submission};

/// Load the landing page and submit the postcode search.
pub(crate) async fn submit_postcode(
    session: &PortalSession,
    landing: &Url,
    postcode: &str,
    trace: &mut LookupTrace,
) -> Result<Page, LookupError> {
    let landing_page = session.get(landing).await?;
    let submission = plan_postcode(&landing_page, postcode, trace)?;

    trace.record(format!("postcode: posting {postcode:?} to {}", submission.url));
    session.submit(&landing_page.url, submission).await
}

fn plan_postcode(
    page: &Page,
    postcode: &str,
    trace: &mut LookupTrace,
) -> Result<Submission, LookupError> {
    let mut form = FormState::extract(&page.document())?;

    if !form.contains(POSTCODE_FIELD) {
        trace.record_fields("Initial page", &form.fields);
        return Err(LookupError::UnsupportedPageShape(
            "postcode input not found in form".to_owned(),
        ));
    }

    form.set(SEARCH_MODE_FIELD, SEARCH_BY_POSTCODE);
    form.set(POSTCODE_FIELD, postcode);
    form.set(ADDRESS_LOOKUP_BUTTON, ADDRESS_LOOKUP_LABEL);

    form.into_submission(&page.url)
}
