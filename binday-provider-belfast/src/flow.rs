//! Lookup state machine.
//!
//! ```text
//! Start -> PostcodeSubmitted -> AddressSelected -> done
//!                            \-> AddressSelectionFailed -> StreetFallback -> AddressSelected
//! ```

use binday_core::{LookupError, LookupRequest, LookupResult, LookupTrace};
use reqwest::Url;

use crate::address::select_address;
use crate::details::{find_panel, page_preview, panel_lines, parse_panel};
use crate::options::street_from_hint;
use crate::postcode::submit_postcode;
use crate::session::{Page, PortalSession};
use crate::street::{StreetSearch, street_flow};

#[derive(Debug)]
enum Stage {
    Start,
    PostcodeSubmitted(Page),
    AddressSelectionFailed(LookupError),
    StreetFallback(String),
    AddressSelected(Page),
}

enum Transition {
    Next(Stage),
    Done(LookupResult),
}

/// One lookup, driven from the landing page to the parsed results.
pub(crate) struct LookupFlow<'a> {
    session: &'a PortalSession,
    landing: &'a Url,
    request: &'a LookupRequest,
    trace: &'a mut LookupTrace,
}

impl<'a> LookupFlow<'a> {
    pub(crate) fn new(
        session: &'a PortalSession,
        landing: &'a Url,
        request: &'a LookupRequest,
        trace: &'a mut LookupTrace,
    ) -> Self {
        Self {
            session,
            landing,
            request,
            trace,
        }
    }

    pub(crate) async fn run(mut self) -> Result<LookupResult, LookupError> {
        let mut stage = Stage::Start;
        loop {
            match self.advance(stage).await? {
                Transition::Next(next) => stage = next,
                Transition::Done(result) => return Ok(result),
            }
        }
    }

    async fn advance(&mut self, stage: Stage) -> Result<Transition, LookupError> {
        let next = match stage {
            Stage::Start => {
                let page = submit_postcode(
                    self.session,
                    self.landing,
                    &self.request.postcode,
                    self.trace,
                )
                .await?;
                Stage::PostcodeSubmitted(page)
            }
            Stage::PostcodeSubmitted(page) => {
                let hint = self.request.address_hint.as_deref();
                match select_address(self.session, &page, hint, self.trace).await {
                    Ok(selected) => Stage::AddressSelected(selected),
                    Err(error) => Stage::AddressSelectionFailed(error),
                }
            }
            Stage::AddressSelectionFailed(error) => {
                let street_query = fallback_query(self.request.address_hint.as_deref(), error)?;
                tracing::warn!(
                    street = %street_query,
                    "address selection failed, falling back to street search"
                );
                self.trace.record(format!(
                    "Address dropdown not found; trying street-based flow with: {street_query}"
                ));
                Stage::StreetFallback(street_query)
            }
            Stage::StreetFallback(street_query) => {
                let search = StreetSearch {
                    street_query: &street_query,
                    postcode: Some(self.request.postcode.as_str()),
                    address_hint: self.request.address_hint.as_deref(),
                };
                let page = street_flow(self.session, self.landing, search, self.trace).await?;
                Stage::AddressSelected(page)
            }
            Stage::AddressSelected(page) => {
                let result = read_results(&page, self.trace)?;
                tracing::debug!(
                    address = %result.address,
                    collections = result.collections.len(),
                    "lookup finished"
                );
                return Ok(Transition::Done(result));
            }
        };

        Ok(Transition::Next(next))
    }
}

/// Street query for the detour, or the selection failure when there is nothing to search.
fn fallback_query(hint: Option<&str>, error: LookupError) -> Result<String, LookupError> {
    let hint = hint.map(str::trim).unwrap_or_default();

    street_from_hint(hint)
        .or_else(|| (!hint.is_empty()).then(|| hint.to_owned()))
        .ok_or(error)
}

fn read_results(page: &Page, trace: &mut LookupTrace) -> Result<LookupResult, LookupError> {
    let document = page.document();
    let Some(panel) = find_panel(&document) else {
        trace.record("results: BinDetailsPnl not found, page preview:");
        trace.record(page_preview(&document));
        return Err(LookupError::ResultsPanelMissing);
    };

    let details = parse_panel(panel);
    if details.entries.is_empty() {
        trace.record("results: no bin entries parsed, panel text:");
        for line in panel_lines(panel) {
            trace.record(line);
        }
    }

    Ok(LookupResult::from_entries(details.address, details.entries))
}
