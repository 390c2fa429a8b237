//! Names of the portal's form controls and the labels its buttons submit.

pub(crate) const POSTCODE_FIELD: &str = "ctl00$MainContent$Postcode_textbox";
pub(crate) const STREET_FIELD: &str = "ctl00$MainContent$Street_textbox";

pub(crate) const SEARCH_MODE_FIELD: &str = "ctl00$MainContent$searchBy_radio";
pub(crate) const SEARCH_BY_POSTCODE: &str = "P";
pub(crate) const SEARCH_BY_STREET: &str = "S";

pub(crate) const ADDRESS_LOOKUP_BUTTON: &str = "ctl00$MainContent$AddressLookup_button";
pub(crate) const ADDRESS_LOOKUP_LABEL: &str = "Find address";
pub(crate) const STREET_SEARCH_BUTTON: &str = "ctl00$MainContent$streetSearch_button";
pub(crate) const STREET_SEARCH_LABEL: &str = "Search";
pub(crate) const SELECT_ADDRESS_BUTTON: &str = "ctl00$MainContent$SelectAddress_button";
pub(crate) const SELECT_ADDRESS_LABEL: &str = "Select";
pub(crate) const SELECT_STREET_BUTTON: &str = "ctl00$MainContent$btn_selectStreet";
pub(crate) const SELECT_STREET_LABEL: &str = "Select street";

pub(crate) const ADDRESS_LIST_ID: &str = "lstAddresses";
pub(crate) const ADDRESS_LIST_FIELD: &str = "ctl00$MainContent$lstAddresses";
pub(crate) const STREET_LIST_ID: &str = "streets_listbox";
pub(crate) const STREET_LIST_FIELD: &str = "ctl00$MainContent$streets_listbox";

pub(crate) const RESULTS_PANEL_ID: &str = "BinDetailsPnl";

// ASP.NET postback plumbing
pub(crate) const STATE_FIELD_PREFIX: &str = "__";
pub(crate) const EVENT_TARGET_FIELD: &str = "__EVENTTARGET";
pub(crate) const EVENT_ARGUMENT_FIELD: &str = "__EVENTARGUMENT";
